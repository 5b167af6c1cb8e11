// src/api/scrape.rs
use crate::models::ScrapeResult;
use crate::server::ServerState;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::{json::Json, Deserialize, Serialize};
use rocket::{post, State};
use serde_json::{json, Value};
use url::Url;

#[derive(Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct BatchScrapeRequest {
    pub urls: Vec<String>,
}

#[derive(Serialize)]
pub struct BatchScrapeResponse {
    pub results: Vec<ScrapeResult>,
}

fn bad_request(message: String) -> Custom<Json<Value>> {
    Custom(
        Status::BadRequest,
        Json(json!({ "success": false, "error": message })),
    )
}

#[post("/scrape", data = "<request>")]
pub async fn scrape_single(
    state: &State<ServerState>,
    request: Json<ScrapeRequest>,
) -> Result<Json<ScrapeResult>, Custom<Json<Value>>> {
    let url = request.url.trim();
    if url.is_empty() || Url::parse(url).is_err() {
        return Err(bad_request(format!("invalid URL: {}", url)));
    }

    Ok(Json(state.orchestrator.scrape_one(url).await))
}

#[post("/scrape/batch", data = "<request>")]
pub async fn scrape_batch(
    state: &State<ServerState>,
    request: Json<BatchScrapeRequest>,
) -> Result<Json<BatchScrapeResponse>, Custom<Json<Value>>> {
    let max = state.orchestrator.max_batch_size();
    if request.urls.is_empty() {
        return Err(bad_request("urls must not be empty".to_string()));
    }
    // The cap is checked before any fetch; individual malformed URLs are
    // not pre-checked and fail as per-item results instead.
    if request.urls.len() > max {
        return Err(bad_request(format!(
            "{} URLs exceeds the batch limit of {}",
            request.urls.len(),
            max
        )));
    }

    let results = state.orchestrator.run_batch(&request.urls).await;
    Ok(Json(BatchScrapeResponse { results }))
}
