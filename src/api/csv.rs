// src/api/csv.rs
use crate::api::scrape::BatchScrapeResponse;
use crate::csv_io;
use crate::models::ScrapeResult;
use crate::server::ServerState;
use rocket::http::{ContentType, Status};
use rocket::response::status::Custom;
use rocket::serde::{json::Json, Deserialize};
use rocket::{post, State};
use serde_json::{json, Value};
use tracing::info;

#[derive(Deserialize)]
pub struct CsvScrapeRequest {
    pub filename: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct CsvExportRequest {
    pub results: Vec<ScrapeResult>,
}

/// Batch scrape driven by an uploaded CSV: the first column supplies the
/// candidate URLs, subject to the same 50-URL cap as the JSON batch.
#[post("/scrape/csv", data = "<request>")]
pub async fn scrape_csv(
    state: &State<ServerState>,
    request: Json<CsvScrapeRequest>,
) -> Result<Json<BatchScrapeResponse>, Custom<Json<Value>>> {
    let urls = csv_io::parse_url_column(
        &request.filename,
        &request.content,
        state.orchestrator.max_batch_size(),
    )
    .map_err(|e| {
        Custom(
            Status::BadRequest,
            Json(json!({ "success": false, "error": e.to_string() })),
        )
    })?;

    info!(file = %request.filename, urls = urls.len(), "CSV batch accepted");
    let results = state.orchestrator.run_batch(&urls).await;
    Ok(Json(BatchScrapeResponse { results }))
}

/// Renders previously obtained results back out as CSV.
#[post("/export/csv", data = "<request>")]
pub async fn export_csv(request: Json<CsvExportRequest>) -> (ContentType, String) {
    (ContentType::CSV, csv_io::export_results(&request.results))
}
