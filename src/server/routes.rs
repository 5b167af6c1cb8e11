// src/server/routes.rs

pub mod catchers {
    use crate::models::ScrapeResult;
    use rocket::serde::json::Json;
    use rocket::{catch, Request};

    /// Unexpected handler failures still answer with a ScrapeResult body so
    /// callers can parse the 500 like any other outcome. The URL is
    /// best-effort: the request body is gone by the time a catcher runs, so
    /// the request path stands in for it.
    #[catch(500)]
    pub fn internal_error(req: &Request<'_>) -> Json<ScrapeResult> {
        Json(ScrapeResult::failed(
            req.uri().to_string(),
            "unexpected internal error".to_string(),
        ))
    }
}

pub mod health {
    use rocket::{get, serde::json::Json};
    use serde_json::{json, Value};

    #[get("/health")]
    pub async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "service": "contact-scraper-api"
        }))
    }

    #[get("/")]
    pub async fn index() -> Json<Value> {
        Json(json!({
            "name": "Contact Scraper API",
            "version": "0.1.0",
            "description": "Extracts contact records from company websites",
            "endpoints": {
                "health": "/api/health",
                "scrape": "/api/scrape",
                "batch": "/api/scrape/batch",
                "csv": "/api/scrape/csv",
                "export": "/api/export/csv"
            }
        }))
    }
}
