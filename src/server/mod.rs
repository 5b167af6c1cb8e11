// src/server/mod.rs
use crate::api::*;
use crate::config::Config;
use crate::scraper::ScrapeOrchestrator;
use rocket::{catchers, routes, Build, Rocket};

pub mod routes;

pub struct ServerState {
    pub config: Config,
    pub orchestrator: ScrapeOrchestrator,
}

pub fn build_rocket(config: Config) -> crate::models::Result<Rocket<Build>> {
    let orchestrator = ScrapeOrchestrator::new(
        config.scraping.fetch.clone(),
        config.scraping.batch.clone(),
    )?;
    let state = ServerState {
        config,
        orchestrator,
    };

    Ok(rocket::build()
        .manage(state)
        .register("/", catchers![routes::catchers::internal_error])
        .mount(
            "/api",
            routes![
                routes::health::health_check,
                routes::health::index,
                scrape_single,
                scrape_batch,
                scrape_csv,
                export_csv,
            ],
        ))
}
