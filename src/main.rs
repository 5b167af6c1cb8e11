// src/main.rs
use contact_scraper::config::{load_config, Config};
use contact_scraper::models::Result;
use contact_scraper::server::build_rocket;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("contact_scraper={}", config.logging.level).parse()?),
        )
        .init();

    info!("Starting contact scraper API");
    let _ = build_rocket(config)?.launch().await?;

    Ok(())
}
