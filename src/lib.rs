pub mod api;
pub mod config;
pub mod csv_io;
pub mod error;
pub mod models;
pub mod scraper;
pub mod server;

pub use error::ScrapeError;
pub use models::{ContactRecord, ExtractionResult, Person, ScrapeResult};
pub use scraper::{BatchPolicy, Extractor, Fetcher, FetchPolicy, ScrapeOrchestrator};
