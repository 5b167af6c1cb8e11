pub mod extractor;
pub mod fetcher;
pub mod normalizer;
pub mod orchestrator;
pub mod patterns;
pub mod types;

pub use extractor::Extractor;
pub use fetcher::Fetcher;
pub use orchestrator::ScrapeOrchestrator;
pub use types::{BatchPolicy, FetchPolicy};
