// src/models.rs
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// One person grouped out of a contact-bearing region: the name is the
/// identity, everything else is best-effort from the same region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactRecord {
    pub name: String,
    pub title: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactRecord {
    pub fn new(name: String) -> Self {
        Self {
            name,
            title: "unknown".to_string(),
            phone: None,
            email: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub name: String,
    pub title: String,
}

/// Everything pulled off a single page.
///
/// `contacts` is the authoritative grouped view. The flattened
/// `phone_numbers` / `email_addresses` / `people` fields are computed by an
/// independent page-wide pass for consumers that predate grouping, and may
/// diverge from `contacts`. That divergence is intentional dual-view output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub contacts: Vec<ContactRecord>,
    pub phone_numbers: Vec<String>,
    pub email_addresses: Vec<String>,
    pub people: Vec<Person>,
}

/// Terminal per-URL outcome. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub url: String,
    pub success: bool,
    pub data: Option<ExtractionResult>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ScrapeResult {
    pub fn ok(url: String, data: ExtractionResult) -> Self {
        Self {
            url,
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn failed(url: String, error: String) -> Self {
        Self {
            url,
            success: false,
            data: None,
            error: Some(error),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
