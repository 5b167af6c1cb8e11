// src/csv_io.rs
//
// Tabular glue at the system edge: batch URL lists come in as CSV, scrape
// results go out as CSV. Pure string-to-string, no files and no I/O.
use crate::models::ScrapeResult;
use thiserror::Error;
use url::Url;

pub const MAX_CSV_BYTES: usize = 5 * 1024 * 1024;

pub const EXPORT_HEADER: &str = "URL,Name,Title,Phone,Email,Error";

#[derive(Debug, Error)]
pub enum CsvIngestError {
    #[error("file must have a .csv extension")]
    NotCsv,
    #[error("CSV exceeds the {max} byte limit", max = MAX_CSV_BYTES)]
    TooLarge,
    #[error("no valid URLs found in the first column")]
    NoValidUrls,
    #[error("{count} valid URLs exceeds the batch limit of {max}")]
    TooManyUrls { count: usize, max: usize },
}

/// Pulls candidate URLs out of the first column of a CSV document.
///
/// Only well-formed http/https URLs survive; a header line drops out
/// naturally because "URL" does not parse. Rejects empty outcomes and
/// batches above `max_urls`.
pub fn parse_url_column(
    filename: &str,
    content: &str,
    max_urls: usize,
) -> Result<Vec<String>, CsvIngestError> {
    if !filename.to_lowercase().ends_with(".csv") {
        return Err(CsvIngestError::NotCsv);
    }
    if content.len() > MAX_CSV_BYTES {
        return Err(CsvIngestError::TooLarge);
    }

    let urls: Vec<String> = content
        .lines()
        .map(first_field)
        .filter(|field| {
            Url::parse(field)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false)
        })
        .map(str::to_owned)
        .collect();

    if urls.is_empty() {
        return Err(CsvIngestError::NoValidUrls);
    }
    if urls.len() > max_urls {
        return Err(CsvIngestError::TooManyUrls {
            count: urls.len(),
            max: max_urls,
        });
    }
    Ok(urls)
}

/// Renders scrape results as CSV: one row per grouped contact, legacy
/// fields as fallback rows when no contacts grouped, and one error row per
/// failed URL. The URL repeats in the first column of every row a result
/// produces.
pub fn export_results(results: &[ScrapeResult]) -> String {
    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');

    for result in results {
        for row in result_rows(result) {
            out.push_str(&row.join(","));
            out.push('\n');
        }
    }
    out
}

fn result_rows(result: &ScrapeResult) -> Vec<Vec<String>> {
    let url = escape_field(&result.url);

    if !result.success {
        let error = result.error.clone().unwrap_or_default();
        return vec![vec![
            url,
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            escape_field(&error),
        ]];
    }

    let Some(data) = &result.data else {
        return vec![vec![url, String::new(), String::new(), String::new(), String::new(), String::new()]];
    };

    let mut rows = Vec::new();
    for contact in &data.contacts {
        rows.push(vec![
            url.clone(),
            escape_field(&contact.name),
            escape_field(&contact.title),
            escape_field(contact.phone.as_deref().unwrap_or("")),
            escape_field(contact.email.as_deref().unwrap_or("")),
            String::new(),
        ]);
    }

    if rows.is_empty() {
        // No grouped contacts — fall back to the flattened legacy view so
        // the export still carries whatever the page gave up.
        for person in &data.people {
            rows.push(vec![
                url.clone(),
                escape_field(&person.name),
                escape_field(&person.title),
                String::new(),
                String::new(),
                String::new(),
            ]);
        }
        for phone in &data.phone_numbers {
            rows.push(vec![
                url.clone(),
                String::new(),
                String::new(),
                escape_field(phone),
                String::new(),
                String::new(),
            ]);
        }
        for email in &data.email_addresses {
            rows.push(vec![
                url.clone(),
                String::new(),
                String::new(),
                String::new(),
                escape_field(email),
                String::new(),
            ]);
        }
    }

    if rows.is_empty() {
        rows.push(vec![url, String::new(), String::new(), String::new(), String::new(), String::new()]);
    }
    rows
}

/// Quotes a value when it contains a comma, quote, or newline; internal
/// quotes are doubled.
fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// First CSV field of a line, honoring quoted fields with doubled quotes.
fn first_field(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('"') {
        // Find closing quote, skipping doubled ones.
        let bytes = rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                    continue;
                }
                return &rest[..i];
            }
            i += 1;
        }
        rest
    } else {
        line.split(',').next().unwrap_or("").trim()
    }
}
