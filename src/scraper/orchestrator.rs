// src/scraper/orchestrator.rs
use crate::models::ScrapeResult;
use crate::scraper::extractor::Extractor;
use crate::scraper::fetcher::Fetcher;
use crate::scraper::types::{BatchPolicy, FetchPolicy};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Fans URL lists out to the fetch+extract pipeline in staggered bursts.
///
/// URLs are processed in chunks of `concurrency`; a chunk's pipelines run
/// concurrently and the whole chunk is awaited before the next one starts.
/// A hung request therefore delays its own chunk only (accepted
/// head-of-line tradeoff). Per-URL failures never touch sibling URLs.
pub struct ScrapeOrchestrator {
    fetcher: Arc<Fetcher>,
    extractor: Arc<Extractor>,
    policy: BatchPolicy,
}

impl ScrapeOrchestrator {
    pub fn new(fetch_policy: FetchPolicy, policy: BatchPolicy) -> crate::models::Result<Self> {
        Ok(Self {
            fetcher: Arc::new(Fetcher::new(fetch_policy)?),
            extractor: Arc::new(Extractor::new()),
            policy,
        })
    }

    pub fn max_batch_size(&self) -> usize {
        self.policy.max_batch_size
    }

    /// Scrapes one URL; never errors. Fetch and extraction failures come
    /// back as a failed ScrapeResult.
    pub async fn scrape_one(&self, url: &str) -> ScrapeResult {
        scrape_url(&self.fetcher, &self.extractor, url).await
    }

    /// Scrapes every URL, returning results in input order, one per URL.
    /// Callers enforce the batch-size cap; a malformed URL mid-batch yields
    /// a failed result at its index, not a batch abort.
    pub async fn run_batch(&self, urls: &[String]) -> Vec<ScrapeResult> {
        let started = Instant::now();
        info!(total = urls.len(), chunk = self.policy.concurrency, "🚀 starting batch scrape");

        let mut results = Vec::with_capacity(urls.len());

        for chunk in urls.chunks(self.policy.concurrency.max(1)) {
            let mut handles = Vec::with_capacity(chunk.len());
            for url in chunk {
                let fetcher = Arc::clone(&self.fetcher);
                let extractor = Arc::clone(&self.extractor);
                let url = url.clone();
                handles.push(tokio::spawn(async move {
                    scrape_url(&fetcher, &extractor, &url).await
                }));
            }

            // Await in spawn order so results land at their input index
            // even though completion order inside the chunk is unordered.
            for (handle, url) in handles.into_iter().zip(chunk) {
                match handle.await {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        error!(url = %url, error = %e, "scrape task panicked");
                        results.push(ScrapeResult::failed(
                            url.clone(),
                            format!("internal error: {}", e),
                        ));
                    }
                }
            }
        }

        let ok = results.iter().filter(|r| r.success).count();
        info!(
            total = results.len(),
            ok,
            failed = results.len() - ok,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "🏁 batch scrape complete"
        );
        results
    }
}

async fn scrape_url(fetcher: &Fetcher, extractor: &Extractor, url: &str) -> ScrapeResult {
    match fetcher.fetch(url).await {
        Ok(page) => {
            let data = extractor.extract(&page.html);
            info!(
                url,
                contacts = data.contacts.len(),
                phones = data.phone_numbers.len(),
                emails = data.email_addresses.len(),
                "scrape succeeded"
            );
            ScrapeResult::ok(url.to_string(), data)
        }
        Err(e) => {
            warn!(url, error = %e, "scrape failed");
            ScrapeResult::failed(url.to_string(), e.to_string())
        }
    }
}
