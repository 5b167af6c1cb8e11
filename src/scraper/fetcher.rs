// src/scraper/fetcher.rs
use crate::error::ScrapeError;
use crate::scraper::types::FetchPolicy;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// A delivered page. Status may still be an error page below 500 — the
/// extractor gets to look at those too.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub final_url: String,
    pub status: u16,
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
];

/// Fetches pages with an escalating-realism retry strategy: each of the
/// three attempts uses a progressively less browser-like client, on the
/// theory that whatever rejected the previous profile may wave a plainer
/// request through.
pub struct Fetcher {
    policy: FetchPolicy,
    clients: Vec<Client>,
}

impl Fetcher {
    pub fn new(policy: FetchPolicy) -> crate::models::Result<Self> {
        // One client per attempt profile; timeout and redirect budget grow
        // as the header set shrinks.
        let clients = vec![
            Client::builder()
                .timeout(Duration::from_secs(policy.timeouts_secs[0]))
                .redirect(Policy::limited(8))
                .build()?,
            Client::builder()
                .timeout(Duration::from_secs(policy.timeouts_secs[1]))
                .redirect(Policy::limited(15))
                .build()?,
            Client::builder()
                .timeout(Duration::from_secs(policy.timeouts_secs[2]))
                .redirect(Policy::limited(20))
                .build()?,
        ];
        Ok(Self { policy, clients })
    }

    /// Fetches `url`, retrying transient failures up to the attempt budget.
    ///
    /// Invalid URLs fail before any network traffic. Non-retryable failures
    /// (4xx answers, DNS, refused connections) short-circuit the loop;
    /// exhausting the budget surfaces the last error and the attempt count.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        let parsed =
            Url::parse(url).map_err(|e| ScrapeError::InvalidInput(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScrapeError::InvalidInput(format!(
                "{}: unsupported scheme '{}'",
                url,
                parsed.scheme()
            )));
        }

        let mut last_error: Option<ScrapeError> = None;

        for attempt in 1..=self.policy.max_attempts {
            if attempt > 1 {
                let delay = self.inter_attempt_delay(attempt);
                debug!(url, attempt, delay_ms = delay.as_millis() as u64, "backing off before retry");
                tokio::time::sleep(delay).await;
            }

            match self.attempt(url, attempt).await {
                Ok(page) => {
                    info!(url, attempt, status = page.status, "fetch succeeded");
                    return Ok(page);
                }
                Err(e) => {
                    warn!(url, attempt, error = %e, "fetch attempt failed");
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(ScrapeError::ExhaustedRetries {
            attempts: self.policy.max_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn attempt(&self, url: &str, attempt: u32) -> Result<FetchedPage, ScrapeError> {
        let client = &self.clients[(attempt as usize - 1).min(self.clients.len() - 1)];
        let mut request = client.get(url);
        // Attempt 1: full browser disguise. Attempt 2: just the basics.
        // Attempt 3: a completely plain request.
        match attempt {
            1 => request = request.headers(full_browser_headers()),
            2 => request = request.headers(minimal_headers()),
            _ => {}
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status().as_u16();
        debug!(url, attempt, status, "response received");

        if status >= 400 {
            return Err(ScrapeError::from_status(status, url));
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::TransientNetwork(format!("body read failed: {}", e)))?;

        Ok(FetchedPage {
            html,
            final_url,
            status,
        })
    }

    /// Progressive delay before attempts 2 and 3: 1s times the upcoming
    /// attempt number, plus 0.5-1.5s of jitter so bursts decorrelate and
    /// the timing looks less mechanical. Tests zero both knobs out.
    fn inter_attempt_delay(&self, attempt: u32) -> Duration {
        let base = self.policy.base_delay_ms * u64::from(attempt);
        let jitter = if self.policy.jitter_ms > 0 {
            fastrand::u64(self.policy.jitter_ms / 2..=self.policy.jitter_ms * 3 / 2)
        } else {
            0
        };
        Duration::from_millis(base + jitter)
    }
}

fn classify_transport_error(e: reqwest::Error) -> ScrapeError {
    if e.is_timeout() {
        return ScrapeError::TransientNetwork(format!("timeout: {}", e));
    }
    // reqwest does not expose DNS/refused distinctly; go by the error chain
    // text, the same strings the classifier in error.rs keys on.
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(inner) = source {
        message = format!("{}: {}", message, inner);
        source = std::error::Error::source(inner);
    }
    ScrapeError::TransientNetwork(message)
}

fn full_browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let ua = USER_AGENTS[fastrand::usize(..USER_AGENTS.len())];
    headers.insert(USER_AGENT, HeaderValue::from_static(ua));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("fi-FI,fi;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("cross-site"));
    headers.insert("Sec-Fetch-User", HeaderValue::from_static("?1"));
    headers
}

fn minimal_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let ua = USER_AGENTS[fastrand::usize(..USER_AGENTS.len())];
    headers.insert(USER_AGENT, HeaderValue::from_static(ua));
    headers.insert(ACCEPT, HeaderValue::from_static("text/html,*/*;q=0.8"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("fi-FI,fi;q=0.9,en;q=0.8"));
    headers
}
