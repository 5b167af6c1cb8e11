// src/error.rs
use thiserror::Error;

/// Classified failure of a single fetch+extract pipeline.
///
/// The retryable/terminal split drives the fetch loop: `InvalidInput` and
/// `ClientError` stop the attempt budget immediately, everything network-ish
/// is retried until the budget runs out and surfaces as `ExhaustedRetries`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL: {0}")]
    InvalidInput(String),

    #[error("HTTP {status} from {url}")]
    ClientError { status: u16, url: String },

    #[error("network error: {0}")]
    TransientNetwork(String),

    #[error("all {attempts} attempts failed, last error: {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: String },

    #[error("extraction failed: {0}")]
    ParseFailure(String),
}

impl ScrapeError {
    /// True when another attempt with a different request profile can help.
    ///
    /// DNS failures and refused connections are terminal even though they
    /// arrive as transport errors: the host is not going to appear between
    /// attempts two seconds apart.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScrapeError::TransientNetwork(msg) => {
                let msg = msg.to_lowercase();
                !(msg.contains("dns") || msg.contains("connection refused"))
            }
            ScrapeError::InvalidInput(_)
            | ScrapeError::ClientError { .. }
            | ScrapeError::ExhaustedRetries { .. }
            | ScrapeError::ParseFailure(_) => false,
        }
    }

    /// Classifies a response status after the transport has delivered it.
    /// 400/401/403/404 are authoritative answers, not flakiness.
    pub fn from_status(status: u16, url: &str) -> Self {
        match status {
            400 | 401 | 403 | 404 => ScrapeError::ClientError {
                status,
                url: url.to_string(),
            },
            _ => ScrapeError::TransientNetwork(format!("HTTP {} from {}", status, url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_not_retryable() {
        for status in [400, 401, 403, 404] {
            let err = ScrapeError::from_status(status, "https://example.com");
            assert!(matches!(err, ScrapeError::ClientError { .. }));
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn server_errors_are_retryable() {
        for status in [500, 502, 503] {
            let err = ScrapeError::from_status(status, "https://example.com");
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn dns_and_refused_connections_are_terminal() {
        assert!(!ScrapeError::TransientNetwork("dns error: no records".into()).is_retryable());
        assert!(!ScrapeError::TransientNetwork("connection refused".into()).is_retryable());
        assert!(ScrapeError::TransientNetwork("operation timed out".into()).is_retryable());
    }
}
