//! HTTP client construction for the generative backend
//!
//! Built once per run and handed to the backend that owns it, so tests and
//! alternative backends never share process-wide state.

use crate::error::{PipelineError, Result};
use reqwest::Client;
use std::time::Duration;

/// Client tuned for long, single-shot generation requests:
/// - caller-supplied timeout (answer keys can take a while)
/// - a few idle connections, reused across the documents of one batch
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .map_err(|e| PipelineError::Backend(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_created() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
