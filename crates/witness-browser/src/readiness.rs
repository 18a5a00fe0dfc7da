//! Server readiness probe
//!
//! Verification runs target a dev server that may still be starting up. The
//! probe polls the base URL with plain HTTP GETs until something answers or
//! its attempts run out, so a run never hangs on a server that
//! silently failed to start.

use tracing::{debug, warn};
use witness_core::{Result, RetryPolicy, WitnessError};

/// Poll a server until it answers an HTTP request
///
/// Any HTTP response counts as reachable, regardless of status; the point is
/// that something is listening. Each attempt is bounded by the policy's
/// per-attempt timeout, with a fixed sleep between attempts. Returns
/// `ServerUnreachable` once the attempt bound is reached.
pub async fn wait_for_server(url: &str, policy: &RetryPolicy) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(policy.attempt_timeout())
        .build()
        .map_err(|e| WitnessError::Other(format!("Failed to build HTTP client: {}", e)))?;

    for attempt in 1..=policy.attempts {
        match client.get(url).send().await {
            Ok(response) => {
                debug!(
                    "Server at {} answered with {} on attempt {}",
                    url,
                    response.status(),
                    attempt
                );
                return Ok(());
            }
            Err(e) => {
                warn!(
                    "Server at {} not ready (attempt {}/{}): {}",
                    url, attempt, policy.attempts, e
                );
            }
        }

        if attempt < policy.attempts {
            tokio::time::sleep(policy.interval()).await;
        }
    }

    Err(WitnessError::ServerUnreachable {
        url: url.to_string(),
        attempts: policy.attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn quick_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            interval_ms: 10,
            attempt_timeout_ms: 200,
        }
    }

    #[tokio::test]
    async fn test_probe_succeeds_against_listening_server() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        wait_for_server(&server.uri(), &quick_policy(3))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_any_http_status_counts_as_reachable() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        wait_for_server(&server.uri(), &quick_policy(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_probe_gives_up_within_bound() {
        let policy = quick_policy(2);
        let start = Instant::now();

        let err = wait_for_server("http://127.0.0.1:9", &policy)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WitnessError::ServerUnreachable { attempts: 2, .. }
        ));
        assert!(start.elapsed() <= policy.max_wait() + Duration::from_secs(2));
    }
}
