use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

/// Attempts per upstream call: the original try plus two retries.
pub const MAX_ATTEMPTS: u32 = 3;

/// Base backoff duration. Actual delay is base * 3^attempt + jitter.
pub const RETRY_BASE: Duration = Duration::from_secs(1);

/// Error fragments that mark an upstream failure as transient. Anything
/// else fails fast; retrying a 401 or a schema mismatch only burns quota.
const TRANSIENT_MARKERS: &[&str] = &[
    "429",
    "500",
    "502",
    "503",
    "529",
    "timeout",
    "timed out",
    "connection",
    "network",
    "rate limit",
    "overloaded",
];

pub fn is_transient(error: &anyhow::Error) -> bool {
    let message = error.to_string().to_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| message.contains(m))
}

/// Run `op`, retrying transient failures up to `max_attempts` total tries
/// with exponential backoff plus random jitter (0-500ms).
pub async fn with_retries<T, F, Fut>(
    label: &str,
    max_attempts: u32,
    base: Duration,
    mut op: F,
) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 < max_attempts && is_transient(&e) => {
                let backoff = base * 3u32.pow(attempt);
                let jitter = Duration::from_millis(rand::rng().random_range(0..500));
                warn!(
                    label,
                    attempt = attempt + 1,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Transient upstream failure, retrying after backoff"
                );
                tokio::time::sleep(backoff + jitter).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn returns_first_success_without_retrying() {
        let calls = AtomicU32::new(0);
        let result = with_retries("test", 3, Duration::ZERO, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(7)
        })
        .await
        .unwrap();
        assert_eq!(result, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_errors_until_exhausted() {
        let calls = AtomicU32::new(0);
        let result: anyhow::Result<()> = with_retries("test", 3, Duration::ZERO, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!("connection reset by peer"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn recovers_when_a_later_attempt_succeeds() {
        let calls = AtomicU32::new(0);
        let result = with_retries("test", 3, Duration::ZERO, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 1 {
                    Err(anyhow::anyhow!("API error (status 503): overloaded"))
                } else {
                    Ok("ok")
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(result, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_errors_fail_fast() {
        let calls = AtomicU32::new(0);
        let result: anyhow::Result<()> = with_retries("test", 3, Duration::ZERO, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!("API error (status 401): bad token"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
