//! Retry with exponential backoff for transient Cin7 failures.
//!
//! Mirrors the Shopify client's policy: 429, 5xx, and network-level failures
//! retry; everything else propagates immediately. "Not found" never reaches
//! this layer — lookups translate empty results to `None` before returning.

use std::future::Future;
use std::time::Duration;

use crate::error::Cin7Error;

fn is_retriable(err: &Cin7Error) -> bool {
    match err {
        Cin7Error::RateLimited { .. } | Cin7Error::Http(_) => true,
        Cin7Error::UnexpectedStatus { status, .. } => *status >= 500,
        Cin7Error::Deserialize { .. } | Cin7Error::InvalidBaseUrl { .. } => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, Cin7Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Cin7Error>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_secs,
                    error = %err,
                    "transient Cin7 error — retrying after backoff"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn server_error_retriable_client_error_not() {
        assert!(is_retriable(&Cin7Error::UnexpectedStatus {
            status: 502,
            url: "https://inventory.example.com".to_owned(),
            body: String::new(),
        }));
        assert!(!is_retriable(&Cin7Error::UnexpectedStatus {
            status: 400,
            url: "https://inventory.example.com".to_owned(),
            body: String::new(),
        }));
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(Cin7Error::RateLimited {
                        retry_after_secs: 0,
                    })
                } else {
                    Ok::<u32, Cin7Error>(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_deserialize_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                let e = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
                Err::<u32, Cin7Error>(Cin7Error::Deserialize {
                    context: "test".to_owned(),
                    source: e,
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(Cin7Error::Deserialize { .. })));
    }
}
