//! Backoff for idempotent upstream reads.
//!
//! A read is repeated only when the connection could not be made or timed
//! out. Builder, redirect and body errors fail at once, and any response,
//! whatever its status, goes back to the caller.

use std::time::Duration;

/// Pause before each repeat; its length bounds the number of repeats.
const BACKOFF: [Duration; 3] = [
    Duration::from_millis(200),
    Duration::from_millis(400),
    Duration::from_millis(800),
];

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

pub(crate) async fn retry_send<F, Fut>(send: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut pauses = BACKOFF.iter();
    loop {
        let err = match send().await {
            Ok(resp) => return Ok(resp),
            Err(err) => err,
        };
        match pauses.next() {
            Some(pause) if is_transient(&err) => {
                tracing::warn!(?pause, error = %err, "upstream unreachable, reading again");
                tokio::time::sleep(*pause).await;
            }
            _ => return Err(err),
        }
    }
}
