use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a fixed minimum spacing between outgoing requests.
///
/// Not a token bucket: every request is separated from the previous one by
/// at least `60 / requests_per_minute` seconds. The timestamp is held behind
/// a mutex so concurrent callers on one client queue up instead of racing.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last_request: Mutex<Instant>,
}

impl Pacer {
    /// `requests_per_minute` must be non-zero; the client validates this
    /// before constructing a pacer.
    pub fn new(requests_per_minute: u32) -> Self {
        let interval = Duration::from_secs_f64(60.0 / f64::from(requests_per_minute));
        // Pre-age the timestamp so the first request goes out immediately.
        let last = Instant::now()
            .checked_sub(interval)
            .unwrap_or_else(Instant::now);
        Self {
            interval,
            last_request: Mutex::new(last),
        }
    }

    /// Waits until the minimum interval since the previous request has
    /// elapsed, then records the current time as the new last-request mark.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.interval {
            let wait = self.interval - elapsed;
            debug!(wait_ms = wait.as_millis() as u64, "pacing outgoing request");
            tokio::time::sleep(wait).await;
        }
        *last = Instant::now();
    }
}
