//! In-process notifier for tests and local runs

use super::{DeliveryId, Notifier, NotifyError, NotifyResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Records messages instead of sending them
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failures_left: AtomicU32,
    always_fail: bool,
    counter: AtomicU32,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send with a permanent error
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    /// Fail the next `n` sends before anything is sent
    pub fn fail_times(self, n: u32) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// `(destination, body)` pairs, oldest first
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn attempts(&self) -> u32 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, body: &str, destination: &str) -> NotifyResult<DeliveryId> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;

        if self.always_fail {
            return Err(NotifyError::Api {
                status: 400,
                message: "The 'To' number is not a valid phone number.".to_string(),
            });
        }

        let transient = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if transient {
            return Err(NotifyError::Unsent("connection refused".to_string()));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push((destination.to_string(), body.to_string()));
        }
        Ok(DeliveryId(format!("SM_MOCK_{:04}", n)))
    }
}
