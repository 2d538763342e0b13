use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Delivers only the last value handed to it within `delay`.
pub struct Debouncer {
    delay: Duration,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace whatever is pending with `value`, sent on `tx` once the delay
    /// passes without another call. Must be called inside a tokio runtime.
    pub fn call<T: Send + 'static>(&mut self, value: T, tx: mpsc::UnboundedSender<T>) {
        self.cancel();
        let token = CancellationToken::new();
        let child = token.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // receiver gone means the app is shutting down
                    let _ = tx.send(value);
                }
            }
        });
        self.pending = Some(token);
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
