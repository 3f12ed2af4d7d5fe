//! Focus capture watchdog.
//!
//! External widgets (video surfaces, webviews) can steal input focus
//! without telling us. While a screen owns focus, a background task pings
//! the event loop on a short interval so the app can re-assert the current
//! route. The task is cancelled whenever a modal opens or the screen is
//! torn down.

use crate::event::CapturePing;
use crate::screens::ScreenKey;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::trace;

#[derive(Debug, Default)]
pub struct FocusWatchdog {
    handle: Option<JoinHandle<()>>,
}

impl FocusWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pinging for `key`, replacing any previous watchdog. Must be
    /// called from within a tokio runtime context.
    pub fn start(&mut self, key: ScreenKey, interval: Duration, tx: UnboundedSender<CapturePing>) {
        self.cancel();
        trace!(key = %key, ?interval, "watchdog start");
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a freshly
            // mounted screen is not re-asserted before first render.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(CapturePing { key: key.clone() }).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl Drop for FocusWatchdog {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_watchdog_pings_on_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watchdog = FocusWatchdog::new();
        watchdog.start(ScreenKey::browse_movies(), Duration::from_millis(5), tx);

        let ping = tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("ping in time")
            .expect("channel open");
        assert_eq!(ping.key, ScreenKey::browse_movies());
        watchdog.cancel();
    }

    #[tokio::test]
    async fn test_restart_replaces_previous_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watchdog = FocusWatchdog::new();
        watchdog.start(ScreenKey::browse_movies(), Duration::from_millis(5), tx.clone());
        watchdog.start(ScreenKey::browse_series(), Duration::from_millis(5), tx);

        let ping = tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("ping in time")
            .expect("channel open");
        assert_eq!(ping.key, ScreenKey::browse_series());
        watchdog.cancel();
    }

    #[tokio::test]
    async fn test_cancel_stops_pings() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watchdog = FocusWatchdog::new();
        watchdog.start(ScreenKey::browse_movies(), Duration::from_millis(5), tx);
        watchdog.cancel();
        // Drain anything sent before the abort landed, then expect silence.
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!watchdog.is_running());
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }
}
