use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::provider::ProviderInner;

/// Periodically evicts expired, settled entries from a provider's refresh
/// map. Bound to the owning `Provider`'s lifetime: the task is aborted
/// (never merely dropped-and-leaked) when the `Pruner` is dropped, so it
/// cannot keep the process alive or outlive its provider.
pub struct Pruner {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl Pruner {
    pub fn spawn(inner: Arc<ProviderInner>, interval: StdDuration) -> Self {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let evicted = inner.prune_refresh_map();
                        if evicted > 0 {
                            tracing::debug!(evicted, "pruned expired refresh-map entries");
                        }
                    }
                }
            }
        });

        Self { handle, cancel }
    }
}

impl Drop for Pruner {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}
