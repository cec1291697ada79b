use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::backend::{Backend, ItemUpdate};
use crate::model::WorkItemId;

/// Coalesces "this item needs a re-sync" signals into batched
/// `update_items` dispatches.
///
/// Requests landing within one scheduling tick go out as a single batch,
/// deduplicated by the `(item, force)` pair. A request arriving once a
/// dispatch is underway opens the next batch, so nothing is lost and the
/// batcher stays usable for the life of the engine.
pub struct UpdateBatcher {
    queue: mpsc::UnboundedSender<ItemUpdate>,
}

impl UpdateBatcher {
    /// Spawns the dispatch worker, so this must run inside a tokio runtime.
    pub fn new(backend: Arc<dyn Backend>) -> UpdateBatcher {
        let (queue, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_batches(backend, rx));
        UpdateBatcher { queue }
    }

    /// Fire-and-forget: a dispatch failure surfaces on the batch, never
    /// back through here.
    pub fn schedule(&self, work_item_id: WorkItemId, force: bool) {
        let _ = self.queue.send(ItemUpdate {
            work_item_id,
            force,
        });
    }
}

async fn run_batches(backend: Arc<dyn Backend>, mut rx: mpsc::UnboundedReceiver<ItemUpdate>) {
    while let Some(first) = rx.recv().await {
        // Let the rest of the current tick's requests land before draining.
        tokio::task::yield_now().await;

        let mut seen = HashSet::new();
        seen.insert((first.work_item_id.clone(), first.force));
        let mut batch = vec![first];
        while let Ok(update) = rx.try_recv() {
            if seen.insert((update.work_item_id.clone(), update.force)) {
                batch.push(update);
            }
        }

        debug!(items = batch.len(), "dispatching item update batch");
        if let Err(error) = backend.update_items(batch).await {
            warn!(%error, "item update batch failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::MockBackend;
    use std::time::Duration;

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn requests_in_one_tick_coalesce_into_one_batch() {
        let backend = Arc::new(MockBackend::default());
        let batcher = UpdateBatcher::new(backend.clone());

        batcher.schedule("a".into(), false);
        batcher.schedule("a".into(), false);
        batcher.schedule("a".into(), false);
        batcher.schedule("a".into(), true);
        settle().await;

        let calls = backend.update_items_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            [
                ItemUpdate {
                    work_item_id: "a".into(),
                    force: false,
                },
                ItemUpdate {
                    work_item_id: "a".into(),
                    force: true,
                },
            ]
        );
    }

    #[tokio::test]
    async fn distinct_items_share_the_batch() {
        let backend = Arc::new(MockBackend::default());
        let batcher = UpdateBatcher::new(backend.clone());

        batcher.schedule("a".into(), false);
        batcher.schedule("b".into(), false);
        settle().await;

        let calls = backend.update_items_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 2);
    }

    #[tokio::test]
    async fn a_new_request_after_a_flush_opens_a_new_batch() {
        let backend = Arc::new(MockBackend::default());
        let batcher = UpdateBatcher::new(backend.clone());

        batcher.schedule("a".into(), false);
        settle().await;
        batcher.schedule("b".into(), false);
        settle().await;

        let calls = backend.update_items_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0][0].work_item_id, WorkItemId::from("a"));
        assert_eq!(calls[1][0].work_item_id, WorkItemId::from("b"));
    }

    #[tokio::test]
    async fn a_failed_dispatch_does_not_kill_the_worker() {
        let backend = Arc::new(MockBackend::default());
        backend
            .fail_update_items
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let batcher = UpdateBatcher::new(backend.clone());

        batcher.schedule("a".into(), false);
        settle().await;
        backend
            .fail_update_items
            .store(false, std::sync::atomic::Ordering::SeqCst);
        batcher.schedule("b".into(), false);
        settle().await;

        let calls = backend.update_items_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
    }
}
