use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::model::{Change, Data, Filters, WorkItem, WorkItemId};
use crate::progress::ProgressMeter;

/// One entry of a batched re-sync request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub work_item_id: WorkItemId,
    pub force: bool,
}

/// A message pushed by the backend. Messages are applied strictly in
/// arrival order; an unrecognized tag fails deserialization at the
/// transport boundary rather than being silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum PushUpdate {
    /// Replace the entire snapshot.
    Data(Box<Data>),
    /// Update the load-progress fraction; the snapshot is untouched.
    Progress { done: usize, total: usize },
    /// Upsert a single work item; the tree is untouched.
    WorkItem(Box<WorkItem>),
}

/// The authoritative store this layer mirrors. Everything durable lives
/// behind this trait, and the engine never mutates its mirror ahead of a
/// confirmation from here.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Full snapshot fetch, streaming `(done, total)` samples into
    /// `progress` while retrieving.
    async fn get_data(&self, force_refresh: bool, progress: ProgressMeter) -> Result<Data>;

    /// Establishes the push subscription. Called once per engine lifetime,
    /// before any other call; later calls must not block on it.
    async fn watch_data(&self, channel: mpsc::UnboundedSender<PushUpdate>) -> Result<()>;

    /// Asks the backend to push a fresh `data` message; the new snapshot
    /// arrives on the push channel, not as a return value.
    async fn force_refresh_data(&self) -> Result<()>;

    /// Batched per-item re-sync, dispatched by the update batcher.
    async fn update_items(&self, items: Vec<ItemUpdate>) -> Result<()>;

    /// Reparents an issue's tracked issues as sub-issues. The result
    /// arrives as a later push update.
    async fn convert_tracked_issues_to_sub_issue(&self, id: &WorkItemId) -> Result<()>;

    /// Asks the backend to stage its standard cleanup edits. The result
    /// arrives as a later push update.
    async fn sanitize(&self) -> Result<()>;

    /// Persists the filter selection.
    async fn set_filters(&self, filters: Filters) -> Result<()>;

    async fn add_change(&self, change: Change) -> Result<()>;

    /// Un-stages one change, matched by work item and field. Unstaged
    /// changes are ignored.
    async fn remove_change(&self, change: Change) -> Result<()>;

    /// Clears the whole overlay.
    async fn delete_changes(&self) -> Result<()>;

    /// Toggles whether reported values include staged changes.
    async fn set_preview_changes(&self, preview: bool) -> Result<()>;

    /// Durably commits every staged change, streaming `(done, total)`
    /// samples into `progress`. Afterwards the overlay is empty.
    async fn save_changes(&self, progress: ProgressMeter) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_updates_carry_the_wire_tags() {
        let update = PushUpdate::Progress { done: 2, total: 5 };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["value"]["done"], 2);
        assert_eq!(json["value"]["total"], 5);

        let update = PushUpdate::Data(Box::default());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "data");
    }

    #[test]
    fn unknown_push_tags_are_rejected() {
        let result: Result<PushUpdate, _> =
            serde_json::from_str(r#"{"type":"nonsense","value":null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn work_item_update_round_trips() {
        let update = PushUpdate::WorkItem(Box::new(WorkItem {
            id: "x".into(),
            title: "A title".into(),
            ..Default::default()
        }));
        let json = serde_json::to_string(&update).unwrap();
        let round_tripped: PushUpdate = serde_json::from_str(&json).unwrap();
        match round_tripped {
            PushUpdate::WorkItem(item) => assert_eq!(item.id, WorkItemId::from("x")),
            other => panic!("unexpected update: {other:?}"),
        }
    }
}
