use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Changes, Fields, Filters, Node, WorkItem, WorkItemId};

/// The whole mirrored snapshot. A `data` push replaces it atomically;
/// `workItem` pushes upsert single `work_items` entries.
///
/// While changes are being previewed, `work_items` holds the modified
/// versions and `original_work_items` keeps the shadowed committed ones.
/// With no staged changes, `original_work_items` is empty.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    pub fields: Fields,
    pub work_items: HashMap<WorkItemId, WorkItem>,
    pub nodes: Vec<Node>,
    pub original_work_items: HashMap<WorkItemId, WorkItem>,
    pub filters: Filters,
    pub changes: Changes,
}

impl Data {
    /// True iff at least one committed value is shadowed by a staged
    /// change. A pure projection of backend-reported state.
    pub fn has_pending_changes(&self) -> bool {
        !self.original_work_items.is_empty()
    }

    /// Every work item id referenced by the tree, depth-first.
    pub fn node_work_item_ids(&self) -> Vec<WorkItemId> {
        let mut ids = Vec::new();
        for node in &self.nodes {
            node.collect_work_item_ids(&mut ids);
        }
        ids
    }
}
