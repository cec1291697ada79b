use serde::{Deserialize, Serialize};

use super::WorkItemId;

/// One node of the backend-built tree: a work-item leaf (whose id is the
/// work item's id) or a named group. The tree arrives wholesale with every
/// `data` snapshot and is never patched locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub data: NodeData,
    #[serde(default)]
    pub is_modified: bool,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum NodeData {
    WorkItem,
    Group { name: String },
}

impl Node {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The referenced work item id, for work-item nodes.
    pub fn work_item_id(&self) -> Option<WorkItemId> {
        match self.data {
            NodeData::WorkItem => Some(WorkItemId(self.id.clone())),
            NodeData::Group { .. } => None,
        }
    }

    pub fn collect_work_item_ids(&self, out: &mut Vec<WorkItemId>) {
        if let Some(id) = self.work_item_id() {
            out.push(id);
        }
        for child in &self.children {
            child.collect_work_item_ids(out);
        }
    }
}
