use serde::{Deserialize, Serialize};
use std::mem::{discriminant, Discriminant};
use tracing::warn;

use super::{FieldName, FieldOptionId, WorkItemId};

/// A single staged edit: which item, and the typed field/value pair.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub work_item_id: WorkItemId,
    pub data: ChangeData,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum ChangeData {
    IssueType(Option<String>),
    Status(Option<FieldOptionId>),
    Blocked(Option<FieldOptionId>),
    Epic(Option<FieldOptionId>),
    Iteration(Option<FieldOptionId>),
    Kind(Option<FieldOptionId>),
    Workstream(Option<FieldOptionId>),
    Estimate(Option<FieldOptionId>),
    Priority(Option<FieldOptionId>),
    SetParent(WorkItemId),
    AddToProject,
}

impl ChangeData {
    /// Maps a UI field edit onto its change variant. `None` for fields
    /// that are readable but not editable.
    pub fn field_edit(field: FieldName, value: Option<FieldOptionId>) -> Option<ChangeData> {
        match field {
            FieldName::Status => Some(ChangeData::Status(value)),
            FieldName::Blocked => Some(ChangeData::Blocked(value)),
            FieldName::Epic => Some(ChangeData::Epic(value)),
            FieldName::Iteration => Some(ChangeData::Iteration(value)),
            FieldName::Kind => Some(ChangeData::Kind(value)),
            FieldName::Workstream => Some(ChangeData::Workstream(value)),
            FieldName::Estimate => Some(ChangeData::Estimate(value)),
            FieldName::Priority => Some(ChangeData::Priority(value)),
            FieldName::ProjectMilestone => None,
        }
    }
}

/// Identity of a staged change: one slot per `(item, field)` pair.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ChangeKey {
    pub work_item_id: WorkItemId,
    pub data_type: Discriminant<ChangeData>,
}

impl Change {
    pub fn key(&self) -> ChangeKey {
        ChangeKey {
            work_item_id: self.work_item_id.clone(),
            data_type: discriminant(&self.data),
        }
    }
}

/// The staged-change overlay, in the order the edits were made. A later
/// edit to the same `(item, field)` slot replaces the earlier one in
/// place.
#[derive(Default, Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changes {
    data: Vec<Change>,
}

impl Changes {
    pub fn add(&mut self, change: Change) {
        let key = change.key();
        if let Some(existing) = self.data.iter_mut().find(|c| c.key() == key) {
            if *existing != change {
                warn!(?change, replaces = ?existing, "staged change replaces a different value");
            }
            *existing = change;
        } else {
            self.data.push(change);
        }
    }

    /// Removing a change that is not staged is a no-op.
    pub fn remove(&mut self, change: &Change) {
        let key = change.key();
        self.data.retain(|c| c.key() != key);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.data.iter()
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl FromIterator<Change> for Changes {
    fn from_iter<T: IntoIterator<Item = Change>>(iter: T) -> Self {
        let mut changes = Changes::default();
        for change in iter {
            changes.add(change);
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_change(item: &str, option: &str) -> Change {
        Change {
            work_item_id: item.into(),
            data: ChangeData::Status(Some(option.into())),
        }
    }

    #[test]
    fn add_replaces_the_same_slot() {
        let mut changes = Changes::default();
        changes.add(status_change("a", "s1"));
        changes.add(status_change("a", "s2"));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes.iter().next(), Some(&status_change("a", "s2")));
    }

    #[test]
    fn different_fields_occupy_different_slots() {
        let mut changes = Changes::default();
        changes.add(status_change("a", "s1"));
        changes.add(Change {
            work_item_id: "a".into(),
            data: ChangeData::Epic(None),
        });

        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut changes = Changes::default();
        changes.add(status_change("b", "s1"));
        changes.add(status_change("a", "s1"));
        changes.add(status_change("b", "s2"));

        let order: Vec<&WorkItemId> = changes.iter().map(|c| &c.work_item_id).collect();
        assert_eq!(order, [&WorkItemId::from("b"), &WorkItemId::from("a")]);
    }

    #[test]
    fn remove_of_an_absent_change_is_a_noop() {
        let mut changes = Changes::default();
        changes.add(status_change("a", "s1"));
        changes.remove(&status_change("b", "s1"));

        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn remove_matches_by_item_and_field() {
        let mut changes = Changes::default();
        changes.add(status_change("a", "s1"));
        // A different value for the same slot still removes it.
        changes.remove(&status_change("a", "s2"));

        assert!(changes.is_empty());
    }

    #[test]
    fn field_edit_covers_every_editable_field() {
        for field in FieldName::ALL {
            let edit = ChangeData::field_edit(field, Some("o1".into()));
            if field == FieldName::ProjectMilestone {
                assert!(edit.is_none());
            } else {
                assert!(edit.is_some());
            }
        }
    }

    #[test]
    fn change_data_serializes_with_type_and_value_tags() {
        let change = status_change("item-1", "s1");
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["workItemId"], "item-1");
        assert_eq!(json["data"]["type"], "status");
        assert_eq!(json["data"]["value"], "s1");
    }
}
