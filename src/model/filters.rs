use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{FieldName, FieldOptionId};

/// Per-field filter selections. A missing entry means "unset/any"; a
/// present entry lists the option ids allowed through. Mutated only by
/// explicit user filter actions and persisted by the backend.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters {
    selections: HashMap<FieldName, Vec<FieldOptionId>>,
}

impl Filters {
    pub fn get(&self, field: FieldName) -> Option<&[FieldOptionId]> {
        self.selections.get(&field).map(Vec::as_slice)
    }

    /// `None` clears the selection back to "any".
    pub fn set(&mut self, field: FieldName, selection: Option<Vec<FieldOptionId>>) {
        match selection {
            Some(ids) => {
                self.selections.insert(field, ids);
            }
            None => {
                self.selections.remove(&field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_mean_any() {
        let filters = Filters::default();
        for field in FieldName::ALL {
            assert_eq!(filters.get(field), None);
        }
    }

    #[test]
    fn set_and_clear_round_trip() {
        let mut filters = Filters::default();
        filters.set(FieldName::Status, Some(vec!["s1".into(), "s2".into()]));

        assert_eq!(
            filters.get(FieldName::Status),
            Some(&["s1".into(), "s2".into()][..])
        );
        assert_eq!(filters.get(FieldName::Epic), None);

        filters.set(FieldName::Status, None);
        assert_eq!(filters.get(FieldName::Status), None);
    }

    #[test]
    fn serializes_as_a_plain_map() {
        let mut filters = Filters::default();
        filters.set(FieldName::ProjectMilestone, Some(vec!["m1".into()]));

        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json["projectMilestone"][0], "m1");

        let round_tripped: Filters = serde_json::from_value(json).unwrap();
        assert_eq!(round_tripped, filters);
    }
}
