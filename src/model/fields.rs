use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// The fixed set of recognized field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Status,
    Blocked,
    Epic,
    Iteration,
    Kind,
    Workstream,
    ProjectMilestone,
    Estimate,
    Priority,
}

impl FieldName {
    pub const ALL: [FieldName; 9] = [
        FieldName::Status,
        FieldName::Blocked,
        FieldName::Epic,
        FieldName::Iteration,
        FieldName::Kind,
        FieldName::Workstream,
        FieldName::ProjectMilestone,
        FieldName::Estimate,
        FieldName::Priority,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Status => "status",
            FieldName::Blocked => "blocked",
            FieldName::Epic => "epic",
            FieldName::Iteration => "iteration",
            FieldName::Kind => "kind",
            FieldName::Workstream => "workstream",
            FieldName::ProjectMilestone => "projectMilestone",
            FieldName::Estimate => "estimate",
            FieldName::Priority => "priority",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    SingleSelect,
    Iteration,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::SingleSelect => f.write_str("single-select"),
            FieldKind::Iteration => f.write_str("iteration"),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldId(pub String);

#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldOptionId(pub String);

impl From<String> for FieldOptionId {
    fn from(value: String) -> Self {
        FieldOptionId(value)
    }
}

impl From<&str> for FieldOptionId {
    fn from(value: &str) -> Self {
        FieldOptionId(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub id: FieldOptionId,
    pub value: String,
}

/// One field of the schema: its backend id, display name, kind, and the
/// enumerated options (for an iteration field, the iterations themselves).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl Field {
    pub fn blank(name: &str, kind: FieldKind) -> Field {
        Field {
            id: FieldId::default(),
            name: name.to_owned(),
            kind,
            options: Vec::new(),
        }
    }

    /// Resolves an option id to its display value. Unknown and absent ids
    /// resolve to `None`.
    pub fn option_name(&self, id: Option<&FieldOptionId>) -> Option<&str> {
        let id = id?;
        self.options
            .iter()
            .find(|option| option.id == *id)
            .map(|option| option.value.as_str())
    }

    pub fn option_id(&self, name: &str) -> Option<&FieldOptionId> {
        self.options
            .iter()
            .find(|option| option.value == name)
            .map(|option| &option.id)
    }
}

/// The field schema. Created blank at startup and replaced wholesale
/// whenever a full snapshot arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fields {
    pub project_id: String,
    pub status: Field,
    pub blocked: Field,
    pub epic: Field,
    pub iteration: Field,
    pub kind: Field,
    pub workstream: Field,
    pub project_milestone: Field,
    pub estimate: Field,
    pub priority: Field,
}

impl Default for Fields {
    fn default() -> Self {
        Fields {
            project_id: String::new(),
            status: Field::blank("Status", FieldKind::SingleSelect),
            blocked: Field::blank("Blocked", FieldKind::SingleSelect),
            epic: Field::blank("Epic", FieldKind::SingleSelect),
            iteration: Field::blank("Iteration", FieldKind::Iteration),
            kind: Field::blank("Kind", FieldKind::SingleSelect),
            workstream: Field::blank("Workstream", FieldKind::SingleSelect),
            project_milestone: Field::blank("Project Milestone", FieldKind::SingleSelect),
            estimate: Field::blank("Estimate", FieldKind::SingleSelect),
            priority: Field::blank("Priority", FieldKind::SingleSelect),
        }
    }
}

impl Fields {
    pub fn get(&self, name: FieldName) -> &Field {
        match name {
            FieldName::Status => &self.status,
            FieldName::Blocked => &self.blocked,
            FieldName::Epic => &self.epic,
            FieldName::Iteration => &self.iteration,
            FieldName::Kind => &self.kind,
            FieldName::Workstream => &self.workstream,
            FieldName::ProjectMilestone => &self.project_milestone,
            FieldName::Estimate => &self.estimate,
            FieldName::Priority => &self.priority,
        }
    }

    /// Checked narrowing to a single-select field.
    pub fn single_select(&self, name: FieldName) -> Result<&Field, Error> {
        self.of_kind(name, FieldKind::SingleSelect)
    }

    /// Checked narrowing to an iteration field.
    pub fn iteration_field(&self, name: FieldName) -> Result<&Field, Error> {
        self.of_kind(name, FieldKind::Iteration)
    }

    fn of_kind(&self, name: FieldName, kind: FieldKind) -> Result<&Field, Error> {
        let field = self.get(name);
        if field.kind != kind {
            return Err(Error::InvalidFieldKind {
                field: name,
                expected: kind,
            });
        }
        Ok(field)
    }
}
