use serde::{Deserialize, Serialize};

use super::{FieldName, FieldOptionId, LoadState};

#[derive(Default, PartialEq, Eq, Debug, Hash, Clone, Serialize, Deserialize)]
pub struct WorkItemId(pub String);

impl From<String> for WorkItemId {
    fn from(value: String) -> Self {
        WorkItemId(value)
    }
}

impl From<&str> for WorkItemId {
    fn from(value: &str) -> Self {
        WorkItemId(value.to_owned())
    }
}

#[derive(Default, PartialEq, Eq, Debug, Hash, Clone, Serialize, Deserialize)]
pub struct ProjectItemId(pub String);

/// An issue, pull request, or draft issue as mirrored from the backend.
/// Owned by the engine's snapshot; the UI only ever reads references.
#[derive(Default, PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: WorkItemId,
    pub title: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_name_with_owner: Option<String>,
    pub data: WorkItemData,
    pub project_item: ProjectItem,
}

impl WorkItem {
    pub fn sub_issues(&self) -> Option<&[WorkItemId]> {
        match &self.data {
            WorkItemData::Issue(issue) => Some(&issue.sub_issues),
            _ => None,
        }
    }

    pub fn parent_id(&self) -> Option<&WorkItemId> {
        match &self.data {
            WorkItemData::Issue(issue) => issue.parent_id.as_ref(),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> LoadState<bool> {
        match &self.data {
            WorkItemData::DraftIssue => false.into(),
            WorkItemData::Issue(issue) => issue.state.map(|s| *s == IssueState::Closed),
            WorkItemData::PullRequest(pull_request) => pull_request
                .state
                .map(|s| matches!(s, PullRequestState::Merged | PullRequestState::Closed)),
        }
    }

    /// True once every lazily retrieved part of the item has arrived.
    pub fn is_loaded(&self) -> bool {
        if let WorkItemData::Issue(issue) = &self.data {
            if !issue.state.is_loaded() {
                return false;
            }
        }
        self.project_item.is_loaded()
    }

    pub fn describe(&self) -> String {
        match &self.resource_path {
            Some(resource_path) => resource_path.clone(),
            None => format!("[{}]", self.id.0),
        }
    }
}

#[derive(Default, PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum WorkItemData {
    #[default]
    DraftIssue,
    Issue(Issue),
    PullRequest(PullRequest),
}

#[derive(Default, PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<WorkItemId>,
    #[serde(default)]
    pub issue_type: LoadState<Option<String>>,
    #[serde(default)]
    pub state: LoadState<IssueState>,
    #[serde(default)]
    pub sub_issues: Vec<WorkItemId>,
    #[serde(default)]
    pub tracked_issues: LoadState<Vec<WorkItemId>>,
    #[serde(default)]
    pub assignees: Vec<String>,
}

impl Issue {
    pub fn default_loaded() -> Issue {
        Issue {
            issue_type: None.into(),
            state: IssueState::default().into(),
            tracked_issues: Vec::new().into(),
            ..Default::default()
        }
    }
}

#[derive(Default, PartialEq, Eq, Debug, Hash, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    Other(String),
}

#[derive(Default, PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    #[serde(default)]
    pub state: LoadState<PullRequestState>,
    #[serde(default)]
    pub assignees: Vec<String>,
}

#[derive(Default, PartialEq, Eq, Debug, Hash, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    #[default]
    Open,
    Merged,
    Closed,
    Other(String),
}

pub type FieldValue = LoadState<Option<FieldOptionId>>;

/// Per-field values for one item. `status`, `epic`, `estimate` and
/// `priority` arrive with the item itself; the rest load lazily.
#[derive(Default, PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub id: ProjectItemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    pub updated_at: String,
    pub status: Option<FieldOptionId>,
    pub epic: Option<FieldOptionId>,
    pub estimate: Option<FieldOptionId>,
    pub priority: Option<FieldOptionId>,
    #[serde(default)]
    pub iteration: FieldValue,
    #[serde(default)]
    pub blocked: FieldValue,
    #[serde(default)]
    pub kind: FieldValue,
    #[serde(default)]
    pub workstream: FieldValue,
    #[serde(default)]
    pub project_milestone: FieldValue,
}

impl ProjectItem {
    pub fn default_loaded() -> ProjectItem {
        ProjectItem {
            iteration: None.into(),
            blocked: None.into(),
            kind: None.into(),
            workstream: None.into(),
            project_milestone: None.into(),
            ..Default::default()
        }
    }

    /// The current option id for a field, regardless of whether the field
    /// loads eagerly or lazily. `None` while unset or not yet loaded.
    pub fn field_value(&self, field: FieldName) -> Option<&FieldOptionId> {
        match field {
            FieldName::Status => self.status.as_ref(),
            FieldName::Epic => self.epic.as_ref(),
            FieldName::Estimate => self.estimate.as_ref(),
            FieldName::Priority => self.priority.as_ref(),
            FieldName::Iteration => self.iteration.flatten(),
            FieldName::Blocked => self.blocked.flatten(),
            FieldName::Kind => self.kind.flatten(),
            FieldName::Workstream => self.workstream.flatten(),
            FieldName::ProjectMilestone => self.project_milestone.flatten(),
        }
    }

    fn is_loaded(&self) -> bool {
        self.iteration.is_loaded()
            && self.blocked.is_loaded()
            && self.kind.is_loaded()
            && self.workstream.is_loaded()
            && self.project_milestone.is_loaded()
    }
}
