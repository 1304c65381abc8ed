use crate::workflows::state::{Action, WorkflowState};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque field bag for records the client passes through without modelling.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

pub const RESUBMITTAL_TYPE: &str = "Re-Submittal";

/// Outer shape of every `api/method/...` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodResponse<T> {
    pub message: T,
}

/// Inner `{success, data}` envelope used by the submittal API.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub usr: &'a str,
    pub pwd: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowAction {
    pub action: Action,
    /// Localized label shown next to the action name.
    #[serde(default)]
    pub action_ar: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionsData {
    #[serde(default)]
    pub actions: Vec<WorkflowAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyActionRequest {
    pub doctype: String,
    pub name: String,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// State delta returned by a successful `apply_action`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplyActionData {
    pub new_state: WorkflowState,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub modified_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user: String,
    #[serde(default)]
    pub user_full_name: Option<String>,
    pub action: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub state: Option<WorkflowState>,
}

impl HistoryEntry {
    pub fn actor(&self) -> &str {
        self.user_full_name.as_deref().unwrap_or(&self.user)
    }

    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        parse_server_timestamp(&self.timestamp)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryData {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateRecord {
    pub name: WorkflowState,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatesData {
    #[serde(default)]
    pub states: Vec<StateRecord>,
}

/// A submittal as returned by `get_document`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub discipline: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: String,
    pub workflow_state: WorkflowState,
    #[serde(default)]
    pub creation: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub previous_submittal_no: Option<String>,
    #[serde(default)]
    pub submittal_type: Option<String>,
    #[serde(flatten)]
    pub extra: FieldMap,
}

impl Document {
    /// Merge the server's post-transition delta into the cached record.
    pub fn apply_delta(&mut self, delta: &ApplyActionData) {
        self.workflow_state = delta.new_state.clone();
        if delta.modified.is_some() {
            self.modified = delta.modified.clone();
        }
        if delta.modified_by.is_some() {
            self.modified_by = delta.modified_by.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilters {
    pub project: Option<String>,
    pub discipline: Option<String>,
    pub workflow_state: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl DocumentFilters {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.max(1).to_string()),
            ("page_size", self.page_size.max(1).to_string()),
        ];
        if let Some(project) = &self.project {
            query.push(("project", project.clone()));
        }
        if let Some(discipline) = &self.discipline {
            query.push(("discipline", discipline.clone()));
        }
        if let Some(state) = &self.workflow_state {
            query.push(("workflow_state", state.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentPage {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Name of a record the server just created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedRecord {
    pub name: String,
    #[serde(flatten)]
    pub extra: FieldMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl Project {
    pub fn display_name(&self) -> &str {
        self.project_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsData {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Organizational stakeholder (Consultant, Owner, Contractor) on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    #[serde(default)]
    pub party_name: Option<String>,
    #[serde(default)]
    pub party_type: Option<String>,
    #[serde(flatten)]
    pub fields: FieldMap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartiesData {
    #[serde(default)]
    pub parties: Vec<Party>,
}

/// Parse the backend's `YYYY-MM-DD HH:MM:SS[.ffffff]` timestamps, with an
/// RFC 3339 fallback.
pub fn parse_server_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}
