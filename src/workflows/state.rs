//! Workflow states and actions as reported by the backend.
//!
//! The server owns the transition table. These enums give the handful of
//! states and actions the client reacts to a name, and carry every other
//! server string through untouched in an `Other` variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Initial state of every submittal. The separator is U+2013 EN DASH and the
/// comparison is exact, so a hyphen or a case change is a different state.
pub const DRAFT_STATE: &str = "Draft \u{2013} Contractor Specialist Engineer";
pub const APPROVED_STATE: &str = "Approved";
pub const APPROVED_WITH_NOTES_STATE: &str = "Approved With Notes";
pub const REJECTED_STATE: &str = "Rejected";

pub const SUBMIT_ACTION: &str = "Submit";
pub const APPROVE_ACTION: &str = "Approve";
pub const APPROVE_WITH_NOTES_ACTION: &str = "Approve With Notes";
pub const REJECT_ACTION: &str = "Reject";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowState {
    Draft,
    Approved,
    ApprovedWithNotes,
    Rejected,
    /// Review states and anything else the server defines.
    Other(String),
}

impl WorkflowState {
    pub fn as_str(&self) -> &str {
        match self {
            WorkflowState::Draft => DRAFT_STATE,
            WorkflowState::Approved => APPROVED_STATE,
            WorkflowState::ApprovedWithNotes => APPROVED_WITH_NOTES_STATE,
            WorkflowState::Rejected => REJECTED_STATE,
            WorkflowState::Other(name) => name,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, WorkflowState::Draft)
    }

    /// Display hint only. Whether a document can still move is decided by the
    /// server's action list, never by this method.
    pub fn is_terminal_hint(&self) -> bool {
        matches!(
            self,
            WorkflowState::Approved | WorkflowState::ApprovedWithNotes | WorkflowState::Rejected
        )
    }
}

impl From<&str> for WorkflowState {
    fn from(name: &str) -> Self {
        match name {
            DRAFT_STATE => WorkflowState::Draft,
            APPROVED_STATE => WorkflowState::Approved,
            APPROVED_WITH_NOTES_STATE => WorkflowState::ApprovedWithNotes,
            REJECTED_STATE => WorkflowState::Rejected,
            _ => WorkflowState::Other(name.to_string()),
        }
    }
}

impl From<String> for WorkflowState {
    fn from(name: String) -> Self {
        match WorkflowState::from(name.as_str()) {
            WorkflowState::Other(_) => WorkflowState::Other(name),
            known => known,
        }
    }
}

impl From<WorkflowState> for String {
    fn from(state: WorkflowState) -> Self {
        match state {
            WorkflowState::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named transition offered by the server for the document's current state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Submit,
    Approve,
    ApproveWithNotes,
    Reject,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Submit => SUBMIT_ACTION,
            Action::Approve => APPROVE_ACTION,
            Action::ApproveWithNotes => APPROVE_WITH_NOTES_ACTION,
            Action::Reject => REJECT_ACTION,
            Action::Other(name) => name,
        }
    }

    /// Only "Approve With Notes" needs free-text notes before it can be sent.
    pub fn requires_notes(&self) -> bool {
        matches!(self, Action::ApproveWithNotes)
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        match name {
            SUBMIT_ACTION => Action::Submit,
            APPROVE_ACTION => Action::Approve,
            APPROVE_WITH_NOTES_ACTION => Action::ApproveWithNotes,
            REJECT_ACTION => Action::Reject,
            _ => Action::Other(name.to_string()),
        }
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        match Action::from(name.as_str()) {
            Action::Other(_) => Action::Other(name),
            known => known,
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
