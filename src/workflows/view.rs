//! Workflow view of a single submittal and the action dispatcher.
//!
//! The view is a read-through cache of server state: the document, the
//! actions offered for its current state, its history and the ordered state
//! list. Nothing here decides whether a transition is legal. After a
//! successful action the document is patched from the server's delta and the
//! history and actions are fetched again in full.

use super::state::{Action, WorkflowState};
use super::stepper::{compute_steps, Step};
use crate::api::errors::ApiError;
use crate::api::types::{ApplyActionRequest, Document, HistoryEntry, WorkflowAction};
use crate::api::WorkflowBackend;
use thiserror::Error;
use tracing::{info, warn};

pub const NO_ACTIONS_MESSAGE: &str = "No actions are available for this document";
pub const ACTIONS_UNAVAILABLE_MESSAGE: &str = "The actions for this document could not be loaded";

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{}", NO_ACTIONS_MESSAGE)]
    NoActionsAvailable,

    #[error("{}", ACTIONS_UNAVAILABLE_MESSAGE)]
    ActionsUnavailable,

    #[error("Action '{0}' is not offered for this document")]
    ActionNotOffered(String),

    #[error("'{0}' requires notes before it can be confirmed")]
    NotesRequired(String),
}

impl WorkflowError {
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// What the action control shows for the document's current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMenu<'a> {
    /// Nothing to do. Shown as a message; the menu does not open.
    NoActions,
    /// The action list failed to reload; nothing is known about what is offered
    Unavailable,
    Available(&'a [WorkflowAction]),
}

/// A selected action waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPrompt {
    action: Action,
    notes: String,
}

impl ActionPrompt {
    fn new(action: Action) -> Self {
        Self {
            action,
            notes: String::new(),
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn requires_notes(&self) -> bool {
        self.action.requires_notes()
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.set_notes(notes);
        self
    }

    /// False while a notes-requiring action has blank notes
    pub fn can_confirm(&self) -> bool {
        !self.requires_notes() || !self.notes.trim().is_empty()
    }

    fn into_request(self, doctype: &str, name: &str) -> Result<ApplyActionRequest, WorkflowError> {
        if !self.can_confirm() {
            return Err(WorkflowError::NotesRequired(self.action.to_string()));
        }
        let notes = Some(self.notes.trim().to_string()).filter(|notes| !notes.is_empty());
        Ok(ApplyActionRequest {
            doctype: doctype.to_string(),
            name: name.to_string(),
            action: self.action,
            notes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub previous_state: WorkflowState,
    pub new_state: WorkflowState,
    pub history_len_before: usize,
    pub history_len_after: usize,
    /// False when the history refetch failed after the action succeeded
    pub history_refreshed: bool,
    /// False when the action refetch failed after the action succeeded
    pub actions_refreshed: bool,
}

pub struct WorkflowView<'a, B: WorkflowBackend + ?Sized> {
    backend: &'a B,
    doctype: String,
    document: Document,
    actions: Vec<WorkflowAction>,
    actions_stale: bool,
    history: Vec<HistoryEntry>,
    states: Vec<WorkflowState>,
}

impl<'a, B: WorkflowBackend + ?Sized> WorkflowView<'a, B> {
    /// Fetch the document, its actions, its history and the state list,
    /// one request after another.
    pub async fn load(backend: &'a B, doctype: &str, name: &str) -> Result<Self, WorkflowError> {
        let document = backend.get_document(name).await?;
        let actions = backend.get_available_actions(doctype, name).await?;
        let history = backend.get_workflow_history(doctype, name).await?;
        let states = backend.get_all_states().await?;

        Ok(Self {
            backend,
            doctype: doctype.to_string(),
            document,
            actions,
            actions_stale: false,
            history,
            states,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn actions(&self) -> &[WorkflowAction] {
        &self.actions
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn states(&self) -> &[WorkflowState] {
        &self.states
    }

    pub fn steps(&self) -> Vec<Step> {
        compute_steps(&self.states, &self.document.workflow_state)
    }

    pub fn action_menu(&self) -> ActionMenu<'_> {
        if self.actions_stale {
            ActionMenu::Unavailable
        } else if self.actions.is_empty() {
            ActionMenu::NoActions
        } else {
            ActionMenu::Available(&self.actions)
        }
    }

    /// Pick one of the offered actions. Actions that need notes come back as
    /// a prompt that cannot be confirmed until notes are filled in.
    pub fn select_action(&self, action: &Action) -> Result<ActionPrompt, WorkflowError> {
        match self.action_menu() {
            ActionMenu::NoActions => Err(WorkflowError::NoActionsAvailable),
            ActionMenu::Unavailable => Err(WorkflowError::ActionsUnavailable),
            ActionMenu::Available(actions) => actions
                .iter()
                .find(|offered| &offered.action == action)
                .map(|offered| ActionPrompt::new(offered.action.clone()))
                .ok_or_else(|| WorkflowError::ActionNotOffered(action.to_string())),
        }
    }

    /// Send the confirmed action. Local state changes only after the server
    /// accepts it, so a failure leaves the view untouched.
    pub async fn confirm(&mut self, prompt: ActionPrompt) -> Result<ApplyOutcome, WorkflowError> {
        let request = prompt.into_request(&self.doctype, &self.document.name)?;
        let previous_state = self.document.workflow_state.clone();
        let history_len_before = self.history.len();

        let delta = self.backend.apply_action(&request).await?;
        self.document.apply_delta(&delta);
        info!(
            document = %self.document.name,
            from = %previous_state,
            to = %delta.new_state,
            "Document moved to new workflow state"
        );

        let history_refreshed = match self
            .backend
            .get_workflow_history(&self.doctype, &self.document.name)
            .await
        {
            Ok(history) => {
                self.history = history;
                true
            }
            Err(err) => {
                warn!(document = %self.document.name, error = %err, "History refresh failed");
                false
            }
        };

        // Actions offered for the previous state must not be shown for the new one
        let actions_refreshed = match self
            .backend
            .get_available_actions(&self.doctype, &self.document.name)
            .await
        {
            Ok(actions) => {
                self.actions = actions;
                self.actions_stale = false;
                true
            }
            Err(err) => {
                warn!(document = %self.document.name, error = %err, "Action refresh failed");
                self.actions.clear();
                self.actions_stale = true;
                false
            }
        };

        Ok(ApplyOutcome {
            previous_state,
            new_state: delta.new_state,
            history_len_before,
            history_len_after: self.history.len(),
            history_refreshed,
            actions_refreshed,
        })
    }
}
