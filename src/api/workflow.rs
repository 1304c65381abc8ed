use super::client::MasarClient;
use super::errors::ApiError;
use super::types::{
    ActionsData, ApplyActionData, ApplyActionRequest, HistoryData, HistoryEntry, StatesData,
    WorkflowAction,
};
use crate::workflows::state::WorkflowState;
use tracing::{debug, info};

const ALL_STATES_CACHE_KEY: &str = "workflow.get_all_states";

impl MasarClient {
    /// Actions the current user may take on the document in its current state.
    /// An empty list means nothing is available; it is not an error.
    pub async fn get_available_actions(&self, doctype: &str, name: &str) -> Result<Vec<WorkflowAction>, ApiError> {
        let endpoint = self.method_path("workflow.get_available_actions");
        let query = [("doctype", doctype.to_string()), ("name", name.to_string())];
        let value = self.http.get_json(&endpoint, &query, None).await?;
        let data: ActionsData = self.unwrap_envelope(&endpoint, value)?;

        debug!(document = name, count = data.actions.len(), "Fetched available actions");
        Ok(data.actions)
    }

    pub async fn apply_action(&self, request: &ApplyActionRequest) -> Result<ApplyActionData, ApiError> {
        let endpoint = self.method_path("workflow.apply_action");
        let value = self.http.post_json(&endpoint, request).await?;
        let data: ApplyActionData = self.unwrap_envelope(&endpoint, value)?;

        info!(
            document = %request.name,
            action = %request.action,
            new_state = %data.new_state,
            "Workflow action applied"
        );
        Ok(data)
    }

    pub async fn get_workflow_history(&self, doctype: &str, name: &str) -> Result<Vec<HistoryEntry>, ApiError> {
        let endpoint = self.method_path("workflow.get_workflow_history");
        let query = [("doctype", doctype.to_string()), ("name", name.to_string())];
        let value = self.http.get_json(&endpoint, &query, None).await?;
        let data: HistoryData = self.unwrap_envelope(&endpoint, value)?;

        debug!(document = name, entries = data.history.len(), "Fetched workflow history");
        Ok(data.history)
    }

    /// Every workflow state in display order. The list is static on the
    /// server, so it is cached for the configured TTL.
    pub async fn get_all_states(&self) -> Result<Vec<WorkflowState>, ApiError> {
        let endpoint = self.method_path("workflow.get_all_states");
        let value = self
            .http
            .get_json(&endpoint, &[], Some(ALL_STATES_CACHE_KEY))
            .await?;
        let data: StatesData = self.unwrap_envelope(&endpoint, value)?;

        Ok(data.states.into_iter().map(|record| record.name).collect())
    }
}
