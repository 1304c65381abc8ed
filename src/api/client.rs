use super::errors::ApiError;
use super::types::{
    ApplyActionData, ApplyActionRequest, CreatedRecord, Document, Envelope, HistoryEntry,
    LoginRequest, LoginResponse, MethodResponse, WorkflowAction,
};
use crate::config::BackendConfig;
use crate::http::RateLimitedHttpClient;
use crate::observability::ApiMetrics;
use crate::workflows::state::WorkflowState;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Backend operations the workflow screens depend on, behind a trait so they
/// can be exercised against mocks.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    async fn get_available_actions(&self, doctype: &str, name: &str) -> Result<Vec<WorkflowAction>, ApiError>;
    async fn apply_action(&self, request: &ApplyActionRequest) -> Result<ApplyActionData, ApiError>;
    async fn get_workflow_history(&self, doctype: &str, name: &str) -> Result<Vec<HistoryEntry>, ApiError>;
    async fn get_all_states(&self) -> Result<Vec<WorkflowState>, ApiError>;
    async fn get_document(&self, name: &str) -> Result<Document, ApiError>;
    async fn create_document(&self, fields: Value) -> Result<CreatedRecord, ApiError>;
}

/// Client for the submittal backend's RPC surface
#[derive(Debug, Clone)]
pub struct MasarClient {
    pub(crate) http: RateLimitedHttpClient,
    api_module: String,
    login_path: String,
    doctype: String,
}

impl MasarClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        Self::with_metrics(config, Arc::new(ApiMetrics::new()))
    }

    pub fn with_metrics(config: &BackendConfig, metrics: Arc<ApiMetrics>) -> Result<Self, ApiError> {
        Ok(Self {
            http: RateLimitedHttpClient::with_metrics(config, metrics)?,
            api_module: config.api_module.trim_matches('.').to_string(),
            login_path: config.login_path.clone(),
            doctype: config.doctype.clone(),
        })
    }

    /// DocType of submittal records
    pub fn doctype(&self) -> &str {
        &self.doctype
    }

    pub fn metrics(&self) -> &ApiMetrics {
        self.http.metrics()
    }

    pub(crate) fn method_path(&self, method: &str) -> String {
        format!("api/method/{}.{}", self.api_module, method)
    }

    /// Unwrap `{message: {success, data}}`, turning `success: false` into
    /// [`ApiError::Rejected`].
    pub(crate) fn unwrap_envelope<T: DeserializeOwned>(&self, endpoint: &str, value: Value) -> Result<T, ApiError> {
        let response: MethodResponse<Envelope<Value>> =
            serde_json::from_value(value).map_err(|err| ApiError::decode(endpoint, err))?;
        let envelope = response.message;

        if !envelope.success {
            self.metrics().record_rejection();
            return Err(ApiError::rejected(envelope.message, envelope.error));
        }

        let data = envelope.data.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|err| ApiError::decode(endpoint, err))
    }

    /// Start a cookie session. The cookie stays in this client's jar.
    pub async fn login(&self, user: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let value = self
            .http
            .post_json(&self.login_path, &LoginRequest { usr: user, pwd: password })
            .await?;
        let response: LoginResponse = serde_json::from_value(value).unwrap_or_else(|err| {
            warn!(error = %err, "Unexpected login response body; continuing with the session cookie");
            LoginResponse::default()
        });
        info!(user = user, "Logged in");
        Ok(response)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.http.post_json("api/method/logout", &serde_json::json!({})).await?;
        self.http.clear_cache();
        info!("Logged out");
        Ok(())
    }

    /// Id of the user owning the current session
    pub async fn logged_user(&self) -> Result<String, ApiError> {
        let endpoint = "api/method/frappe.auth.get_logged_user";
        let value = self.http.get_json(endpoint, &[], None).await?;
        let response: MethodResponse<String> =
            serde_json::from_value(value).map_err(|err| ApiError::decode(endpoint, err))?;
        debug!(user = %response.message, "Resolved session user");
        Ok(response.message)
    }
}

#[async_trait]
impl WorkflowBackend for MasarClient {
    async fn get_available_actions(&self, doctype: &str, name: &str) -> Result<Vec<WorkflowAction>, ApiError> {
        MasarClient::get_available_actions(self, doctype, name).await
    }

    async fn apply_action(&self, request: &ApplyActionRequest) -> Result<ApplyActionData, ApiError> {
        MasarClient::apply_action(self, request).await
    }

    async fn get_workflow_history(&self, doctype: &str, name: &str) -> Result<Vec<HistoryEntry>, ApiError> {
        MasarClient::get_workflow_history(self, doctype, name).await
    }

    async fn get_all_states(&self) -> Result<Vec<WorkflowState>, ApiError> {
        MasarClient::get_all_states(self).await
    }

    async fn get_document(&self, name: &str) -> Result<Document, ApiError> {
        MasarClient::get_document(self, name).await
    }

    async fn create_document(&self, fields: Value) -> Result<CreatedRecord, ApiError> {
        MasarClient::create_document(self, &fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> MasarClient {
        MasarClient::new(&BackendConfig::default()).unwrap()
    }

    #[test]
    fn method_paths_use_module_prefix() {
        assert_eq!(
            client().method_path("workflow.apply_action"),
            "api/method/masar_dms.api.workflow.apply_action"
        );
    }

    #[test]
    fn failed_envelope_becomes_rejection() {
        let client = client();
        let err = client
            .unwrap_envelope::<Value>(
                "workflow.apply_action",
                json!({"message": {"success": false, "message": "Action not allowed in this state"}}),
            )
            .unwrap_err();

        assert!(matches!(err, ApiError::Rejected { .. }));
        assert_eq!(err.user_message(), "Action not allowed in this state");
        assert_eq!(client.metrics().get_stats().rejections, 1);
    }

    #[test]
    fn malformed_envelope_is_a_decode_error() {
        let err = client()
            .unwrap_envelope::<Value>("workflow.get_all_states", json!({"data": []}))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
