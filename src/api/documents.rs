use super::client::MasarClient;
use super::errors::ApiError;
use super::types::{CreatedRecord, Document, DocumentFilters, DocumentPage, FieldMap};
use serde_json::{json, Value};
use tracing::{debug, info};

impl MasarClient {
    pub async fn get_document(&self, name: &str) -> Result<Document, ApiError> {
        let endpoint = self.method_path("document.get_document");
        let value = self
            .http
            .get_json(&endpoint, &[("name", name.to_string())], None)
            .await?;
        self.unwrap_envelope(&endpoint, value)
    }

    /// Create a submittal from an opaque field bag. The server assigns the
    /// document code and the initial workflow state.
    pub async fn create_document(&self, fields: &Value) -> Result<CreatedRecord, ApiError> {
        let endpoint = self.method_path("document.create_document");
        let value = self.http.post_json(&endpoint, fields).await?;
        let created: CreatedRecord = self.unwrap_envelope(&endpoint, value)?;

        info!(document = %created.name, "Document created");
        Ok(created)
    }

    pub async fn update_document(&self, name: &str, fields: &FieldMap) -> Result<Document, ApiError> {
        let endpoint = self.method_path("document.update_document");
        let body = json!({ "name": name, "data": fields });
        let value = self.http.post_json(&endpoint, &body).await?;
        let document: Document = self.unwrap_envelope(&endpoint, value)?;

        info!(document = name, fields = fields.len(), "Document updated");
        Ok(document)
    }

    pub async fn get_documents(&self, filters: &DocumentFilters) -> Result<DocumentPage, ApiError> {
        let endpoint = self.method_path("document.get_documents");
        let value = self.http.get_json(&endpoint, &filters.to_query(), None).await?;
        let page: DocumentPage = self.unwrap_envelope(&endpoint, value)?;

        debug!(count = page.documents.len(), total = ?page.total, "Fetched document page");
        Ok(page)
    }
}
