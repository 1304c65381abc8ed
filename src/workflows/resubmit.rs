use super::view::WorkflowError;
use crate::api::types::{CreatedRecord, Document, RESUBMITTAL_TYPE};
use crate::api::WorkflowBackend;
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// One row of the resubmission form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub read_only: bool,
}

/// Body sent to `create_document` for a resubmission. Nothing else from the
/// previous document is sent; the server links the two records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResubmitPayload {
    pub previous_submittal_no: String,
    pub submittal_type: String,
    pub description: String,
}

/// New submittal pre-filled from a previous one. Only the description is
/// editable.
#[derive(Debug, Clone)]
pub struct ResubmissionForm {
    previous: Document,
    description: String,
}

impl ResubmissionForm {
    pub async fn load<B: WorkflowBackend + ?Sized>(backend: &B, previous_name: &str) -> Result<Self, WorkflowError> {
        let previous = backend.get_document(previous_name).await?;
        Ok(Self::from_previous(previous))
    }

    pub fn from_previous(previous: Document) -> Self {
        let description = previous.description.clone().unwrap_or_default();
        Self {
            previous,
            description,
        }
    }

    pub fn previous(&self) -> &Document {
        &self.previous
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn fields(&self) -> Vec<FormField> {
        let previous = &self.previous;
        let read_only = |key, label, value: &Option<String>| FormField {
            key,
            label,
            value: value.clone().unwrap_or_default(),
            read_only: true,
        };

        vec![
            FormField {
                key: "previous_submittal_no",
                label: "Previous submittal",
                value: previous.name.clone(),
                read_only: true,
            },
            read_only("project", "Project", &previous.project),
            read_only("discipline", "Discipline", &previous.discipline),
            read_only("document_type", "Document type", &previous.document_type),
            read_only("building", "Building", &previous.building),
            read_only("floor", "Floor", &previous.floor),
            read_only("room", "Room", &previous.room),
            FormField {
                key: "description",
                label: "Description",
                value: self.description.clone(),
                read_only: false,
            },
        ]
    }

    pub fn payload(&self) -> ResubmitPayload {
        ResubmitPayload {
            previous_submittal_no: self.previous.name.clone(),
            submittal_type: RESUBMITTAL_TYPE.to_string(),
            description: self.description.clone(),
        }
    }

    pub async fn submit<B: WorkflowBackend + ?Sized>(&self, backend: &B) -> Result<CreatedRecord, WorkflowError> {
        let payload = self.payload();
        let body = json!({
            "previous_submittal_no": payload.previous_submittal_no,
            "submittal_type": payload.submittal_type,
            "description": payload.description,
        });
        let created = backend.create_document(body).await?;

        info!(
            previous = %self.previous.name,
            document = %created.name,
            "Resubmission created"
        );
        Ok(created)
    }
}
