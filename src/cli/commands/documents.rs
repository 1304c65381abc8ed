use super::show::print_document;
use super::{preview, user_error, with_client};
use crate::api::types::{DocumentFilters, FieldMap};
use crate::config::MasarConfig;
use crate::workflows::{can_edit, DRAFT_STATE};
use anyhow::{bail, Result};
use serde_json::Value;

pub struct DocumentsCommand {
    pub filters: DocumentFilters,
}

impl DocumentsCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let page = client.get_documents(&self.filters).await.map_err(user_error)?;

            if page.documents.is_empty() {
                println!("📋 No documents match these filters");
                return Ok(());
            }

            println!("📋 DOCUMENTS (page {}):", page.page.unwrap_or(self.filters.page.max(1)));
            for document in &page.documents {
                println!(
                    "  {:<16} {:<14} {:<40} {}",
                    document.name,
                    document.discipline.as_deref().unwrap_or("-"),
                    document.workflow_state,
                    preview(document.description.as_deref().unwrap_or(""), 50)
                );
            }
            if let Some(total) = page.total {
                println!();
                println!("📈 {} of {} documents shown", page.documents.len(), total);
            }
            Ok(())
        })
        .await
    }
}

pub struct CanEditCommand {
    pub name: String,
}

impl CanEditCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let user = client.logged_user().await.map_err(user_error)?;
            let document = client.get_document(&self.name).await.map_err(user_error)?;

            if can_edit(&user, &document) {
                println!("✅ {user} can edit {}", document.name);
            } else {
                println!("🔒 {user} cannot edit {}", document.name);
                if document.owner != user {
                    println!("   → Only the owner ({}) can edit it", document.owner);
                }
                if !document.workflow_state.is_draft() {
                    println!("   → It is in '{}', editing requires '{DRAFT_STATE}'", document.workflow_state);
                }
            }
            Ok(())
        })
        .await
    }
}

pub struct UpdateCommand {
    pub name: String,
    pub fields: Vec<(String, String)>,
}

impl UpdateCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let user = client.logged_user().await.map_err(user_error)?;
            let document = client.get_document(&self.name).await.map_err(user_error)?;

            if !can_edit(&user, &document) {
                bail!(
                    "❌ {} is not editable by {user} (owner {}, state '{}')",
                    document.name,
                    document.owner,
                    document.workflow_state
                );
            }

            let fields: FieldMap = self
                .fields
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            let updated = client
                .update_document(&self.name, &fields)
                .await
                .map_err(user_error)?;

            println!("✅ Updated {} field(s)", fields.len());
            println!();
            print_document(&updated);
            Ok(())
        })
        .await
    }
}
