use super::{preview, user_error, with_client};
use crate::api::types::{Document, HistoryEntry};
use crate::config::MasarConfig;
use crate::observability::OperationTimer;
use crate::workflows::stepper::render_steps;
use crate::workflows::view::{ACTIONS_UNAVAILABLE_MESSAGE, NO_ACTIONS_MESSAGE};
use crate::workflows::{ActionMenu, WorkflowView};
use anyhow::Result;

pub struct ShowCommand {
    pub name: String,
}

impl ShowCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let timer = OperationTimer::new("show_document");
            let view = WorkflowView::load(&client, client.doctype(), &self.name)
                .await
                .map_err(user_error)?;
            timer.finish();

            print_document(view.document());
            println!();
            println!("🧭 PROGRESS:");
            let steps = view.steps();
            if steps.is_empty() {
                println!("  (the server returned no workflow states)");
            } else {
                println!("{}", render_steps(&steps));
            }
            println!();

            match view.action_menu() {
                ActionMenu::NoActions => println!("📭 {NO_ACTIONS_MESSAGE}"),
                ActionMenu::Unavailable => println!("⚠️  {ACTIONS_UNAVAILABLE_MESSAGE}"),
                ActionMenu::Available(actions) => {
                    println!("🎯 AVAILABLE ACTIONS:");
                    for offered in actions {
                        println!("  → {}", format_action(&offered.action.to_string(), offered.action_ar.as_deref()));
                    }
                }
            }
            println!();

            print_history(view.history());
            Ok(())
        })
        .await
    }
}

pub(crate) fn print_document(document: &Document) {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("📄 {}", document.name);
    println!("   State:       {}", document.workflow_state);
    println!("   Project:     {}", field(&document.project));
    println!("   Discipline:  {}", field(&document.discipline));
    println!("   Type:        {}", field(&document.document_type));
    println!(
        "   Location:    {} / {} / {}",
        field(&document.building),
        field(&document.floor),
        field(&document.room)
    );
    println!("   Owner:       {}", document.owner);
    if let Some(previous) = &document.previous_submittal_no {
        println!("   Resubmits:   {previous}");
    }
    if let Some(description) = &document.description {
        println!("   Description: {}", preview(description, 200));
    }
    if let Some(modified) = &document.modified {
        println!(
            "   Modified:    {} by {}",
            modified,
            document.modified_by.as_deref().unwrap_or("-")
        );
    }
}

pub(crate) fn print_history(history: &[HistoryEntry]) {
    if history.is_empty() {
        println!("🕘 No workflow history yet");
        return;
    }

    println!("🕘 HISTORY:");
    for entry in history {
        let when = entry
            .timestamp_utc()
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| entry.timestamp.clone());
        let state = entry
            .state
            .as_ref()
            .map(|state| format!(" → {state}"))
            .unwrap_or_default();
        println!("  {when}  {}  {}{state}", entry.actor(), entry.action);
        if let Some(notes) = entry.notes.as_deref().filter(|notes| !notes.trim().is_empty()) {
            println!("      📝 {notes}");
        }
    }
}

pub(crate) fn format_action(name: &str, localized: Option<&str>) -> String {
    match localized.filter(|label| !label.is_empty() && *label != name) {
        Some(label) => format!("{name} ({label})"),
        None => name.to_string(),
    }
}
