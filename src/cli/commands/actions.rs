use super::show::format_action;
use super::{user_error, with_client};
use crate::config::MasarConfig;
use crate::workflows::view::{ACTIONS_UNAVAILABLE_MESSAGE, NO_ACTIONS_MESSAGE};
use crate::workflows::{Action, ActionMenu, WorkflowView};
use anyhow::{bail, Result};
use tracing::Instrument;

pub struct ActionsCommand {
    pub name: String,
}

impl ActionsCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let actions = client
                .get_available_actions(client.doctype(), &self.name)
                .await
                .map_err(user_error)?;

            if actions.is_empty() {
                println!("📭 {NO_ACTIONS_MESSAGE}");
                return Ok(());
            }

            println!("🎯 Actions available on {}:", self.name);
            for offered in &actions {
                let hint = if offered.action.requires_notes() {
                    "  (requires --notes)"
                } else {
                    ""
                };
                println!(
                    "  → {}{hint}",
                    format_action(offered.action.as_str(), offered.action_ar.as_deref())
                );
            }
            Ok(())
        })
        .await
    }
}

pub struct ApplyCommand {
    pub name: String,
    pub action: String,
    pub notes: Option<String>,
}

impl ApplyCommand {
    /// Notes are checked before anything is sent: an action that requires
    /// notes never reaches the server without them.
    pub fn validate(&self) -> Result<Action> {
        let action = Action::from(self.action.as_str());
        let has_notes = self
            .notes
            .as_deref()
            .is_some_and(|notes| !notes.trim().is_empty());

        if action.requires_notes() && !has_notes {
            bail!("❌ '{action}' requires notes. Pass them with --notes \"...\"");
        }
        Ok(action)
    }

    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        let action = self.validate()?;
        let span = tracing::info_span!("apply_action", document = %self.name, action = %action);

        with_client(config, |client| {
            async move {
                let mut view = WorkflowView::load(&client, client.doctype(), &self.name)
                    .await
                    .map_err(user_error)?;

                if view.action_menu() == ActionMenu::NoActions {
                    println!("📭 {NO_ACTIONS_MESSAGE}");
                    return Ok(());
                }

                let mut prompt = view.select_action(&action).map_err(user_error)?;
                if let Some(notes) = &self.notes {
                    prompt.set_notes(notes.as_str());
                }

                print!("🔄 Applying '{action}' to {}... ", self.name);
                std::io::Write::flush(&mut std::io::stdout())?;

                let outcome = match view.confirm(prompt).await {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        println!("❌");
                        return Err(user_error(err));
                    }
                };
                println!("✅");
                println!();
                println!("📄 {}: {} → {}", self.name, outcome.previous_state, outcome.new_state);
                if !outcome.history_refreshed {
                    println!("⚠️  History could not be refreshed; run 'masar history {}'", self.name);
                }

                match view.action_menu() {
                    ActionMenu::NoActions => println!("📭 {NO_ACTIONS_MESSAGE}"),
                    ActionMenu::Unavailable => {
                        println!("⚠️  {ACTIONS_UNAVAILABLE_MESSAGE}; run 'masar actions {}'", self.name)
                    }
                    ActionMenu::Available(actions) => {
                        let names: Vec<&str> = actions.iter().map(|a| a.action.as_str()).collect();
                        println!("🎯 Next actions: {}", names.join(", "));
                    }
                }
                Ok(())
            }
            .instrument(span)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(action: &str, notes: Option<&str>) -> ApplyCommand {
        ApplyCommand {
            name: "DCS-GEN-036".to_string(),
            action: action.to_string(),
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn approve_with_notes_needs_non_blank_notes() {
        assert!(command("Approve With Notes", None).validate().is_err());
        assert!(command("Approve With Notes", Some("   ")).validate().is_err());
        assert_eq!(
            command("Approve With Notes", Some("Fix title block")).validate().unwrap(),
            Action::ApproveWithNotes
        );
    }

    #[test]
    fn other_actions_do_not_need_notes() {
        assert_eq!(command("Approve", None).validate().unwrap(), Action::Approve);
        assert_eq!(
            command("Return to Contractor", None).validate().unwrap(),
            Action::Other("Return to Contractor".to_string())
        );
    }
}
