use super::show::print_history;
use super::{user_error, with_client};
use crate::config::MasarConfig;
use anyhow::Result;

pub struct HistoryCommand {
    pub name: String,
}

impl HistoryCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let history = client
                .get_workflow_history(client.doctype(), &self.name)
                .await
                .map_err(user_error)?;
            print_history(&history);
            Ok(())
        })
        .await
    }
}

pub struct StatesCommand;

impl StatesCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let states = client.get_all_states().await.map_err(user_error)?;
            if states.is_empty() {
                println!("📭 The server returned no workflow states");
                return Ok(());
            }

            println!("🧭 WORKFLOW STATES:");
            for (index, state) in states.iter().enumerate() {
                let marker = if state.is_draft() {
                    " (initial)"
                } else if state.is_terminal_hint() {
                    " (final)"
                } else {
                    ""
                };
                println!("  {:>2}. {state}{marker}", index + 1);
            }
            Ok(())
        })
        .await
    }
}
