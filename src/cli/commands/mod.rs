use crate::api::MasarClient;
use crate::config::MasarConfig;
use crate::workflows::WorkflowError;
use anyhow::Result;

pub mod actions;
pub mod config;
pub mod documents;
pub mod history;
pub mod projects;
pub mod resubmit;
pub mod session;
pub mod show;

/// Turn an API or workflow failure into the single line shown to the user
pub fn user_error(err: impl Into<WorkflowError>) -> anyhow::Error {
    anyhow::anyhow!("❌ {}", err.into().user_message())
}

/// Build a client, log in when credentials are configured, run `f`, then end
/// the session and log API counters when metrics are enabled.
pub async fn with_client<F, Fut, R>(config: &MasarConfig, f: F) -> Result<R>
where
    F: FnOnce(MasarClient) -> Fut,
    Fut: std::future::Future<Output = Result<R>>,
{
    let client = MasarClient::new(&config.backend).map_err(user_error)?;

    let logged_in = match config.backend.credentials() {
        Some((user, password)) => {
            if let Err(err) = client.login(user, password).await {
                if err.is_unauthorized() {
                    anyhow::bail!("❌ Login failed for {user}: {}", err.user_message());
                }
                return Err(user_error(err));
            }
            true
        }
        None => {
            tracing::debug!("No credentials configured; requests run without a session");
            false
        }
    };

    let result = f(client.clone()).await;

    if logged_in {
        if let Err(err) = client.logout().await {
            tracing::debug!(error = %err, "Logout failed");
        }
    }

    if config.observability.metrics_enabled {
        client.metrics().log_stats();
    }
    result
}

pub fn show_how_to_get_started() -> Result<()> {
    println!("📑 masar - Submittal Workflow Client");
    println!();
    println!("Documents:");
    println!("  🔎 masar show <DOCUMENT>           # Progress, actions and history");
    println!("  ▶️  masar apply <DOCUMENT> <ACTION> # Move a document along its workflow");
    println!("  🔁 masar resubmit <DOCUMENT> --description <TEXT>");
    println!("  📋 masar documents --discipline Civil");
    println!();
    println!("Setup:");
    println!("  ⚙️  masar config init               # Write masar.toml");
    println!("  🔑 masar login                     # Check credentials");
    println!();
    println!("💡 Credentials come from MASAR_USERNAME and MASAR_PASSWORD.");
    Ok(())
}

/// Truncate long free text for one-line listings
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
