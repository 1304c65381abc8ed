use super::{user_error, with_client};
use crate::config::MasarConfig;
use anyhow::{bail, Result};

pub struct LoginCommand;

impl LoginCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        if config.backend.credentials().is_none() {
            bail!("❌ No credentials configured. Set MASAR_USERNAME and MASAR_PASSWORD, or backend.username/backend.password in masar.toml");
        }

        println!("🔑 Logging in to {}...", config.backend.base_url);
        with_client(config, |client| async move {
            let user = client.logged_user().await.map_err(user_error)?;
            println!("✅ Logged in as {user}");
            Ok(())
        })
        .await
    }
}

pub struct WhoamiCommand;

impl WhoamiCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let user = client.logged_user().await.map_err(user_error)?;
            println!("{user}");
            Ok(())
        })
        .await
    }
}
