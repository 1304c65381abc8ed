use crate::config::MasarConfig;
use anyhow::{bail, Result};
use std::path::PathBuf;

pub struct ConfigInitCommand {
    pub path: PathBuf,
    pub force: bool,
}

impl ConfigInitCommand {
    pub fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            bail!(
                "❌ {} already exists. Use --force to overwrite it",
                self.path.display()
            );
        }

        MasarConfig::default().save_to_file(&self.path)?;
        println!("✅ Wrote {}", self.path.display());
        println!("💡 Set backend.base_url, then export MASAR_USERNAME and MASAR_PASSWORD");
        Ok(())
    }
}
