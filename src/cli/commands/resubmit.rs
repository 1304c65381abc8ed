use super::{user_error, with_client};
use crate::config::MasarConfig;
use crate::workflows::ResubmissionForm;
use anyhow::Result;

pub struct ResubmitCommand {
    pub previous: String,
    pub description: String,
}

impl ResubmitCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let mut form = ResubmissionForm::load(&client, &self.previous)
                .await
                .map_err(user_error)?;
            form.set_description(self.description.as_str());

            println!("🔁 RE-SUBMITTAL OF {}", self.previous);
            for field in form.fields() {
                let lock = if field.read_only { "🔒" } else { "✏️ " };
                let value = if field.value.is_empty() { "-" } else { field.value.as_str() };
                println!("  {lock} {:<18} {value}", field.label);
            }
            println!();

            let created = form.submit(&client).await.map_err(user_error)?;
            println!("✅ Created {} (resubmits {})", created.name, self.previous);
            println!("💡 Next: masar show {}", created.name);
            Ok(())
        })
        .await
    }
}
