use super::{user_error, with_client};
use crate::api::types::{FieldMap, Project};
use crate::config::MasarConfig;
use anyhow::Result;
use serde_json::Value;

pub struct ProjectsCommand {
    pub name: Option<String>,
}

impl ProjectsCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            if let Some(name) = &self.name {
                let project = client.get_project(name).await.map_err(user_error)?;
                print_project(&project);
                return Ok(());
            }

            let projects = client.get_projects().await.map_err(user_error)?;
            if projects.is_empty() {
                println!("🏗️  No projects found");
                return Ok(());
            }
            println!("🏗️  PROJECTS:");
            for project in &projects {
                println!("  {:<16} {}", project.name, project.display_name());
            }
            Ok(())
        })
        .await
    }
}

fn print_project(project: &Project) {
    println!("🏗️  {} ({})", project.display_name(), project.name);
    for (key, value) in &project.fields {
        let rendered = match value {
            Value::String(text) => text.clone(),
            Value::Null => "-".to_string(),
            other => other.to_string(),
        };
        println!("   {key}: {rendered}");
    }
}

pub struct CreateProjectCommand {
    pub fields: Vec<(String, String)>,
}

impl CreateProjectCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let fields: FieldMap = self
                .fields
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            let created = client.create_project(&fields).await.map_err(user_error)?;
            println!("✅ Created project {}", created.name);
            Ok(())
        })
        .await
    }
}

pub struct PartiesCommand {
    pub project: Option<String>,
}

impl PartiesCommand {
    pub async fn execute(&self, config: &MasarConfig) -> Result<()> {
        with_client(config, |client| async move {
            let parties = client
                .get_parties(self.project.as_deref())
                .await
                .map_err(user_error)?;

            if parties.is_empty() {
                println!("👥 No parties found");
                return Ok(());
            }
            println!("👥 PARTIES:");
            for party in &parties {
                println!(
                    "  {:<16} {:<12} {}",
                    party.name,
                    party.party_type.as_deref().unwrap_or("-"),
                    party.party_name.as_deref().unwrap_or("")
                );
            }
            Ok(())
        })
        .await
    }
}
