use super::client::MasarClient;
use super::errors::ApiError;
use super::types::{CreatedRecord, FieldMap, PartiesData, Party, Project, ProjectsData};
use tracing::info;

impl MasarClient {
    pub async fn get_projects(&self) -> Result<Vec<Project>, ApiError> {
        let endpoint = self.method_path("project.get_projects");
        let value = self.http.get_json(&endpoint, &[], None).await?;
        let data: ProjectsData = self.unwrap_envelope(&endpoint, value)?;
        Ok(data.projects)
    }

    pub async fn get_project(&self, name: &str) -> Result<Project, ApiError> {
        let endpoint = self.method_path("project.get_project");
        let value = self
            .http
            .get_json(&endpoint, &[("name", name.to_string())], None)
            .await?;
        self.unwrap_envelope(&endpoint, value)
    }

    pub async fn create_project(&self, fields: &FieldMap) -> Result<CreatedRecord, ApiError> {
        let endpoint = self.method_path("project.create_project");
        let value = self.http.post_json(&endpoint, fields).await?;
        let created: CreatedRecord = self.unwrap_envelope(&endpoint, value)?;

        info!(project = %created.name, "Project created");
        Ok(created)
    }

    /// Parties attached to a project, or every party when `project` is None
    pub async fn get_parties(&self, project: Option<&str>) -> Result<Vec<Party>, ApiError> {
        let endpoint = self.method_path("party.get_parties");
        let query: Vec<(&str, String)> = project
            .map(|project| vec![("project", project.to_string())])
            .unwrap_or_default();
        let value = self.http.get_json(&endpoint, &query, None).await?;
        let data: PartiesData = self.unwrap_envelope(&endpoint, value)?;
        Ok(data.parties)
    }
}
