use uuid::Uuid;

use super::filter;
use crate::{
    client::{error::ClientError, http::ApiClient},
    model::{MessageResponse, Project, ProjectInput, ProjectStatus},
};

#[derive(Debug, Clone)]
pub struct ProjectsApi {
    client: ApiClient,
}

impl ProjectsApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every project, or only those with `status`.
    ///
    /// # Errors
    /// Any transport or server failure.
    pub async fn list(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>, ClientError> {
        self.client
            .get(&["projects"], &filter("status", status))
            .await
    }

    /// # Errors
    /// `NotFound` for an unknown slug.
    pub async fn get(&self, slug: &str) -> Result<Project, ClientError> {
        self.client.get(&["projects", slug], &[]).await
    }

    /// # Errors
    /// `Forbidden` for non-admins, `Validation` for a bad or taken slug.
    pub async fn create(&self, input: &ProjectInput) -> Result<Project, ClientError> {
        self.client.post(&["projects"], input).await
    }

    /// # Errors
    /// `NotFound` for an unknown id, `Validation` for a taken slug.
    pub async fn update(&self, id: Uuid, input: &ProjectInput) -> Result<Project, ClientError> {
        let id = id.to_string();
        self.client
            .put(&["projects", id.as_str()], &[], Some(input))
            .await
    }

    /// # Errors
    /// `NotFound` for an unknown id.
    pub async fn delete(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        let id = id.to_string();
        self.client.delete(&["projects", id.as_str()]).await
    }
}
