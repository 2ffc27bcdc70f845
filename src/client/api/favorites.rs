use uuid::Uuid;

use crate::{
    client::{error::ClientError, http::ApiClient},
    model::{MessageResponse, Project},
};

#[derive(Debug, Clone)]
pub struct FavoritesApi {
    client: ApiClient,
}

impl FavoritesApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Full project records for the signed-in user's favorites.
    ///
    /// # Errors
    /// `Auth` without a valid token.
    pub async fn list(&self) -> Result<Vec<Project>, ClientError> {
        self.client.get(&["users", "favorites"], &[]).await
    }

    /// Idempotent.
    ///
    /// # Errors
    /// `Auth` without a valid token.
    pub async fn add(&self, project_id: Uuid) -> Result<MessageResponse, ClientError> {
        let id = project_id.to_string();
        self.client
            .post_empty(&["users", "favorites", id.as_str()])
            .await
    }

    /// Removing a project that is not a favorite still succeeds.
    ///
    /// # Errors
    /// `Auth` without a valid token.
    pub async fn remove(&self, project_id: Uuid) -> Result<MessageResponse, ClientError> {
        let id = project_id.to_string();
        self.client
            .delete(&["users", "favorites", id.as_str()])
            .await
    }
}
