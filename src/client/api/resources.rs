use super::filter;
use crate::{
    client::{error::ClientError, http::ApiClient},
    model::{Resource, ResourceCategory, ResourceInput},
};

#[derive(Debug, Clone)]
pub struct ResourcesApi {
    client: ApiClient,
}

impl ResourcesApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Gated resources are included only when the client holds a valid token.
    ///
    /// # Errors
    /// Any transport or server failure.
    pub async fn list(
        &self,
        category: Option<ResourceCategory>,
    ) -> Result<Vec<Resource>, ClientError> {
        self.client
            .get(&["resources"], &filter("category", category))
            .await
    }

    /// # Errors
    /// `Forbidden` for non-admins.
    pub async fn create(&self, input: &ResourceInput) -> Result<Resource, ClientError> {
        self.client.post(&["resources"], input).await
    }
}
