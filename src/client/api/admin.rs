use crate::{
    client::{error::ClientError, http::ApiClient},
    model::Analytics,
};

#[derive(Debug, Clone)]
pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// `Auth` without a token, `Forbidden` for non-admins.
    pub async fn analytics(&self) -> Result<Analytics, ClientError> {
        self.client.get(&["admin", "analytics"], &[]).await
    }
}
