use crate::{
    client::{error::ClientError, http::ApiClient},
    model::{LoginRequest, RegisterRequest, TokenResponse, User},
};

#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// `Validation` for malformed fields or an email already in use.
    pub async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, ClientError> {
        self.client.post(&["auth", "register"], request).await
    }

    /// # Errors
    /// `Auth` for an unknown email or wrong password.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ClientError> {
        self.client.post(&["auth", "login"], request).await
    }

    /// # Errors
    /// `Auth` when the token is missing, expired or belongs to a deleted user.
    pub async fn me(&self) -> Result<User, ClientError> {
        self.client.get(&["auth", "me"], &[]).await
    }
}
