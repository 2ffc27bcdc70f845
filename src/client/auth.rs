use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{error::ClientError, http::ApiClient, session::SessionStore, views::Route};
use crate::model::{LoginRequest, RegisterRequest, TokenResponse, User};

/// Owns the session: the token cell in [`ApiClient`], its persisted copy and
/// the cached user record.
pub struct AuthController {
    client: ApiClient,
    sessions: Arc<dyn SessionStore>,
    user: Option<User>,
}

impl AuthController {
    #[must_use]
    pub fn new(client: ApiClient, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            sessions,
            user: None,
        }
    }

    /// Restores the session from storage by re-fetching the current user.
    ///
    /// Never fails: a rejected token is removed from storage, while a network
    /// failure keeps it for the next attempt. Both leave the controller signed out.
    #[instrument(skip(self))]
    pub async fn init(&mut self) -> Option<&User> {
        self.user = None;

        let token = match self.sessions.load().await {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(err) => {
                warn!("Failed to load session: {err}");
                return None;
            }
        };

        self.client.set_token(Some(token)).await;

        match self.client.auth().me().await {
            Ok(user) => {
                debug!(user = %user.id, "Session restored");
                self.user = Some(user);
            }
            Err(err) if err.is_auth() => {
                info!("Stored session rejected, signing out");
                self.client.set_token(None).await;
                if let Err(err) = self.sessions.clear().await {
                    warn!("Failed to clear session: {err}");
                }
            }
            Err(err) => {
                warn!("Could not restore session: {err}");
                self.client.set_token(None).await;
            }
        }

        self.user.as_ref()
    }

    /// # Errors
    /// `Auth` for invalid credentials; transport and server failures as usual.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, ClientError> {
        let response = self
            .client
            .auth()
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        Ok(self.adopt(response).await)
    }

    /// Creates the account and signs in as it.
    ///
    /// # Errors
    /// `Validation` for malformed fields or an email already in use.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<&User, ClientError> {
        let response = self.client.auth().register(request).await?;
        Ok(self.adopt(response).await)
    }

    /// Signs out. Calling it again is a no-op.
    ///
    /// # Errors
    /// `Storage` if the persisted token cannot be removed; the in-memory
    /// session is cleared regardless.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.user = None;
        self.client.set_token(None).await;
        self.sessions.clear().await
    }

    /// Ends the session when `err` shows the server no longer accepts the
    /// token, and returns the route to send the visitor to. Other errors
    /// leave the session alone.
    pub async fn handle_auth_error(&mut self, err: &ClientError) -> Option<Route> {
        if !err.is_auth() {
            return None;
        }
        info!("Session rejected by the server, signing out");
        if let Err(err) = self.logout().await {
            warn!("Failed to clear session: {err}");
        }
        Some(Route::Login)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Keeps the cached favorites in step with a successful toggle.
    pub fn note_favorite(&mut self, project_id: Uuid, favorite: bool) {
        let Some(user) = self.user.as_mut() else {
            return;
        };
        if favorite {
            if !user.favorites.contains(&project_id) {
                user.favorites.push(project_id);
            }
        } else {
            user.favorites.retain(|id| *id != project_id);
        }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// A session that fails to persist still holds for this run.
    async fn adopt(&mut self, response: TokenResponse) -> &User {
        let token = SecretString::from(response.access_token);
        if let Err(err) = self.sessions.save(&token).await {
            warn!("Failed to persist session: {err}");
        }
        self.client.set_token(Some(token)).await;
        self.user.insert(response.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::session::MemorySessionStore, model::Role};
    use chrono::Utc;

    fn controller_with(user: Option<User>) -> AuthController {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut controller = AuthController::new(client, Arc::new(MemorySessionStore::new()));
        controller.user = user;
        controller
    }

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            role,
            favorites: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn role_checks() {
        assert!(!controller_with(None).is_admin());
        assert!(!controller_with(Some(user(Role::User))).is_admin());
        assert!(controller_with(Some(user(Role::Admin))).is_admin());
    }

    #[test]
    fn note_favorite_is_a_set() {
        let mut controller = controller_with(Some(user(Role::User)));
        let project = Uuid::new_v4();
        controller.note_favorite(project, true);
        controller.note_favorite(project, true);
        assert_eq!(controller.current_user().unwrap().favorites, vec![project]);
        controller.note_favorite(project, false);
        controller.note_favorite(project, false);
        assert!(controller.current_user().unwrap().favorites.is_empty());
    }

    #[tokio::test]
    async fn init_without_token_stays_signed_out() {
        let mut controller = controller_with(None);
        assert!(controller.init().await.is_none());
        assert!(!controller.client().has_token().await);
    }

    #[tokio::test]
    async fn network_failure_keeps_stored_token() {
        let sessions = Arc::new(MemorySessionStore::with_token("stored"));
        // Port 9 (discard) is closed on test hosts, so the request fails to connect.
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut controller = AuthController::new(client, sessions.clone());

        assert!(controller.init().await.is_none());
        assert!(!controller.client().has_token().await);
        assert!(sessions.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let sessions = Arc::new(MemorySessionStore::with_token("stored"));
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        client.set_token(Some(SecretString::from("stored"))).await;
        let mut controller = AuthController::new(client, sessions.clone());
        controller.user = Some(user(Role::User));

        controller.logout().await.unwrap();
        controller.logout().await.unwrap();
        assert!(controller.current_user().is_none());
        assert!(!controller.client().has_token().await);
        assert!(sessions.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejected_token_ends_the_session() {
        let sessions = Arc::new(MemorySessionStore::with_token("stale"));
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        client.set_token(Some(SecretString::from("stale"))).await;
        let mut controller = AuthController::new(client, sessions.clone());
        controller.user = Some(user(Role::User));

        let outage = ClientError::Server {
            status: 503,
            message: "Service unavailable".to_string(),
        };
        assert_eq!(controller.handle_auth_error(&outage).await, None);
        assert!(controller.is_authenticated());
        assert!(sessions.load().await.unwrap().is_some());

        let expired = ClientError::Auth("Invalid or expired token".to_string());
        assert_eq!(
            controller.handle_auth_error(&expired).await,
            Some(Route::Login)
        );
        assert!(!controller.is_authenticated());
        assert!(!controller.client().has_token().await);
        assert!(sessions.load().await.unwrap().is_none());
    }
}
