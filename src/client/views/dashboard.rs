use super::{notify::Toasts, report_failure, Route};
use crate::{
    client::auth::AuthController,
    model::{Project, User},
};

/// Signed-in user's page: profile and saved projects.
#[derive(Debug)]
pub struct DashboardView {
    pub user: User,
    pub favorites: Vec<Project>,
}

impl DashboardView {
    /// # Errors
    /// Redirects to the login page without a session, or when the server
    /// rejects the session token.
    pub async fn load(auth: &mut AuthController, toasts: &mut Toasts) -> Result<Self, Route> {
        let Some(user) = auth.current_user().cloned() else {
            return Err(Route::Login);
        };

        let favorites = match auth.client().favorites().list().await {
            Ok(favorites) => favorites,
            Err(err) => {
                if let Some(route) =
                    report_failure(auth, &err, toasts, "Failed to load favorites").await
                {
                    return Err(route);
                }
                Vec::new()
            }
        };

        Ok(Self { user, favorites })
    }
}
