use super::{notify::Toasts, Route};
use crate::{client::auth::AuthController, model::RegisterRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    #[default]
    Login,
    Register,
}

/// Sign-in page with a register mode.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub mode: LoginMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    #[must_use]
    pub fn new(mode: LoginMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Signs in or registers. On success the visitor goes to the dashboard.
    pub async fn submit(
        &mut self,
        auth: &mut AuthController,
        toasts: &mut Toasts,
    ) -> Option<Route> {
        let result = match self.mode {
            LoginMode::Login => auth.login(&self.email, &self.password).await.map(|_| ()),
            LoginMode::Register => auth
                .register(&RegisterRequest {
                    name: self.name.clone(),
                    email: self.email.clone(),
                    password: self.password.clone(),
                    phone: self.phone.clone().filter(|phone| !phone.trim().is_empty()),
                })
                .await
                .map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.password.clear();
                toasts.success(match self.mode {
                    LoginMode::Login => "Login successful!",
                    LoginMode::Register => "Registration successful!",
                });
                Some(Route::Dashboard)
            }
            Err(err) => {
                toasts.error(err.detail().unwrap_or("Authentication failed"));
                None
            }
        }
    }
}
