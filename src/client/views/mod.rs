//! Page-level view state. Each view owns what its page renders and reports
//! navigation as a [`Route`] instead of performing it.

pub mod admin;
pub mod contact_form;
pub mod dashboard;
pub mod home;
pub mod listing;
pub mod login;
pub mod notify;
pub mod project_detail;

use std::fmt;
use tracing::warn;

use self::notify::Toasts;
use super::{auth::AuthController, error::ClientError};

/// Shown when the server stops accepting the session token.
pub const SESSION_EXPIRED: &str = "Session expired, please login again";

/// Pages the client can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Projects,
    ProjectDetail(String),
    News,
    Resources,
    Contact,
    Login,
    Dashboard,
    Admin,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Projects => f.write_str("/projects"),
            Self::ProjectDetail(slug) => write!(f, "/projects/{slug}"),
            Self::News => f.write_str("/news"),
            Self::Resources => f.write_str("/resources"),
            Self::Contact => f.write_str("/contact"),
            Self::Login => f.write_str("/login"),
            Self::Dashboard => f.write_str("/dashboard"),
            Self::Admin => f.write_str("/admin"),
        }
    }
}

/// Turns a failed call into a notification. A rejected token ends the
/// session and yields the login route; anything else shows `message`.
async fn report_failure(
    auth: &mut AuthController,
    err: &ClientError,
    toasts: &mut Toasts,
    message: &str,
) -> Option<Route> {
    warn!("{message}: {err}");
    if let Some(route) = auth.handle_auth_error(err).await {
        toasts.error(SESSION_EXPIRED);
        return Some(route);
    }
    toasts.error(message);
    None
}
