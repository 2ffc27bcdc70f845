//! Project page with the optimistic favorite toggle.

use tracing::warn;

use super::{notify::Toasts, report_failure, Route};
use crate::{
    client::{auth::AuthController, error::ClientError},
    model::Project,
};

/// Lifecycle of one favorite toggle.
///
/// The indicator only flips once the server confirms; a failure leaves the
/// previous value in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FavoriteToggle {
    #[default]
    Idle,
    Pending {
        target: bool,
    },
    Succeeded {
        favorite: bool,
    },
    Failed {
        favorite: bool,
        error: String,
    },
}

impl FavoriteToggle {
    /// Enters `Pending` for the opposite of `current` and returns that target.
    pub fn begin(&mut self, current: bool) -> bool {
        let target = !current;
        *self = Self::Pending { target };
        target
    }

    /// Settles a pending toggle and returns the value the indicator should show.
    /// Outside `Pending` this is a no-op returning `current`.
    pub fn finish(&mut self, current: bool, result: Result<(), &ClientError>) -> bool {
        let Self::Pending { target } = *self else {
            return current;
        };
        match result {
            Ok(()) => {
                *self = Self::Succeeded { favorite: target };
                target
            }
            Err(err) => {
                *self = Self::Failed {
                    favorite: current,
                    error: err.to_string(),
                };
                current
            }
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

pub struct ProjectDetailView {
    project: Project,
    favorite: bool,
    toggle: FavoriteToggle,
}

impl ProjectDetailView {
    /// Loads the project by slug. Any failure sends the visitor back to the
    /// listing with a "Project not found" notification.
    ///
    /// # Errors
    /// Returns the route to redirect to.
    pub async fn load(
        auth: &AuthController,
        slug: &str,
        toasts: &mut Toasts,
    ) -> Result<Self, Route> {
        match auth.client().projects().get(slug).await {
            Ok(project) => Ok(Self::new(project, auth)),
            Err(err) => {
                warn!("Failed to load project {slug}: {err}");
                toasts.error("Project not found");
                Err(Route::Projects)
            }
        }
    }

    /// Indicator state comes from the cached user's favorites.
    #[must_use]
    pub fn new(project: Project, auth: &AuthController) -> Self {
        let favorite = auth
            .current_user()
            .is_some_and(|user| user.has_favorite(project.id));
        Self {
            project,
            favorite,
            toggle: FavoriteToggle::Idle,
        }
    }

    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    #[must_use]
    pub fn toggle_state(&self) -> &FavoriteToggle {
        &self.toggle
    }

    /// Adds or removes the project from the user's favorites.
    ///
    /// Returns a route when the visitor must sign in first, including when
    /// the server has stopped accepting the session token.
    pub async fn toggle_favorite(
        &mut self,
        auth: &mut AuthController,
        toasts: &mut Toasts,
    ) -> Option<Route> {
        if !auth.is_authenticated() {
            toasts.error("Please login to save favorites");
            return Some(Route::Login);
        }

        let project_id = self.project.id;
        let favorites = auth.client().favorites();
        let target = self.toggle.begin(self.favorite);
        let result = if target {
            favorites.add(project_id).await
        } else {
            favorites.remove(project_id).await
        };

        self.favorite = self
            .toggle
            .finish(self.favorite, result.as_ref().map(|_| ()));

        match result {
            Ok(_) => {
                auth.note_favorite(project_id, target);
                toasts.success(if target {
                    "Added to favorites"
                } else {
                    "Removed from favorites"
                });
            }
            Err(err) => {
                return report_failure(auth, &err, toasts, "Failed to update favorites").await;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_success_flips() {
        let mut toggle = FavoriteToggle::default();
        assert!(toggle.begin(false));
        assert!(toggle.is_pending());
        assert!(toggle.finish(false, Ok(())));
        assert_eq!(toggle, FavoriteToggle::Succeeded { favorite: true });
    }

    #[test]
    fn toggle_failure_keeps_value() {
        let mut toggle = FavoriteToggle::default();
        assert!(!toggle.begin(true));
        let err = ClientError::Server {
            status: 500,
            message: "Internal server error".to_string(),
        };
        assert!(toggle.finish(true, Err(&err)));
        assert!(matches!(
            toggle,
            FavoriteToggle::Failed { favorite: true, .. }
        ));
    }

    #[test]
    fn finish_without_begin_is_a_no_op() {
        let mut toggle = FavoriteToggle::Succeeded { favorite: true };
        assert!(!toggle.finish(false, Ok(())));
        assert_eq!(toggle, FavoriteToggle::Succeeded { favorite: true });
    }
}
