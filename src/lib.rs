//! # HTY Realty
//!
//! Marketing and lead-generation platform for a real-estate developer: a
//! public catalog of projects, news posts and downloadable resources, a
//! contact funnel for callback requests and questions, per-user favorites,
//! and an admin surface for analytics and inquiry triage.
//!
//! ## Layout
//!
//! - [`model`]: records and closed enums shared by both sides of the wire.
//! - [`api`]: the `axum` backend under `/api`, backed by a [`api::storage::Store`]
//!   (`PostgreSQL` via `sqlx`, or in memory when no DSN is configured).
//! - [`client`]: the typed client core. An [`client::ApiClient`] attaches the
//!   bearer token, the [`client::AuthController`] owns the session, and
//!   [`client::views`] hold page-level state.
//! - [`cli`]: `clap` command, telemetry and the server action.
//!
//! ## Authentication
//!
//! Login and register return an HS256 JWT (`sub` = user id). Passwords are
//! stored as `Argon2id` PHC strings. Self-registration always yields role
//! `user`; an admin account can be bootstrapped at startup.
//!
//! ## Errors
//!
//! Every non-2xx response carries `{"detail": "..."}`. The client maps status
//! codes onto [`client::ClientError`] and never treats a failure as fatal.

pub mod api;
pub mod cli;
pub mod client;
pub mod model;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn user_agent_names_the_package() {
        assert!(APP_USER_AGENT.starts_with("hty-realty/"));
    }
}
