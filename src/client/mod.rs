//! Client core: a typed HTTP wrapper over the `/api` surface, session
//! persistence, the auth controller and page-level view state.
//!
//! ```no_run
//! use hty_realty::client::{ApiClient, AuthController, FileSessionStore};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), hty_realty::client::ClientError> {
//! let client = ApiClient::new("http://localhost:8080")?;
//! let mut auth = AuthController::new(client, Arc::new(FileSessionStore::new("session.json")));
//! if auth.init().await.is_none() {
//!     auth.login("buyer@example.com", "correct-horse").await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod error;
pub mod http;
pub mod session;
pub mod views;

pub use self::{
    auth::AuthController,
    error::ClientError,
    http::ApiClient,
    session::{FileSessionStore, MemorySessionStore, SessionStore},
};
