//! Persistence seam for the API.
//!
//! Handlers only talk to `dyn Store`. `PgStore` is the production backend;
//! `MemoryStore` serves development runs without a DSN and the router tests.
//! Both keep the same observable contract: listings come back in the order
//! documented on each method, uniqueness violations surface as
//! `StoreError::Conflict`, and "row not found" is an `Ok(None)`/`Ok(false)`,
//! never an error.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    BlogCategory, BlogPost, ContactInquiry, InquiryStatus, Project, ProjectStatus, Resource,
    ResourceCategory, Role, Transaction, TransactionStatus, User,
};

/// Handle passed to handlers through an `Extension` layer.
pub type SharedStore = Arc<dyn Store>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (email, slug, order id) is already taken.
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Account row including the password hash. Only auth handlers see this.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap liveness check used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Inserts an account; `Conflict` when the email is taken (case-insensitive).
    async fn insert_user(&self, record: UserRecord) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Adds to the favorites set; a repeated add leaves a single entry.
    async fn add_favorite(&self, user_id: Uuid, project_id: Uuid) -> Result<(), StoreError>;
    /// Removes from the favorites set; removing an absent id is a no-op.
    async fn remove_favorite(&self, user_id: Uuid, project_id: Uuid) -> Result<(), StoreError>;
    async fn count_users(&self, role: Role) -> Result<u64, StoreError>;

    /// Inserts a project; `Conflict` when the slug is taken.
    async fn insert_project(&self, project: Project) -> Result<Project, StoreError>;
    /// Lists projects in insertion order.
    async fn list_projects(&self, status: Option<ProjectStatus>)
        -> Result<Vec<Project>, StoreError>;
    async fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError>;
    /// Projects whose id is in `ids`, in insertion order. Unknown ids are skipped.
    async fn find_projects(&self, ids: &[Uuid]) -> Result<Vec<Project>, StoreError>;
    /// Replaces the editable fields of `project.id`, keeping `created_at`.
    /// Returns `None` when the id is unknown.
    async fn update_project(&self, project: Project) -> Result<Option<Project>, StoreError>;
    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn count_projects(&self) -> Result<u64, StoreError>;

    /// Inserts a post; `Conflict` when the slug is taken.
    async fn insert_post(&self, post: BlogPost) -> Result<BlogPost, StoreError>;
    /// Published posts, newest first, at most `limit`.
    async fn list_posts(
        &self,
        category: Option<BlogCategory>,
        limit: usize,
    ) -> Result<Vec<BlogPost>, StoreError>;
    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, StoreError>;

    async fn insert_inquiry(&self, inquiry: ContactInquiry) -> Result<ContactInquiry, StoreError>;
    /// Inquiries newest first.
    async fn list_inquiries(
        &self,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<ContactInquiry>, StoreError>;
    /// Sets the status unconditionally. Returns `false` when the id is unknown.
    async fn update_inquiry_status(
        &self,
        id: Uuid,
        status: InquiryStatus,
    ) -> Result<bool, StoreError>;
    async fn count_inquiries(&self, status: Option<InquiryStatus>) -> Result<u64, StoreError>;

    async fn insert_resource(&self, resource: Resource) -> Result<Resource, StoreError>;
    /// Resources in insertion order; gated ones only when `include_gated`.
    async fn list_resources(
        &self,
        category: Option<ResourceCategory>,
        include_gated: bool,
    ) -> Result<Vec<Resource>, StoreError>;

    /// Inserts a transaction; `Conflict` when the order id is taken.
    async fn insert_transaction(&self, transaction: Transaction)
        -> Result<Transaction, StoreError>;
    async fn find_transaction(&self, order_id: &str) -> Result<Option<Transaction>, StoreError>;
    /// Moves a still-`created` transaction for `order_id` to `status`.
    /// Returns `false` when the order is unknown or already settled.
    async fn settle_transaction(
        &self,
        order_id: &str,
        status: TransactionStatus,
        payment_id: Option<&str>,
    ) -> Result<bool, StoreError>;
    async fn count_transactions(
        &self,
        status: Option<TransactionStatus>,
    ) -> Result<u64, StoreError>;
}
