//! In-process store backed by vectors behind a single `RwLock`.
//!
//! Used when no DSN is configured and by the router tests. Vectors keep
//! insertion order, which is the order `PgStore` returns for the same queries.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, UserRecord};
use crate::model::{
    BlogCategory, BlogPost, ContactInquiry, InquiryStatus, Project, ProjectStatus, Resource,
    ResourceCategory, Role, Transaction, TransactionStatus, User,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRecord>,
    projects: Vec<Project>,
    posts: Vec<BlogPost>,
    inquiries: Vec<ContactInquiry>,
    resources: Vec<Resource>,
    transactions: Vec<Transaction>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn count<T>(rows: &[T], keep: impl Fn(&T) -> bool) -> u64 {
    rows.iter().filter(|row| keep(row)).count() as u64
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, record: UserRecord) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|row| row.user.email.eq_ignore_ascii_case(&record.user.email))
        {
            return Err(StoreError::Conflict("email already registered"));
        }
        let user = record.user.clone();
        tables.users.push(record);
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|row| row.user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|row| row.user.id == id)
            .map(|row| row.user.clone()))
    }

    async fn add_favorite(&self, user_id: Uuid, project_id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(row) = tables.users.iter_mut().find(|row| row.user.id == user_id) {
            if !row.user.favorites.contains(&project_id) {
                row.user.favorites.push(project_id);
            }
        }
        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, project_id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(row) = tables.users.iter_mut().find(|row| row.user.id == user_id) {
            row.user.favorites.retain(|id| *id != project_id);
        }
        Ok(())
    }

    async fn count_users(&self, role: Role) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(count(&tables.users, |row| row.user.role == role))
    }

    async fn insert_project(&self, project: Project) -> Result<Project, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.projects.iter().any(|row| row.slug == project.slug) {
            return Err(StoreError::Conflict("project slug already exists"));
        }
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .filter(|row| status.map_or(true, |status| row.status == status))
            .cloned()
            .collect())
    }

    async fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|row| row.slug == slug).cloned())
    }

    async fn find_projects(&self, ids: &[Uuid]) -> Result<Vec<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .filter(|row| ids.contains(&row.id))
            .cloned()
            .collect())
    }

    async fn update_project(&self, project: Project) -> Result<Option<Project>, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .projects
            .iter()
            .any(|row| row.slug == project.slug && row.id != project.id)
        {
            return Err(StoreError::Conflict("project slug already exists"));
        }
        let Some(row) = tables.projects.iter_mut().find(|row| row.id == project.id) else {
            return Ok(None);
        };
        let created_at = row.created_at;
        *row = Project {
            created_at,
            ..project
        };
        Ok(Some(row.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|row| row.id != id);
        Ok(tables.projects.len() != before)
    }

    async fn count_projects(&self) -> Result<u64, StoreError> {
        Ok(self.tables.read().await.projects.len() as u64)
    }

    async fn insert_post(&self, post: BlogPost) -> Result<BlogPost, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.posts.iter().any(|row| row.slug == post.slug) {
            return Err(StoreError::Conflict("post slug already exists"));
        }
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn list_posts(
        &self,
        category: Option<BlogCategory>,
        limit: usize,
    ) -> Result<Vec<BlogPost>, StoreError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<BlogPost> = tables
            .posts
            .iter()
            .filter(|row| row.published)
            .filter(|row| category.map_or(true, |category| row.category == category))
            .cloned()
            .collect();
        // Ties on created_at go to the later insert.
        posts.reverse();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|row| row.slug == slug).cloned())
    }

    async fn insert_inquiry(&self, inquiry: ContactInquiry) -> Result<ContactInquiry, StoreError> {
        self.tables.write().await.inquiries.push(inquiry.clone());
        Ok(inquiry)
    }

    async fn list_inquiries(
        &self,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<ContactInquiry>, StoreError> {
        let tables = self.tables.read().await;
        let mut inquiries: Vec<ContactInquiry> = tables
            .inquiries
            .iter()
            .filter(|row| status.map_or(true, |status| row.status == status))
            .cloned()
            .collect();
        inquiries.reverse();
        inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inquiries)
    }

    async fn update_inquiry_status(
        &self,
        id: Uuid,
        status: InquiryStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.inquiries.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_inquiries(&self, status: Option<InquiryStatus>) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(count(&tables.inquiries, |row| {
            status.map_or(true, |status| row.status == status)
        }))
    }

    async fn insert_resource(&self, resource: Resource) -> Result<Resource, StoreError> {
        self.tables.write().await.resources.push(resource.clone());
        Ok(resource)
    }

    async fn list_resources(
        &self,
        category: Option<ResourceCategory>,
        include_gated: bool,
    ) -> Result<Vec<Resource>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .resources
            .iter()
            .filter(|row| include_gated || !row.requires_auth)
            .filter(|row| category.map_or(true, |category| row.category == category))
            .cloned()
            .collect())
    }

    async fn insert_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .transactions
            .iter()
            .any(|row| row.order_id == transaction.order_id)
        {
            return Err(StoreError::Conflict("order id already exists"));
        }
        tables.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn find_transaction(&self, order_id: &str) -> Result<Option<Transaction>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .transactions
            .iter()
            .find(|row| row.order_id == order_id)
            .cloned())
    }

    async fn settle_transaction(
        &self,
        order_id: &str,
        status: TransactionStatus,
        payment_id: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables
            .transactions
            .iter_mut()
            .filter(|row| row.status == TransactionStatus::Created)
            .find(|row| row.order_id == order_id)
        {
            Some(row) => {
                row.status = status;
                if let Some(payment_id) = payment_id {
                    row.payment_id = Some(payment_id.to_string());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_transactions(
        &self,
        status: Option<TransactionStatus>,
    ) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(count(&tables.transactions, |row| {
            status.map_or(true, |status| row.status == status)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InquiryType, ProjectInput};
    use chrono::{Duration, Utc};

    fn project(slug: &str, status: ProjectStatus) -> Project {
        ProjectInput {
            title: slug.to_string(),
            slug: slug.to_string(),
            tagline: String::new(),
            description: String::new(),
            location: "Pune".to_string(),
            status,
            hero_image: "hero.jpg".to_string(),
            images: Vec::new(),
            amenities: Vec::new(),
            floor_plans: Vec::new(),
            coordinates: None,
        }
        .into_project(Uuid::new_v4(), slug.to_string(), Utc::now())
    }

    fn inquiry(minutes_ago: i64) -> ContactInquiry {
        ContactInquiry {
            id: Uuid::new_v4(),
            name: "Ravi".to_string(),
            phone: "1".to_string(),
            email: "ravi@example.com".to_string(),
            message: "hi".to_string(),
            inquiry_type: InquiryType::Question,
            preferred_time: None,
            status: InquiryStatus::New,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn project_slugs_are_unique() {
        let store = MemoryStore::new();
        store
            .insert_project(project("sky-villas", ProjectStatus::Ongoing))
            .await
            .unwrap();
        let err = store
            .insert_project(project("sky-villas", ProjectStatus::Upcoming))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_rejects_taken_slug() {
        let store = MemoryStore::new();
        let first = store
            .insert_project(project("first", ProjectStatus::Ongoing))
            .await
            .unwrap();
        store
            .insert_project(project("second", ProjectStatus::Ongoing))
            .await
            .unwrap();

        let mut renamed = project("first-renamed", ProjectStatus::Completed);
        renamed.id = first.id;
        let updated = store.update_project(renamed).await.unwrap().unwrap();
        assert_eq!(updated.created_at, first.created_at);
        assert_eq!(updated.status, ProjectStatus::Completed);

        let mut clash = project("second", ProjectStatus::Completed);
        clash.id = first.id;
        assert!(matches!(
            store.update_project(clash).await,
            Err(StoreError::Conflict(_))
        ));

        let unknown = project("third", ProjectStatus::Upcoming);
        assert!(store.update_project(unknown).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inquiries_come_back_newest_first() {
        let store = MemoryStore::new();
        let old = store.insert_inquiry(inquiry(30)).await.unwrap();
        let new = store.insert_inquiry(inquiry(1)).await.unwrap();
        let listed = store.list_inquiries(None).await.unwrap();
        assert_eq!(listed.first().map(|i| i.id), Some(new.id));
        assert_eq!(listed.last().map(|i| i.id), Some(old.id));
    }

    #[tokio::test]
    async fn favorites_are_a_set() {
        let store = MemoryStore::new();
        let user = User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            role: Role::User,
            favorites: Vec::new(),
            created_at: Utc::now(),
        };
        store
            .insert_user(UserRecord {
                user: user.clone(),
                password_hash: String::new(),
            })
            .await
            .unwrap();
        let project_id = Uuid::new_v4();
        store.add_favorite(user.id, project_id).await.unwrap();
        store.add_favorite(user.id, project_id).await.unwrap();
        let stored = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(stored.favorites, vec![project_id]);

        store.remove_favorite(user.id, project_id).await.unwrap();
        store.remove_favorite(user.id, project_id).await.unwrap();
        let stored = store.find_user(user.id).await.unwrap().unwrap();
        assert!(stored.favorites.is_empty());
    }

    #[tokio::test]
    async fn settled_transactions_stay_settled() {
        let store = MemoryStore::new();
        store
            .insert_transaction(Transaction {
                id: Uuid::new_v4(),
                user_id: None,
                order_id: "order_1".to_string(),
                payment_id: None,
                amount: 1_000,
                currency: "INR".to_string(),
                status: TransactionStatus::Created,
                notes: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        assert!(store
            .settle_transaction("order_1", TransactionStatus::Paid, Some("pay_1"))
            .await
            .unwrap());
        assert!(!store
            .settle_transaction("order_1", TransactionStatus::Failed, None)
            .await
            .unwrap());
        assert!(!store
            .settle_transaction("order_missing", TransactionStatus::Paid, None)
            .await
            .unwrap());

        let stored = store.find_transaction("order_1").await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Paid);
        assert_eq!(stored.payment_id.as_deref(), Some("pay_1"));
    }
}
