//! Postgres backend.
//!
//! Enumerations are stored as their lowercase wire names in `TEXT` columns and
//! parsed back on read. Every table carries a `seq` column so "insertion order"
//! is well defined even when `created_at` values collide.

use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions, PgRow},
    types::Json,
    Row,
};
use std::{collections::BTreeMap, str::FromStr, time::Duration};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{Store, StoreError, UserRecord};
use crate::model::{
    BlogCategory, BlogPost, ContactInquiry, Coordinates, FloorPlan, InquiryStatus, Project,
    ProjectStatus, Resource, ResourceCategory, Role, Transaction, TransactionStatus, User,
};

const SCHEMA_SQL: &str = include_str!("../../../sql/schema.sql");

const PROJECT_COLUMNS: &str = "id, slug, title, tagline, description, location, status, \
    hero_image, images, amenities, floor_plans, lat, lng, created_at, updated_at";
const POST_COLUMNS: &str =
    "id, slug, title, excerpt, content, category, image, author, published, created_at, updated_at";
const INQUIRY_COLUMNS: &str =
    "id, name, phone, email, message, inquiry_type, preferred_time, status, created_at";
const USER_COLUMNS: &str = "id, name, email, phone, role, favorites, created_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects a small pool to `dsn`.
    ///
    /// # Errors
    /// Returns an error if no connection can be established.
    pub async fn connect(dsn: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema. Safe to run on every start.
    ///
    /// # Errors
    /// Returns an error if any statement fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            debug!("Applying schema statement {}", index + 1);
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Splits a schema file into statements. Assumes every statement ends with `;`
/// at the end of a line and that no statement nests semicolons.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn conflict_or(err: sqlx::Error, message: &'static str) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Conflict(message)
    } else {
        StoreError::Database(err)
    }
}

fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    })
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        role: parse_column::<Role>(row, "role")?,
        favorites: row.try_get("favorites")?,
        created_at: row.try_get("created_at")?,
    })
}

fn project_from_row(row: &PgRow) -> Result<Project, sqlx::Error> {
    let lat: Option<f64> = row.try_get("lat")?;
    let lng: Option<f64> = row.try_get("lng")?;
    let Json(floor_plans): Json<Vec<FloorPlan>> = row.try_get("floor_plans")?;
    Ok(Project {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        tagline: row.try_get("tagline")?,
        description: row.try_get("description")?,
        location: row.try_get("location")?,
        status: parse_column::<ProjectStatus>(row, "status")?,
        hero_image: row.try_get("hero_image")?,
        images: row.try_get("images")?,
        amenities: row.try_get("amenities")?,
        floor_plans,
        coordinates: lat.zip(lng).map(|(lat, lng)| Coordinates { lat, lng }),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn post_from_row(row: &PgRow) -> Result<BlogPost, sqlx::Error> {
    Ok(BlogPost {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        excerpt: row.try_get("excerpt")?,
        content: row.try_get("content")?,
        category: parse_column::<BlogCategory>(row, "category")?,
        image: row.try_get("image")?,
        author: row.try_get("author")?,
        published: row.try_get("published")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn inquiry_from_row(row: &PgRow) -> Result<ContactInquiry, sqlx::Error> {
    Ok(ContactInquiry {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        message: row.try_get("message")?,
        inquiry_type: parse_column(row, "inquiry_type")?,
        preferred_time: row.try_get("preferred_time")?,
        status: parse_column::<InquiryStatus>(row, "status")?,
        created_at: row.try_get("created_at")?,
    })
}

fn resource_from_row(row: &PgRow) -> Result<Resource, sqlx::Error> {
    Ok(Resource {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category: parse_column::<ResourceCategory>(row, "category")?,
        file_url: row.try_get("file_url")?,
        requires_auth: row.try_get("requires_auth")?,
        created_at: row.try_get("created_at")?,
    })
}

fn transaction_from_row(row: &PgRow) -> Result<Transaction, sqlx::Error> {
    let notes: Option<Json<BTreeMap<String, String>>> = row.try_get("notes")?;
    Ok(Transaction {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        order_id: row.try_get("order_id")?,
        payment_id: row.try_get("payment_id")?,
        amount: row.try_get("amount")?,
        currency: row.try_get("currency")?,
        status: parse_column::<TransactionStatus>(row, "status")?,
        notes: notes.map(|Json(notes)| notes),
        created_at: row.try_get("created_at")?,
    })
}

fn collect<T>(
    rows: &[PgRow],
    decode: fn(&PgRow) -> Result<T, sqlx::Error>,
) -> Result<Vec<T>, StoreError> {
    rows.iter()
        .map(|row| decode(row).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self, record), fields(email = %record.user.email))]
    async fn insert_user(&self, record: UserRecord) -> Result<User, StoreError> {
        let user = record.user;
        let query = format!(
            "INSERT INTO users (id, name, email, phone, role, password_hash, favorites, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(user.role.as_str())
            .bind(&record.password_hash)
            .bind(&user.favorites)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| conflict_or(err, "email already registered"))?;
        Ok(user_from_row(&row)?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE LOWER(email) = LOWER($1)"
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(UserRecord {
                user: user_from_row(&row)?,
                password_hash: row.try_get("password_hash")?,
            })),
            None => Ok(None),
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn add_favorite(&self, user_id: Uuid, project_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r"
            UPDATE users SET favorites = array_append(favorites, $2)
            WHERE id = $1 AND NOT ($2 = ANY(favorites))
            ",
        )
        .bind(user_id)
        .bind(project_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, project_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET favorites = array_remove(favorites, $2) WHERE id = $1")
            .bind(user_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_users(&self, role: Role) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    #[instrument(skip(self, project), fields(slug = %project.slug))]
    async fn insert_project(&self, project: Project) -> Result<Project, StoreError> {
        let query = format!(
            "INSERT INTO projects ({PROJECT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {PROJECT_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(project.id)
            .bind(&project.slug)
            .bind(&project.title)
            .bind(&project.tagline)
            .bind(&project.description)
            .bind(&project.location)
            .bind(project.status.as_str())
            .bind(&project.hero_image)
            .bind(&project.images)
            .bind(&project.amenities)
            .bind(Json(&project.floor_plans))
            .bind(project.coordinates.map(|c| c.lat))
            .bind(project.coordinates.map(|c| c.lng))
            .bind(project.created_at)
            .bind(project.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| conflict_or(err, "project slug already exists"))?;
        Ok(project_from_row(&row)?)
    }

    async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, StoreError> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY seq"
        );
        let rows = sqlx::query(&query)
            .bind(status.map(ProjectStatus::as_str))
            .fetch_all(&self.pool)
            .await?;
        collect(&rows, project_from_row)
    }

    async fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = $1");
        let row = sqlx::query(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(project_from_row).transpose()?)
    }

    async fn find_projects(&self, ids: &[Uuid]) -> Result<Vec<Project>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query =
            format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ANY($1) ORDER BY seq");
        let rows = sqlx::query(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        collect(&rows, project_from_row)
    }

    #[instrument(skip(self, project), fields(id = %project.id))]
    async fn update_project(&self, project: Project) -> Result<Option<Project>, StoreError> {
        let query = format!(
            "UPDATE projects SET
                slug = $2, title = $3, tagline = $4, description = $5, location = $6,
                status = $7, hero_image = $8, images = $9, amenities = $10,
                floor_plans = $11, lat = $12, lng = $13, updated_at = $14
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(project.id)
            .bind(&project.slug)
            .bind(&project.title)
            .bind(&project.tagline)
            .bind(&project.description)
            .bind(&project.location)
            .bind(project.status.as_str())
            .bind(&project.hero_image)
            .bind(&project.images)
            .bind(&project.amenities)
            .bind(Json(&project.floor_plans))
            .bind(project.coordinates.map(|c| c.lat))
            .bind(project.coordinates.map(|c| c.lng))
            .bind(project.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| conflict_or(err, "project slug already exists"))?;
        Ok(row.as_ref().map(project_from_row).transpose()?)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_projects(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(count))
    }

    #[instrument(skip(self, post), fields(slug = %post.slug))]
    async fn insert_post(&self, post: BlogPost) -> Result<BlogPost, StoreError> {
        let query = format!(
            "INSERT INTO blog_posts ({POST_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(post.id)
            .bind(&post.slug)
            .bind(&post.title)
            .bind(&post.excerpt)
            .bind(&post.content)
            .bind(post.category.as_str())
            .bind(&post.image)
            .bind(&post.author)
            .bind(post.published)
            .bind(post.created_at)
            .bind(post.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| conflict_or(err, "post slug already exists"))?;
        Ok(post_from_row(&row)?)
    }

    async fn list_posts(
        &self,
        category: Option<BlogCategory>,
        limit: usize,
    ) -> Result<Vec<BlogPost>, StoreError> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM blog_posts
             WHERE published AND ($1::text IS NULL OR category = $1)
             ORDER BY created_at DESC, seq DESC
             LIMIT $2"
        );
        let rows = sqlx::query(&query)
            .bind(category.map(BlogCategory::as_str))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        collect(&rows, post_from_row)
    }

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, StoreError> {
        let query = format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = $1");
        let row = sqlx::query(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(post_from_row).transpose()?)
    }

    async fn insert_inquiry(&self, inquiry: ContactInquiry) -> Result<ContactInquiry, StoreError> {
        let query = format!(
            "INSERT INTO inquiries ({INQUIRY_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {INQUIRY_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(inquiry.id)
            .bind(&inquiry.name)
            .bind(&inquiry.phone)
            .bind(&inquiry.email)
            .bind(&inquiry.message)
            .bind(inquiry.inquiry_type.as_str())
            .bind(&inquiry.preferred_time)
            .bind(inquiry.status.as_str())
            .bind(inquiry.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(inquiry_from_row(&row)?)
    }

    async fn list_inquiries(
        &self,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<ContactInquiry>, StoreError> {
        let query = format!(
            "SELECT {INQUIRY_COLUMNS} FROM inquiries
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC, seq DESC"
        );
        let rows = sqlx::query(&query)
            .bind(status.map(InquiryStatus::as_str))
            .fetch_all(&self.pool)
            .await?;
        collect(&rows, inquiry_from_row)
    }

    async fn update_inquiry_status(
        &self,
        id: Uuid,
        status: InquiryStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE inquiries SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_inquiries(&self, status: Option<InquiryStatus>) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inquiries WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(InquiryStatus::as_str))
        .fetch_one(&self.pool)
        .await?;
        Ok(to_count(count))
    }

    async fn insert_resource(&self, resource: Resource) -> Result<Resource, StoreError> {
        let row = sqlx::query(
            r"
            INSERT INTO resources (id, title, description, category, file_url, requires_auth, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, category, file_url, requires_auth, created_at
            ",
        )
        .bind(resource.id)
        .bind(&resource.title)
        .bind(&resource.description)
        .bind(resource.category.as_str())
        .bind(&resource.file_url)
        .bind(resource.requires_auth)
        .bind(resource.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(resource_from_row(&row)?)
    }

    async fn list_resources(
        &self,
        category: Option<ResourceCategory>,
        include_gated: bool,
    ) -> Result<Vec<Resource>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, description, category, file_url, requires_auth, created_at
            FROM resources
            WHERE ($1::text IS NULL OR category = $1) AND ($2 OR NOT requires_auth)
            ORDER BY seq
            ",
        )
        .bind(category.map(ResourceCategory::as_str))
        .bind(include_gated)
        .fetch_all(&self.pool)
        .await?;
        collect(&rows, resource_from_row)
    }

    #[instrument(skip(self, transaction), fields(order_id = %transaction.order_id))]
    async fn insert_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, StoreError> {
        sqlx::query(
            r"
            INSERT INTO transactions
                (id, user_id, order_id, payment_id, amount, currency, status, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(transaction.id)
        .bind(transaction.user_id)
        .bind(&transaction.order_id)
        .bind(&transaction.payment_id)
        .bind(transaction.amount)
        .bind(&transaction.currency)
        .bind(transaction.status.as_str())
        .bind(transaction.notes.as_ref().map(Json))
        .bind(transaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| conflict_or(err, "order id already exists"))?;
        Ok(transaction)
    }

    async fn find_transaction(&self, order_id: &str) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, order_id, payment_id, amount, currency, status, notes, created_at
            FROM transactions
            WHERE order_id = $1
            ",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(transaction_from_row).transpose()?)
    }

    async fn settle_transaction(
        &self,
        order_id: &str,
        status: TransactionStatus,
        payment_id: Option<&str>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE transactions
            SET status = $2, payment_id = COALESCE($3, payment_id)
            WHERE order_id = $1 AND status = 'created'
            ",
        )
        .bind(order_id)
        .bind(status.as_str())
        .bind(payment_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_transactions(
        &self,
        status: Option<TransactionStatus>,
    ) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(TransactionStatus::as_str))
        .fetch_one(&self.pool)
        .await?;
        Ok(to_count(count))
    }
}
