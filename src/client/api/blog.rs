use super::filter;
use crate::{
    client::{error::ClientError, http::ApiClient},
    model::{BlogCategory, BlogPost, BlogPostInput},
};

#[derive(Debug, Clone)]
pub struct BlogApi {
    client: ApiClient,
}

impl BlogApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Published posts, newest first. The server caps the count at 100 when `limit` is absent.
    ///
    /// # Errors
    /// Any transport or server failure.
    pub async fn list(
        &self,
        category: Option<BlogCategory>,
        limit: Option<usize>,
    ) -> Result<Vec<BlogPost>, ClientError> {
        let mut query = filter("category", category);
        query.extend(filter("limit", limit));
        self.client.get(&["blog"], &query).await
    }

    /// # Errors
    /// `NotFound` for an unknown slug.
    pub async fn get(&self, slug: &str) -> Result<BlogPost, ClientError> {
        self.client.get(&["blog", slug], &[]).await
    }

    /// # Errors
    /// `Forbidden` for non-admins.
    pub async fn create(&self, input: &BlogPostInput) -> Result<BlogPost, ClientError> {
        self.client.post(&["blog"], input).await
    }
}
