use tracing::warn;

use crate::{
    client::http::ApiClient,
    model::{BlogPost, Project},
};

pub const FEATURED_PROJECTS: usize = 3;
pub const LATEST_POSTS: usize = 3;

/// Landing page: a few featured projects and the latest news.
#[derive(Debug, Default)]
pub struct HomeView {
    pub projects: Vec<Project>,
    pub news: Vec<BlogPost>,
}

impl HomeView {
    /// Fetches both halves concurrently. A half that fails renders empty.
    pub async fn load(client: &ApiClient) -> Self {
        let projects_api = client.projects();
        let blog_api = client.blog();
        let (projects, news) = tokio::join!(
            projects_api.list(None),
            blog_api.list(None, Some(LATEST_POSTS))
        );

        let projects = projects.map_or_else(
            |err| {
                warn!("Failed to load featured projects: {err}");
                Vec::new()
            },
            |mut projects| {
                projects.truncate(FEATURED_PROJECTS);
                projects
            },
        );
        let news = news.unwrap_or_else(|err| {
            warn!("Failed to load latest news: {err}");
            Vec::new()
        });

        Self { projects, news }
    }
}
