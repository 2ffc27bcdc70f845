//! Filterable list pages: projects, news and resources.
//!
//! A listing keeps one selected filter and the collection last fetched for
//! it. Every filter change replaces the collection with a fresh server
//! result; nothing is paged, merged or re-sorted on the client.

use std::{future::Future, str::FromStr};
use tracing::warn;

use super::notify::Toasts;
use crate::{
    client::{
        api::{BlogApi, ProjectsApi, ResourcesApi},
        error::ClientError,
    },
    model::{BlogCategory, BlogPost, Project, ProjectStatus, Resource, ResourceCategory},
};

/// A server-side collection that can be fetched with an optional filter.
pub trait Catalog {
    type Item;
    type Filter: Copy + PartialEq;

    /// Plural noun used in failure notifications.
    const NOUN: &'static str;
    /// Shown when a fetch comes back empty.
    const EMPTY_MESSAGE: &'static str;

    fn fetch(
        &self,
        filter: Option<Self::Filter>,
    ) -> impl Future<Output = Result<Vec<Self::Item>, ClientError>> + Send;
}

impl Catalog for ProjectsApi {
    type Item = Project;
    type Filter = ProjectStatus;

    const NOUN: &'static str = "projects";
    const EMPTY_MESSAGE: &'static str = "No projects found";

    fn fetch(
        &self,
        filter: Option<ProjectStatus>,
    ) -> impl Future<Output = Result<Vec<Project>, ClientError>> + Send {
        self.list(filter)
    }
}

impl Catalog for BlogApi {
    type Item = BlogPost;
    type Filter = BlogCategory;

    const NOUN: &'static str = "posts";
    const EMPTY_MESSAGE: &'static str = "No posts found";

    fn fetch(
        &self,
        filter: Option<BlogCategory>,
    ) -> impl Future<Output = Result<Vec<BlogPost>, ClientError>> + Send {
        self.list(filter, None)
    }
}

impl Catalog for ResourcesApi {
    type Item = Resource;
    type Filter = ResourceCategory;

    const NOUN: &'static str = "resources";
    const EMPTY_MESSAGE: &'static str = "No resources available yet";

    fn fetch(
        &self,
        filter: Option<ResourceCategory>,
    ) -> impl Future<Output = Result<Vec<Resource>, ClientError>> + Send {
        self.list(filter)
    }
}

/// The filter control of a list page. `All` sends no filter parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T: Copy> Filter<T> {
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl<T: FromStr> Filter<T> {
    /// Reads a filter from a URL query value. Missing, `all` or unrecognized
    /// values select everything.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .and_then(|value| value.parse().ok())
            .map_or(Self::All, Self::Only)
    }
}

/// What the page should render.
#[derive(Debug, PartialEq)]
pub enum ListingState<'a, T> {
    /// Nothing fetched yet.
    Loading,
    /// The first fetch failed; there is nothing to show until a retry.
    Failed,
    Empty(&'static str),
    Ready(&'a [T]),
}

pub struct ListingView<C: Catalog> {
    catalog: C,
    filter: Filter<C::Filter>,
    items: Vec<C::Item>,
    loaded: bool,
    failed: bool,
}

pub type ProjectsView = ListingView<ProjectsApi>;
pub type NewsView = ListingView<BlogApi>;
pub type ResourcesView = ListingView<ResourcesApi>;

impl<C: Catalog> ListingView<C> {
    #[must_use]
    pub fn new(catalog: C) -> Self {
        Self::with_filter(catalog, Filter::All)
    }

    /// Starts from a preselected filter, e.g. a category taken from the URL.
    #[must_use]
    pub fn with_filter(catalog: C, filter: Filter<C::Filter>) -> Self {
        Self {
            catalog,
            filter,
            items: Vec::new(),
            loaded: false,
            failed: false,
        }
    }

    /// Fetches the collection for the current filter.
    pub async fn load(&mut self, toasts: &mut Toasts) {
        match self.catalog.fetch(self.filter.value()).await {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                self.failed = false;
            }
            Err(err) => {
                self.failed = true;
                warn!("Failed to load {}: {err}", C::NOUN);
                toasts.error(format!("Failed to load {}", C::NOUN));
            }
        }
    }

    /// Changes the filter and refetches. Returns `false` without a request
    /// when `filter` is already selected.
    pub async fn select(&mut self, filter: Filter<C::Filter>, toasts: &mut Toasts) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        self.load(toasts).await;
        true
    }

    #[must_use]
    pub fn filter(&self) -> Filter<C::Filter> {
        self.filter
    }

    #[must_use]
    pub fn items(&self) -> &[C::Item] {
        &self.items
    }

    #[must_use]
    pub fn state(&self) -> ListingState<'_, C::Item> {
        if !self.loaded {
            if self.failed {
                ListingState::Failed
            } else {
                ListingState::Loading
            }
        } else if self.items.is_empty() {
            ListingState::Empty(C::EMPTY_MESSAGE)
        } else {
            ListingState::Ready(&self.items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Serves canned projects and records every fetch.
    #[derive(Clone, Default)]
    struct FakeCatalog {
        calls: Arc<Mutex<Vec<Option<ProjectStatus>>>>,
        failing: Arc<Mutex<bool>>,
    }

    impl FakeCatalog {
        fn calls(&self) -> Vec<Option<ProjectStatus>> {
            self.calls.lock().unwrap().clone()
        }

        fn fail(&self, failing: bool) {
            *self.failing.lock().unwrap() = failing;
        }
    }

    impl Catalog for FakeCatalog {
        type Item = ProjectStatus;
        type Filter = ProjectStatus;

        const NOUN: &'static str = "projects";
        const EMPTY_MESSAGE: &'static str = "No projects found";

        fn fetch(
            &self,
            filter: Option<ProjectStatus>,
        ) -> impl Future<Output = Result<Vec<ProjectStatus>, ClientError>> + Send {
            self.calls.lock().unwrap().push(filter);
            let failing = *self.failing.lock().unwrap();
            async move {
                if failing {
                    return Err(ClientError::Server {
                        status: 500,
                        message: "Internal server error".to_string(),
                    });
                }
                Ok(match filter {
                    // Nothing is upcoming in this catalog.
                    Some(ProjectStatus::Upcoming) => Vec::new(),
                    Some(status) => vec![status],
                    None => ProjectStatus::ALL.to_vec(),
                })
            }
        }
    }

    #[tokio::test]
    async fn one_fetch_per_filter_change() {
        let catalog = FakeCatalog::default();
        let mut view = ListingView::new(catalog.clone());
        let mut toasts = Toasts::new();
        assert_eq!(view.state(), ListingState::Loading);

        view.load(&mut toasts).await;
        assert_eq!(view.items().len(), 3);

        for status in [ProjectStatus::Ongoing, ProjectStatus::Completed] {
            assert!(view.select(Filter::Only(status), &mut toasts).await);
            assert_eq!(view.items(), &[status]);
        }
        assert!(view.select(Filter::All, &mut toasts).await);
        assert_eq!(view.items().len(), 3);

        assert_eq!(
            catalog.calls(),
            vec![
                None,
                Some(ProjectStatus::Ongoing),
                Some(ProjectStatus::Completed),
                None
            ]
        );
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn reselecting_issues_no_request() {
        let catalog = FakeCatalog::default();
        let mut view =
            ListingView::with_filter(catalog.clone(), Filter::Only(ProjectStatus::Ongoing));
        let mut toasts = Toasts::new();
        view.load(&mut toasts).await;

        assert!(!view.select(Filter::Only(ProjectStatus::Ongoing), &mut toasts).await);
        assert_eq!(catalog.calls().len(), 1);
    }

    #[tokio::test]
    async fn empty_result_renders_empty_state() {
        let mut view = ListingView::new(FakeCatalog::default());
        let mut toasts = Toasts::new();
        view.select(Filter::Only(ProjectStatus::Upcoming), &mut toasts)
            .await;
        assert_eq!(view.state(), ListingState::Empty("No projects found"));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_items() {
        let catalog = FakeCatalog::default();
        let mut view = ListingView::new(catalog.clone());
        let mut toasts = Toasts::new();
        view.load(&mut toasts).await;

        catalog.fail(true);
        assert!(view.select(Filter::Only(ProjectStatus::Ongoing), &mut toasts).await);
        assert_eq!(view.items().len(), 3);
        assert_eq!(view.filter(), Filter::Only(ProjectStatus::Ongoing));
        assert_eq!(toasts.last().unwrap().message, "Failed to load projects");
    }

    #[tokio::test]
    async fn failed_first_load_stops_loading() {
        let catalog = FakeCatalog::default();
        catalog.fail(true);
        let mut view = ListingView::new(catalog.clone());
        let mut toasts = Toasts::new();

        view.load(&mut toasts).await;
        assert_eq!(view.state(), ListingState::Failed);
        assert!(view.items().is_empty());
        assert_eq!(toasts.last().unwrap().message, "Failed to load projects");

        catalog.fail(false);
        view.load(&mut toasts).await;
        assert_eq!(view.state(), ListingState::Ready(&ProjectStatus::ALL[..]));
    }

    #[test]
    fn filter_from_query() {
        assert_eq!(
            Filter::<BlogCategory>::from_query(Some("media")),
            Filter::Only(BlogCategory::Media)
        );
        assert_eq!(Filter::<BlogCategory>::from_query(Some("all")), Filter::All);
        assert_eq!(Filter::<BlogCategory>::from_query(None), Filter::All);
    }
}
