//! One thin wrapper per backend entity. Each method maps to one REST call.

mod admin;
mod auth;
mod blog;
mod contact;
mod favorites;
mod payments;
mod projects;
mod resources;

pub use self::{
    admin::AdminApi, auth::AuthApi, blog::BlogApi, contact::ContactApi, favorites::FavoritesApi,
    payments::PaymentsApi, projects::ProjectsApi, resources::ResourcesApi,
};

/// Query pair for an optional filter; `None` sends nothing.
fn filter<T: std::fmt::Display>(name: &'static str, value: Option<T>) -> Vec<(&'static str, String)> {
    value
        .map(|value| (name, value.to_string()))
        .into_iter()
        .collect()
}
