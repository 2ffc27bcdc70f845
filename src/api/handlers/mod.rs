pub mod admin;
pub mod auth;
pub mod blog;
pub mod contact;
pub mod favorites;
pub mod health;
pub mod payments;
pub mod projects;
pub mod resources;
pub mod slug;

#[cfg(test)]
mod tests;

use std::str::FromStr;

use crate::{
    api::error::{capitalize, ApiError},
    model::UnknownVariant,
};

/// Parses an optional query filter. Missing and blank values both mean "no filter".
pub(crate) fn parse_filter<T>(raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = UnknownVariant>,
{
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|err: UnknownVariant| ApiError::bad_request(capitalize(&err.to_string()))),
        None => Ok(None),
    }
}
