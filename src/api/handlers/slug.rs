//! Slug normalization for projects and posts.
//!
//! Slugs are lowercase `a-z0-9-` with collapsed separators. Uniqueness is left
//! to the store, which reports a taken slug as a conflict.

use crate::api::error::ApiError;

pub const SLUG_MIN: usize = 3;
pub const SLUG_MAX: usize = 63;

/// Normalizes user input into a URL-safe slug within `min..=max`.
/// Returns `None` when nothing usable is left.
pub fn normalize_slug(input: &str, min: usize, max: usize) -> Option<String> {
    let mut slug = String::new();
    let mut prev_dash = false;
    for ch in input.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    let truncated: String = slug.trim_matches('-').chars().take(max).collect();
    let normalized = truncated.trim_matches('-');
    if normalized.len() < min {
        return None;
    }
    Some(normalized.to_string())
}

/// Picks the explicit slug when one was sent, otherwise derives it from the title.
pub fn slug_for(explicit: &str, title: &str) -> Result<String, ApiError> {
    let source = if explicit.trim().is_empty() {
        title
    } else {
        explicit
    };
    normalize_slug(source, SLUG_MIN, SLUG_MAX).ok_or_else(|| {
        ApiError::bad_request(format!(
            "Slug must have between {SLUG_MIN} and {SLUG_MAX} letters, digits or dashes"
        ))
    })
}
