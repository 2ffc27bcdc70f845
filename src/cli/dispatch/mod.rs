//! Maps validated CLI matches to the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, payments, ARG_CORS_ORIGINS, ARG_DSN, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .filter(|dsn| !dsn.trim().is_empty())
        .cloned();
    let cors_origins = matches
        .get_many::<String>(ARG_CORS_ORIGINS)
        .map(|values| {
            values
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let auth_opts = auth::Options::parse(matches)?;
    let payment_opts = payments::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        dsn,
        cors_origins,
        jwt_secret: auth_opts.jwt_secret,
        token_ttl_days: auth_opts.token_ttl_days,
        admin: auth_opts.admin,
        razorpay_key_id: payment_opts.key_id,
        razorpay_key_secret: payment_opts.key_secret,
    }))
}
