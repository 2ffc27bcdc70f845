use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

use crate::api::handlers::auth::{
    token::{DEFAULT_TOKEN_TTL_DAYS, MAX_TOKEN_TTL_DAYS},
    AdminSeed,
};

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_TOKEN_TTL_DAYS: &str = "token-ttl-days";
pub const ARG_ADMIN_EMAIL: &str = "admin-email";
pub const ARG_ADMIN_PASSWORD: &str = "admin-password";
pub const ARG_ADMIN_NAME: &str = "admin-name";

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: SecretString,
    pub token_ttl_days: i64,
    pub admin: Option<AdminSeed>,
}

impl Options {
    /// Parse token and admin bootstrap arguments.
    ///
    /// # Errors
    /// Returns an error if the signing secret is missing or blank.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .filter(|secret| !secret.trim().is_empty())
            .cloned()
            .ok_or_else(|| anyhow!("missing required argument: --{ARG_JWT_SECRET}"))?;

        let token_ttl_days = matches
            .get_one::<i64>(ARG_TOKEN_TTL_DAYS)
            .copied()
            .unwrap_or(DEFAULT_TOKEN_TTL_DAYS);

        let admin = match (
            matches.get_one::<String>(ARG_ADMIN_EMAIL),
            matches.get_one::<String>(ARG_ADMIN_PASSWORD),
        ) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: matches
                    .get_one::<String>(ARG_ADMIN_NAME)
                    .cloned()
                    .unwrap_or_else(|| "Admin".to_string()),
                email: email.trim().to_string(),
                password: SecretString::from(password.clone()),
            }),
            _ => None,
        };

        Ok(Self {
            jwt_secret: SecretString::from(jwt_secret),
            token_ttl_days,
            admin,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign access tokens (HS256)")
                .env("HTY_JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_DAYS)
                .long(ARG_TOKEN_TTL_DAYS)
                .help("Access token lifetime in days, at most ten years")
                .env("HTY_TOKEN_TTL_DAYS")
                .default_value("30")
                .value_parser(clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_DAYS)),
        )
        .arg(
            Arg::new(ARG_ADMIN_EMAIL)
                .long(ARG_ADMIN_EMAIL)
                .help("Email of the admin account created at startup")
                .env("HTY_ADMIN_EMAIL")
                .requires(ARG_ADMIN_PASSWORD),
        )
        .arg(
            Arg::new(ARG_ADMIN_PASSWORD)
                .long(ARG_ADMIN_PASSWORD)
                .help("Password of the admin account created at startup")
                .env("HTY_ADMIN_PASSWORD")
                .hide_env_values(true)
                .requires(ARG_ADMIN_EMAIL),
        )
        .arg(
            Arg::new(ARG_ADMIN_NAME)
                .long(ARG_ADMIN_NAME)
                .help("Display name of the bootstrapped admin")
                .env("HTY_ADMIN_NAME")
                .default_value("Admin"),
        )
}
