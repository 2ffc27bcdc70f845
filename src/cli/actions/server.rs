use crate::api::{
    self,
    handlers::{
        auth::{token::TokenConfig, AdminSeed},
        payments::PaymentGateway,
    },
    ServerConfig,
};
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub cors_origins: Vec<String>,
    pub jwt_secret: SecretString,
    pub token_ttl_days: i64,
    pub admin: Option<AdminSeed>,
    pub razorpay_key_id: Option<String>,
    pub razorpay_key_secret: Option<SecretString>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the store cannot be opened or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    api::new(ServerConfig {
        port: args.port,
        dsn: args.dsn,
        tokens: TokenConfig::new(args.jwt_secret, args.token_ttl_days),
        cors_origins: args.cors_origins,
        admin: args.admin,
        gateway: PaymentGateway::new(args.razorpay_key_id, args.razorpay_key_secret),
    })
    .await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        (
            "store",
            args.dsn
                .as_deref()
                .map_or_else(|| "memory".to_string(), redact_dsn),
        ),
        ("cors_origins", args.cors_origins.join(",")),
        ("token_ttl_days", args.token_ttl_days.to_string()),
        (
            "admin_email",
            args.admin
                .as_ref()
                .map_or_else(|| "n/a".to_string(), |admin| admin.email.clone()),
        ),
        (
            "payments",
            if args.razorpay_key_id.is_some() && args.razorpay_key_secret.is_some() {
                "configured".to_string()
            } else {
                "disabled".to_string()
            },
        ),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsn_password_is_redacted() {
        assert_eq!(
            redact_dsn("postgres://hty:hunter2@db:5432/hty"),
            "postgres://hty:REDACTED@db:5432/hty"
        );
        assert_eq!(
            redact_dsn("postgres://db:5432/hty"),
            "postgres://db:5432/hty"
        );
        assert_eq!(redact_dsn("not a dsn"), "invalid-dsn");
    }

    #[test]
    fn commit_is_shortened() {
        assert_eq!(short_commit("0123456789abcdef"), "0123456");
        assert_eq!(short_commit("abc"), "abc");
    }
}
