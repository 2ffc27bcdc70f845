use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

use crate::api::handlers::payments::PaymentGateway;

pub const ARG_RAZORPAY_KEY_ID: &str = "razorpay-key-id";
pub const ARG_RAZORPAY_KEY_SECRET: &str = "razorpay-key-secret";

#[derive(Debug)]
pub struct Options {
    pub key_id: Option<String>,
    pub key_secret: Option<SecretString>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let read = |id: &str| {
            matches
                .get_one::<String>(id)
                .filter(|value| !value.trim().is_empty())
                .cloned()
        };

        Self {
            key_id: read(ARG_RAZORPAY_KEY_ID),
            key_secret: read(ARG_RAZORPAY_KEY_SECRET).map(SecretString::from),
        }
    }

    #[must_use]
    pub fn into_gateway(self) -> PaymentGateway {
        PaymentGateway::new(self.key_id, self.key_secret)
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_RAZORPAY_KEY_ID)
                .long(ARG_RAZORPAY_KEY_ID)
                .help("Payment gateway key id; payment routes answer 503 without it")
                .env("HTY_RAZORPAY_KEY_ID")
                .requires(ARG_RAZORPAY_KEY_SECRET),
        )
        .arg(
            Arg::new(ARG_RAZORPAY_KEY_SECRET)
                .long(ARG_RAZORPAY_KEY_SECRET)
                .help("Payment gateway key secret used to verify signatures")
                .env("HTY_RAZORPAY_KEY_SECRET")
                .hide_env_values(true)
                .requires(ARG_RAZORPAY_KEY_ID),
        )
}
