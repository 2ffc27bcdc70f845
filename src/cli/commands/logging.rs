//! Log level selection: repeated `-v` flags or `HTY_LOG_LEVEL`.

use clap::{builder::ValueParser, Arg, ArgAction, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Levels in verbosity order; the index is the number of `-v` flags.
pub const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

/// Accepts a level name in any case or its position in [`LEVELS`].
fn parse_verbosity(value: &str) -> Result<u8, String> {
    let index = match value.parse::<usize>() {
        Ok(index) => Some(index).filter(|index| *index < LEVELS.len()),
        Err(_) => value
            .parse::<Level>()
            .ok()
            .and_then(|level| LEVELS.iter().position(|known| *known == level)),
    };

    index
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| {
            format!("unknown log level `{value}`, expected error, warn, info, debug, trace or 0-4")
        })
}

/// The level for a verbosity count, saturating at `TRACE`.
#[must_use]
pub fn level(verbosity: u8) -> Level {
    LEVELS[usize::from(verbosity).min(LEVELS.len() - 1)]
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Raise log detail one step per flag, starting from errors only")
            .long_help(
                "Raise log detail one step per flag: -v warn, -vv info, -vvv debug, -vvvv trace. \
                 HTY_LOG_LEVEL takes a level name or its step number instead.",
            )
            .env("HTY_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(ValueParser::new(parse_verbosity)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_steps() {
        assert_eq!(parse_verbosity("error"), Ok(0));
        assert_eq!(parse_verbosity("INFO"), Ok(2));
        assert_eq!(parse_verbosity("Trace"), Ok(4));
        assert_eq!(parse_verbosity("3"), Ok(3));
        assert!(parse_verbosity("5").is_err());
        assert!(parse_verbosity("loud").is_err());
    }

    #[test]
    fn level_saturates() {
        assert_eq!(level(0), Level::ERROR);
        assert_eq!(level(2), Level::INFO);
        assert_eq!(level(9), Level::TRACE);
    }
}
