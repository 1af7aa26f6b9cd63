//! Diagnostic logging to stderr.

use std::io;

use tracing::subscriber;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "SIFT_LOG";

/// Builds the log filter: `SIFT_LOG` when set and valid, otherwise from the `-v` count.
fn filter_for(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Filter directive for a verbosity count.
fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber.
///
/// Logs go to stderr so stdout carries only command output. A subscriber that is already
/// installed is kept.
pub fn init_logging(verbose: u8) {
    let collector = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .finish();

    // The first subscriber wins.
    drop(subscriber::set_global_default(collector));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "debug");
        assert_eq!(default_directive(5), "trace");
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(0);
        init_logging(2);
    }
}
