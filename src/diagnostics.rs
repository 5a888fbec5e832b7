//! Diagnostics: tracing setup plus the small message helpers used when
//! building errors and warnings.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global stderr subscriber.
///
/// Quiet mode lowers the default level to `warn`, which drops progress
/// narration. `RUST_LOG` still wins when set.
pub fn init(quiet: bool) {
    let default_level = if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Single-line error text suitable for `anyhow` context and notifications.
pub fn error_message(msg: impl Into<String>) -> String {
    let msg = msg.into();
    let one_line = msg.split_whitespace().collect::<Vec<_>>().join(" ");
    one_line.trim_end_matches('.').to_string()
}

pub fn warn(msg: impl AsRef<str>) {
    tracing::warn!("{}", msg.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_message_collapses_whitespace_and_trailing_period() {
        assert_eq!(
            error_message("  log file\n not found:  x.log. "),
            "log file not found: x.log"
        );
    }
}
