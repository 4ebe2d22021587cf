//! Tracing setup shared by Pigmento binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a given verbosity.
pub fn default_directive(level: &str) -> String {
    format!("pigmento_core={level},pigmento_cli={level},warn")
}

/// Build the filter: `RUST_LOG` wins over `level` when set.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
}

/// Install a global fmt subscriber writing to stderr.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("debug"), "pigmento_core=debug,pigmento_cli=debug,warn");
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging("info");
        init_logging("debug");
    }
}
