//! Tracing setup for the binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::LoggingSettings;

/// Filter used when neither `RUST_LOG` nor the settings give one
pub fn default_filter(level: &str) -> String {
    format!("folio={},tower_http={}", level, level)
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. `format = "json"` selects JSON
/// lines; anything else is the human-readable format.
pub fn init_tracing(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&settings.level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if settings.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter("debug"), "folio=debug,tower_http=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let settings = LoggingSettings::default();
        init_tracing(&settings);
        init_tracing(&settings);
    }
}
