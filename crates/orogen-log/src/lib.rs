//! Structured logging for the orogen terrain tool.
//!
//! Provides structured, filterable logging via the `tracing` ecosystem:
//! console output with timestamps and module paths, plus optional JSON file
//! logging for post-mortem analysis of long generation runs. Integrates
//! with the configuration system for runtime log level control.

use orogen_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Sets up:
/// - Console output with timestamps, module paths, and severity levels
/// - Optional JSON file logging when the config names a log file
/// - Environment-based filtering (respects RUST_LOG, then the config's
///   `debug.log_level`)
///
/// # Examples
///
/// ```no_run
/// use orogen_config::Config;
/// use orogen_log::init_logging;
///
/// // Basic initialization
/// init_logging(None);
///
/// // With config-driven level and file output
/// let config = Config::default();
/// init_logging(Some(&config));
/// ```
pub fn init_logging(config: Option<&Config>) {
    let filter_str = match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => "info".to_string(),
    };

    // RUST_LOG wins over the config value when set.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_path) = config.and_then(|c| c.debug.log_file.as_deref()) {
        let parent_ok = log_path
            .parent()
            .is_none_or(|dir| dir.as_os_str().is_empty() || std::fs::create_dir_all(dir).is_ok());
        if parent_ok && let Ok(log_file) = std::fs::File::create(log_path) {
            let file_layer = fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime())
                .json();

            subscriber.with(file_layer).init();
            return;
        }
    }

    subscriber.init();
}

/// Create an `EnvFilter` with the default filter string.
///
/// `info` for all targets; useful for tests and for consistent default
/// behavior without a config.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        assert!(format!("{filter}").contains("info"));
    }

    #[test]
    fn test_crate_level_filter_parses() {
        let filter = EnvFilter::new("info,orogen_pipeline=debug");
        let filter_str = format!("{filter}");
        assert!(filter_str.contains("orogen_pipeline=debug"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,orogen_export=trace",
            "warn,orogen_pipeline=debug,orogen_shapes=trace",
            "error",
        ];
        for filter_str in &valid_filters {
            let result = EnvFilter::try_from(*filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {filter_str}");
        }
    }

    #[test]
    fn test_log_file_path_from_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.debug.log_file = Some(temp_dir.path().join("orogen.log"));
        let path = config.debug.log_file.as_ref().unwrap();
        assert_eq!(path.file_name().unwrap(), "orogen.log");
    }
}
