//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// chunked::core::logging::init();
/// log::info!("Export started");
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}

/// Initialize logging with millisecond timestamps, for command-line tools
pub fn init_with_timestamps() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .init();
}

/// Pluralisation suffix for summary lines
pub fn plural(count: usize) -> &'static str {
    if count != 1 { "s" } else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_with_timestamps() {
        init_with_timestamps();
        log::info!("logger ready");
        assert!(log::max_level() >= log::LevelFilter::Error);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(0), "s");
        assert_eq!(plural(1), "");
        assert_eq!(plural(2), "s");
    }
}
