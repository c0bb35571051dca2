//! tracing-subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

fn filter_for(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.log_level();
        EnvFilter::new(format!("{level},crop_advisor={level},tower_http={level}"))
    })
}

/// Logging for the long-running service.
pub fn init_logging(config: &AppConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(config))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let result = if config.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("logging already initialized: {e}");
    }
}

/// Minimal logging for one-shot commands; stdout stays reserved for output.
pub fn init_logging_simple() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("logging already initialized: {e}");
    }
}
