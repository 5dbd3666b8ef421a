use serde::Serialize;

use staybook_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Serialize)]
struct EffectiveConfig {
    database: DatabaseView,
    logging: LoggingView,
}

#[derive(Debug, Serialize)]
struct DatabaseView {
    url: String,
    max_connections: u32,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct LoggingView {
    level: String,
    format: &'static str,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("configuration issue: {error}"),
    };

    let view = EffectiveConfig {
        database: DatabaseView {
            url: config.database.url,
            max_connections: config.database.max_connections,
            timeout_secs: config.database.timeout_secs,
        },
        logging: LoggingView {
            level: config.logging.level,
            format: match config.logging.format {
                LogFormat::Compact => "compact",
                LogFormat::Pretty => "pretty",
                LogFormat::Json => "json",
            },
        },
    };

    toml::to_string(&view)
        .unwrap_or_else(|error| format!("failed to render configuration: {error}"))
}
