use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Verbose diagnostics (debug log level, per-request tracing)
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allow cross-origin requests from browser frontends
    #[serde(default = "default_cors")]
    pub cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: default_cors(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Serialized random forest (required at startup)
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
    /// Serialized label encoder (optional)
    #[serde(default = "default_label_encoder_path")]
    pub label_encoder_path: Option<PathBuf>,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/crop_model.json")
}

fn default_label_encoder_path() -> Option<PathBuf> {
    Some(PathBuf::from("models/label_encoder.json"))
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            label_encoder_path: default_label_encoder_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            logging: LoggingConfig::default(),
            debug: false,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Truthy spellings accepted for boolean environment flags.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AppConfig {
    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("server.cors", default_cors())?
            .set_default("model.path", "models/crop_model.json")?
            .set_default("model.label_encoder_path", "models/label_encoder.json")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("debug", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("CROP_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (CROP__SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("CROP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            // Plain deployment variables win over everything else
            .set_override_option("model.path", std::env::var("MODEL_PATH").ok())?
            .set_override_option(
                "model.label_encoder_path",
                std::env::var("LABEL_ENCODER_PATH").ok(),
            )?
            .set_override_option(
                "server.port",
                std::env::var("PORT")
                    .ok()
                    .map(|p| p.trim().to_string()),
            )?
            .set_override_option(
                "debug",
                std::env::var("DEBUG").ok().map(|v| parse_flag(&v)),
            )?;

        builder.build()?.try_deserialize()
    }

    /// Effective log filter directive
    pub fn log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.logging.level
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }

        if self.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }

        if self.model.path.as_os_str().is_empty() {
            errors.push("model.path must not be empty".to_string());
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
