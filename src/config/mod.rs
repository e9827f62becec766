// Configuration module entry point
// Loads layered configuration (defaults, file, environment) and exposes runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, UploadConfig};

/// Legacy variable naming the upload directory
const UPLOAD_FOLDER_VAR: &str = "UPLOAD_FOLDER";
/// Legacy variable naming the request size limit
const MAX_CONTENT_LENGTH_VAR: &str = "MAX_CONTENT_LENGTH";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_env(config_path, None)
    }

    /// Same as [`Config::load_from`], reading variables from `env` instead of
    /// the process environment when given
    pub fn load_with_env(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let legacy = |name: &str| {
            let value = match &env {
                Some(vars) => vars.get(name).cloned(),
                None => std::env::var(name).ok(),
            };
            // An empty variable counts as unset
            value.filter(|v| !v.is_empty())
        };
        let upload_folder = legacy(UPLOAD_FOLDER_VAR);
        let max_content_length = legacy(MAX_CONTENT_LENGTH_VAR);

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WORDCOUNT")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .source(env),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.app_name", "wordcount")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "wordcount/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("upload.folder", "./uploaded")?
            .set_default("upload.max_content_length", 16_000_000)? // 16MB
            .set_default("upload.allowed_extensions", vec![".txt", "csv", "rst", "rtf"])?
            .set_override_option("upload.folder", upload_folder)?
            .set_override_option("upload.max_content_length", max_content_length)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Create the upload directory if it does not exist yet
    pub fn ensure_upload_folder(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.upload.folder)
    }
}
