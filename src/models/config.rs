use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Configuration options specific to the catalog service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    pub port: u16,
    /// SQLite database file path.
    pub database_url: String,
    /// Root directory of the public file storage; images live in `products/`.
    pub storage_root: PathBuf,
    /// Include exception diagnostics in 500 responses instead of logging only.
    #[serde(default)]
    pub expose_error_details: bool,
    /// Upper bound for a whole multipart request body.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load `config/default.yaml`, then `config/{APP_ENV}.yaml` if present,
    /// then `APP__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("database_url", "app.db")?
            .set_default("storage_root", "storage/app/public")?
            .set_default("expose_error_details", false)?
            .set_default("max_upload_bytes", 10 * 1024 * 1024)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.address.clone(), self.port)
    }
}
