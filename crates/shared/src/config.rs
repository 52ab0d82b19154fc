//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Document store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Tax policy defaults used when a profile carries no values.
    #[serde(default)]
    pub tax: TaxDefaults,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Which document store implementation backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store, lost on restart.
    #[default]
    Memory,
    /// JSON documents in a SQL database through SeaORM.
    Database,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database connection URL, required for the `database` backend.
    pub url: Option<String>,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret shared with the auth service that issues tokens.
    pub secret: String,
}

/// Tax policy defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxDefaults {
    /// Rental income exempt from taxation.
    #[serde(default = "default_rent_exemption")]
    pub rent_exemption: Decimal,
    /// Flat income tax rate.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
    /// Year assigned to records created before years were tracked.
    #[serde(default = "default_legacy_year")]
    pub legacy_year: i32,
}

impl Default for TaxDefaults {
    fn default() -> Self {
        Self {
            rent_exemption: default_rent_exemption(),
            tax_rate: default_tax_rate(),
            legacy_year: default_legacy_year(),
        }
    }
}

fn default_rent_exemption() -> Decimal {
    Decimal::from(500)
}

fn default_tax_rate() -> Decimal {
    Decimal::new(19, 2)
}

fn default_legacy_year() -> i32 {
    2025
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TAXBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
