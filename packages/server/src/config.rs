use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued bearer tokens.
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BuildsConfig {
    /// Record every build mutation in the `build_event` table.
    pub audit_events: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Insert a small demo catalog on startup when the catalog is empty.
    pub demo_catalog: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub builds: BuildsConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", vec!["http://localhost:5173"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.max_connections", 20)?
            .set_default("auth.token_ttl_hours", 24 * 7)?
            .set_default("builds.audit_events", false)?
            .set_default("seed.demo_catalog", false)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., RIGSHARE__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("RIGSHARE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
