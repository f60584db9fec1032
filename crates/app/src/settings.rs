//! Handles settings for the application.
//!
//! Configuration is read from an optional `settings.toml` in the working
//! directory and then from `GOALS__*` environment variables, e.g.
//! `GOALS__SERVER__PORT=8001` or `GOALS__SERVER__DATABASE__SQLITE=goals.db`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
    pub require_auth: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 8001)?
            .set_default("server.require_auth", false)?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("GOALS").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
