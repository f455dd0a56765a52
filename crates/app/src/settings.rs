//! Application settings.
//!
//! Read, in order of precedence, from `BANKSTORE__*` environment variables,
//! an optional `settings.toml` next to the binary, and built-in defaults:
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! kind = "sqlite"
//! path = "bankstore.db"
//!
//! [transfer]
//! max_retries = 3
//! retry_backoff_ms = 25
//! ```

use std::time::Duration;

use config::{
    Config, ConfigError, Environment, File, FileFormat, builder::ConfigBuilder,
    builder::DefaultState,
};
use engine::RetryPolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level for the workspace crates.
    pub level: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite { path: String },
}

#[derive(Debug, Deserialize)]
pub struct Transfer {
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Transfer {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub transfer: Transfer,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("BANKSTORE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Settings from a TOML document layered over the defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app.level", "info")?
        .set_default("database.kind", "memory")?
        .set_default("transfer.max_retries", 3_i64)?
        .set_default("transfer.retry_backoff_ms", 25_i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = Settings::from_toml("").unwrap();

        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.database, Database::Memory);
        assert_eq!(settings.transfer.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn sqlite_database_and_retry_overrides() {
        let settings = Settings::from_toml(
            r#"
            [app]
            level = "debug"

            [database]
            kind = "sqlite"
            path = "/tmp/bank.db"

            [transfer]
            max_retries = 0
            retry_backoff_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(settings.app.level, "debug");
        assert_eq!(
            settings.database,
            Database::Sqlite {
                path: "/tmp/bank.db".to_string()
            }
        );
        assert_eq!(settings.transfer.retry_policy(), RetryPolicy::NONE);
    }

    #[test]
    fn sqlite_without_path_is_rejected() {
        let result = Settings::from_toml(
            r#"
            [database]
            kind = "sqlite"
            "#,
        );

        assert!(result.is_err());
    }
}
