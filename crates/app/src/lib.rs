//! Wires settings, logging and storage into a ready [`Engine`].
//!
//! ```no_run
//! # async fn run() -> Result<(), bankstore::BootstrapError> {
//! let settings = bankstore::Settings::new()?;
//! bankstore::init_tracing(&settings.app.level)?;
//! let engine = bankstore::bootstrap(&settings).await?;
//! # let _ = engine;
//! # Ok(())
//! # }
//! ```

use config::ConfigError;
use engine::{Engine, EngineError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};

pub use settings::{Database, Settings};

pub mod settings;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("invalid settings: {0}")]
    Settings(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("failed to install the log subscriber: {0}")]
    Tracing(String),
}

/// Installs the global `tracing` subscriber at `level` for the workspace
/// crates. Fails if a subscriber is already installed.
pub fn init_tracing(level: &str) -> Result<(), BootstrapError> {
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bankstore={level},engine={level},migration={level}"
        ))
        .try_init()
        .map_err(|err| BootstrapError::Tracing(err.to_string()))
}

/// Opens the configured database and brings its schema up to date.
pub async fn connect(config: &Database) -> Result<DatabaseConnection, BootstrapError> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite { path } => format!("sqlite:{path}?mode=rwc"),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}

/// Builds an [`Engine`] from `settings`.
pub async fn bootstrap(settings: &Settings) -> Result<Engine, BootstrapError> {
    let database = connect(&settings.database).await?;
    let engine = Engine::builder()
        .database(database)
        .retry_policy(settings.transfer.retry_policy())
        .build()
        .await?;
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use engine::{Currency, Money, NewAccount};

    use super::*;

    #[tokio::test]
    async fn bootstrapped_engine_moves_money() {
        let settings = Settings::from_toml("").unwrap();
        let engine = bootstrap(&settings).await.unwrap();

        let from = engine
            .open_account(NewAccount::new(
                "CZ-0001",
                Money::new(500),
                "checking",
                Currency::CZK,
            ))
            .await
            .unwrap();
        let to = engine
            .open_account(NewAccount::new(
                "CZ-0002",
                Money::new(100),
                "checking",
                Currency::CZK,
            ))
            .await
            .unwrap();

        engine
            .transfer(Money::new(200), from.id, to.id)
            .await
            .unwrap();

        let from = engine.account(from.id).await.unwrap().unwrap();
        let to = engine.account(to.id).await.unwrap().unwrap();
        assert_eq!(from.balance, Money::new(300));
        assert_eq!(to.balance, Money::new(300));
    }

    #[tokio::test]
    async fn retry_policy_comes_from_settings() {
        let settings = Settings::from_toml(
            r#"
            [transfer]
            max_retries = 7
            retry_backoff_ms = 1
            "#,
        )
        .unwrap();
        let engine = bootstrap(&settings).await.unwrap();

        assert_eq!(engine.retry_policy().max_retries, 7);
    }
}
