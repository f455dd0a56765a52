//! The module contains the error the engine can throw.
//!
//! The errors fall in three groups:
//!
//! - input errors ([`InvalidInput`]) rejected before any transaction is opened;
//! - business errors ([`AccountNotFound`], [`InsufficientFunds`],
//!   [`CurrencyMismatch`], [`KeyNotFound`], [`ExistingKey`], [`Restricted`])
//!   detected inside a transaction, which is rolled back;
//! - storage failures ([`Conflict`], [`BalanceInvariant`], [`Database`]) where
//!   the store refused the work and the transaction is rolled back.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`AccountNotFound`]: EngineError::AccountNotFound
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`CurrencyMismatch`]: EngineError::CurrencyMismatch
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Restricted`]: EngineError::Restricted
//!  [`Conflict`]: EngineError::Conflict
//!  [`BalanceInvariant`]: EngineError::BalanceInvariant
//!  [`Database`]: EngineError::Database
use sea_orm::{DbErr, RuntimeErr};
use thiserror::Error;

use crate::AccountId;

/// SQLite primary result codes signalling lock contention.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_CONSTRAINT: i32 = 19;
const FOREIGN_KEY_FAILED: &str = "FOREIGN KEY constraint failed";

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Account {0} not found!")]
    AccountNotFound(AccountId),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Restricted: {0}")]
    Restricted(String),
    #[error("Concurrent modification: {0}")]
    Conflict(String),
    #[error("Balance invariant violated: {0}")]
    BalanceInvariant(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// `true` when the store refused or could not complete the work.
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::Conflict(_) | Self::BalanceInvariant(_) | Self::Database(_)
        )
    }

    /// `true` when running the same unit of work again may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Conflict(_) => true,
            Self::Database(err) => is_contention(err),
            _ => false,
        }
    }
}

/// Lock contention reported by SQLite (`BUSY`/`LOCKED` and their extended codes).
pub(crate) fn is_contention(err: &DbErr) -> bool {
    sqlite_failure(err).is_some_and(|(code, _)| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
}

/// A write or delete refused by a foreign key.
///
/// SQLite reports `ON DELETE RESTRICT` as `SQLITE_CONSTRAINT_TRIGGER` (1811)
/// rather than `SQLITE_CONSTRAINT_FOREIGNKEY` (787), so only the primary code
/// and the message identify it.
pub(crate) fn is_foreign_key_violation(err: &DbErr) -> bool {
    sqlite_failure(err).is_some_and(|(code, message)| {
        code & 0xff == SQLITE_CONSTRAINT && message.contains(FOREIGN_KEY_FAILED)
    })
}

fn sqlite_failure(err: &DbErr) -> Option<(i32, String)> {
    let runtime = match err {
        DbErr::Conn(runtime) | DbErr::Exec(runtime) | DbErr::Query(runtime) => runtime,
        _ => return None,
    };
    let RuntimeErr::SqlxError(sqlx_err) = runtime else {
        return None;
    };
    let db_err = sqlx_err.as_database_error()?;
    let code = db_err.code()?.parse::<i32>().ok()?;
    Some((code, db_err.message().to_string()))
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::AccountNotFound(a), Self::AccountNotFound(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Restricted(a), Self::Restricted(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::BalanceInvariant(a), Self::BalanceInvariant(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
