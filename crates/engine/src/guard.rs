//! Balance invariant: an account balance is never null or negative.
//!
//! The rule is enforced twice. The engine checks it before every debit
//! ([`ensure_sufficient`]) and the `account` table carries triggers that abort
//! any insert or update leaving `account_balance` null or below zero. The
//! triggers catch writes that bypass the engine; the engine must never trip
//! them, so a trigger firing on an engine write is reported as
//! [`EngineError::BalanceInvariant`] and logged as a bug.

use sea_orm::DbErr;

use crate::{Account, EngineError, Money, ResultEngine};

/// Message raised by the storage triggers. Must match the migration.
pub const BALANCE_INVARIANT_MESSAGE: &str = "account balance cannot be null or negative";

/// `balance >= amount`.
#[must_use]
pub fn is_sufficient(balance: Money, amount: Money) -> bool {
    balance >= amount
}

/// Rejects a debit of `amount` from `account` that would leave it negative.
pub fn ensure_sufficient(account: &Account, amount: Money) -> ResultEngine<()> {
    if is_sufficient(account.balance, amount) {
        return Ok(());
    }
    Err(EngineError::InsufficientFunds(format!(
        "account {} holds {} {}, requested {}",
        account.id, account.balance, account.currency, amount
    )))
}

/// Rejects an opening balance below zero.
pub fn ensure_non_negative(balance: Money) -> ResultEngine<()> {
    if balance.is_negative() {
        return Err(EngineError::InvalidInput(format!(
            "balance must be >= 0, got {balance}"
        )));
    }
    Ok(())
}

/// `true` when `err` was raised by the storage-side balance triggers.
#[must_use]
pub fn is_balance_invariant(err: &DbErr) -> bool {
    err.to_string().contains(BALANCE_INVARIANT_MESSAGE)
}
