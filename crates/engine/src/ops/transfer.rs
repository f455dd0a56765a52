use sea_orm::DatabaseTransaction;

use crate::{
    Account, AccountId, EngineError, Money, ResultEngine,
    gateway::Gateway,
    util::{ensure_positive, ensure_same_currency},
};

use super::Engine;

impl Engine {
    /// Moves `amount` from one account to another.
    ///
    /// Both balances change in one transaction or not at all:
    /// - `InvalidInput` for a non-positive amount or `from == to`, before any
    ///   transaction is opened;
    /// - `AccountNotFound` when either account is missing;
    /// - `CurrencyMismatch` when the accounts hold different currencies;
    /// - `InsufficientFunds` when `from` holds less than `amount`;
    /// - a storage failure when the store rejects a write or the commit.
    ///
    /// Lock contention and lost optimistic-lock races are retried according
    /// to the engine's [`RetryPolicy`](super::RetryPolicy); every retry
    /// re-reads both balances, so a loser of a race that can no longer be
    /// covered ends with `InsufficientFunds`.
    pub async fn transfer(&self, amount: Money, from: AccountId, to: AccountId) -> ResultEngine<()> {
        ensure_positive(amount)?;
        if from == to {
            return Err(EngineError::InvalidInput(format!(
                "cannot transfer from account {from} to itself"
            )));
        }

        let mut attempt = 0;
        loop {
            let result = self
                .with_tx(|engine, db_tx| Box::pin(engine.transfer_in(db_tx, amount, from, to)))
                .await;
            match result {
                Ok(()) => {
                    tracing::info!("transfer of {amount} from {from} to {to} committed");
                    return Ok(());
                }
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    tracing::warn!("transfer {from} -> {to} contended ({err}), retry {attempt}");
                    tokio::time::sleep(self.retry.backoff * attempt).await;
                }
                Err(err) => {
                    if err.is_storage_failure() {
                        tracing::error!("transfer {from} -> {to} rolled back: {err}");
                    } else {
                        tracing::info!("transfer {from} -> {to} rejected: {err}");
                    }
                    return Err(err);
                }
            }
        }
    }

    /// One transfer attempt against an open transaction.
    async fn transfer_in(
        &self,
        db_tx: &DatabaseTransaction,
        amount: Money,
        from: AccountId,
        to: AccountId,
    ) -> ResultEngine<()> {
        let accounts = Gateway::<Account, _>::on(db_tx);

        let mut source = accounts
            .find(from)
            .await?
            .ok_or(EngineError::AccountNotFound(from))?;
        let mut target = accounts
            .find(to)
            .await?
            .ok_or(EngineError::AccountNotFound(to))?;
        ensure_same_currency(source.currency, target.currency)?;

        source.debit(amount)?;
        accounts.update(&source).await.inspect_err(report_breach)?;

        target.credit(amount)?;
        accounts.update(&target).await.inspect_err(report_breach)?;

        tracing::debug!(
            "balances written: {from} = {}, {to} = {}",
            source.balance, target.balance
        );
        Ok(())
    }
}

/// The guard runs before every write, so the storage trigger firing here
/// means the engine computed a negative balance.
fn report_breach(err: &EngineError) {
    if let EngineError::BalanceInvariant(detail) = err {
        tracing::error!("storage rejected a transfer write: {detail}");
    }
}
