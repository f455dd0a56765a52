use sea_orm::{PaginatorTrait, QueryFilter, prelude::*};

use crate::{
    Account, AccountId, EngineError, NewAccount, ResultEngine, gateway::Gateway, guard, holders,
    payment_cards,
};

use super::Engine;

impl Engine {
    /// Opens an account with its starting balance.
    ///
    /// The balance must already be `>= 0`; the storage trigger rejects
    /// anything else with [`EngineError::BalanceInvariant`].
    pub async fn open_account(&self, new: NewAccount) -> ResultEngine<Account> {
        guard::ensure_non_negative(new.balance)?;
        let account = self
            .with_tx(|_, db_tx| {
                Box::pin(async move { Gateway::<Account, _>::on(db_tx).create(&new).await })
            })
            .await?;
        tracing::info!("account {} opened with {}", account.id, account.balance);
        Ok(account)
    }

    pub async fn account(&self, id: AccountId) -> ResultEngine<Option<Account>> {
        Gateway::<Account, _>::on(&self.database).find(id).await
    }

    /// Every account ordered by id.
    pub async fn accounts(&self) -> ResultEngine<Vec<Account>> {
        Gateway::<Account, _>::on(&self.database).list().await
    }

    /// Writes back an edited account.
    ///
    /// The write is guarded by the account version: if someone else updated
    /// the row since `account` was read the call fails with
    /// [`EngineError::Conflict`] and nothing is written.
    pub async fn update_account(&self, account: &Account) -> ResultEngine<()> {
        guard::ensure_non_negative(account.balance)?;
        let account = account.clone();
        self.with_tx(|_, db_tx| {
            Box::pin(async move { Gateway::<Account, _>::on(db_tx).update(&account).await })
        })
        .await
    }

    /// Deletes an account that has no card and no holders.
    pub async fn delete_account(&self, id: AccountId) -> ResultEngine<()> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move {
                if payment_cards::find_by_account(db_tx, id).await?.is_some() {
                    return Err(EngineError::Restricted(format!(
                        "account {id} still has a payment card"
                    )));
                }
                let holders = holders::Entity::find()
                    .filter(holders::Column::AccountId.eq(id.get()))
                    .count(db_tx)
                    .await?;
                if holders > 0 {
                    return Err(EngineError::Restricted(format!(
                        "account {id} still has {holders} holder(s)"
                    )));
                }
                Gateway::<Account, _>::on(db_tx).delete(id).await
            })
        })
        .await
    }
}
