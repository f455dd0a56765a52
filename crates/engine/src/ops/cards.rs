use crate::{
    Account, AccountId, EngineError, NewPaymentCard, PaymentCard, PaymentCardId, ResultEngine,
    gateway::Gateway, payment_cards,
};

use super::Engine;

impl Engine {
    /// Issues a card for an existing account. An account has at most one
    /// card; a second one fails with [`EngineError::ExistingKey`].
    pub async fn issue_card(&self, new: NewPaymentCard) -> ResultEngine<PaymentCard> {
        let card = self
            .with_tx(|_, db_tx| {
                Box::pin(async move {
                    let account = new.account_id;
                    if Gateway::<Account, _>::on(db_tx).find(account).await?.is_none() {
                        return Err(EngineError::AccountNotFound(account));
                    }
                    Gateway::<PaymentCard, _>::on(db_tx).create(&new).await
                })
            })
            .await?;
        tracing::info!("payment card {} issued for account {}", card.id, card.account_id);
        Ok(card)
    }

    pub async fn card(&self, id: PaymentCardId) -> ResultEngine<Option<PaymentCard>> {
        Gateway::<PaymentCard, _>::on(&self.database).find(id).await
    }

    pub async fn card_of(&self, account: AccountId) -> ResultEngine<Option<PaymentCard>> {
        payment_cards::find_by_account(&self.database, account).await
    }

    pub async fn update_card(&self, card: &PaymentCard) -> ResultEngine<()> {
        let card = card.clone();
        self.with_tx(|_, db_tx| {
            Box::pin(async move { Gateway::<PaymentCard, _>::on(db_tx).update(&card).await })
        })
        .await
    }

    pub async fn delete_card(&self, id: PaymentCardId) -> ResultEngine<()> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move { Gateway::<PaymentCard, _>::on(db_tx).delete(id).await })
        })
        .await
    }
}
