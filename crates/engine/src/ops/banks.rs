use crate::{Bank, BankId, EngineError, NewBank, ResultEngine, banks, gateway::Gateway};

use super::Engine;

impl Engine {
    pub async fn create_bank(&self, new: NewBank) -> ResultEngine<Bank> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move { Gateway::<Bank, _>::on(db_tx).create(&new).await })
        })
        .await
    }

    /// Registers a bank unless one with the same IBAN already exists.
    pub async fn register_bank(
        &self,
        name: &str,
        main_office: &str,
        iban: &str,
    ) -> ResultEngine<Bank> {
        let new = NewBank::new(name, main_office, iban);
        let bank = self
            .with_tx(|_, db_tx| {
                Box::pin(async move {
                    if banks::find_by_iban(db_tx, &new.iban).await?.is_some() {
                        return Err(EngineError::ExistingKey(format!(
                            "a bank with IBAN {} already exists",
                            new.iban
                        )));
                    }
                    Gateway::<Bank, _>::on(db_tx).create(&new).await
                })
            })
            .await?;
        tracing::info!("bank {} registered with IBAN {}", bank.id, bank.iban);
        Ok(bank)
    }

    pub async fn bank(&self, id: BankId) -> ResultEngine<Option<Bank>> {
        Gateway::<Bank, _>::on(&self.database).find(id).await
    }

    pub async fn bank_by_iban(&self, iban: &str) -> ResultEngine<Option<Bank>> {
        banks::find_by_iban(&self.database, iban).await
    }

    pub async fn banks(&self) -> ResultEngine<Vec<Bank>> {
        Gateway::<Bank, _>::on(&self.database).list().await
    }

    pub async fn update_bank(&self, bank: &Bank) -> ResultEngine<()> {
        let bank = bank.clone();
        self.with_tx(|_, db_tx| {
            Box::pin(async move { Gateway::<Bank, _>::on(db_tx).update(&bank).await })
        })
        .await
    }

    /// Deletes a bank. Fails with [`EngineError::Restricted`] while accounts
    /// still reference its IBAN.
    pub async fn delete_bank(&self, id: BankId) -> ResultEngine<()> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move { Gateway::<Bank, _>::on(db_tx).delete(id).await })
        })
        .await
    }

    /// Deletes the bank with `iban`; returns whether a bank was found.
    pub async fn delete_bank_by_iban(&self, iban: &str) -> ResultEngine<bool> {
        let iban = iban.to_string();
        self.with_tx(|_, db_tx| {
            Box::pin(async move {
                let Some(bank) = banks::find_by_iban(db_tx, &iban).await? else {
                    return Ok(false);
                };
                Gateway::<Bank, _>::on(db_tx).delete(bank.id).await?;
                Ok(true)
            })
        })
        .await
    }
}
