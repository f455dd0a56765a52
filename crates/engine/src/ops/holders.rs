use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Account, AccountId, EngineError, Person, PersonId, ResultEngine,
    gateway::{Gateway, Record, storage_error},
    holders, persons,
};

use super::Engine;

impl Engine {
    /// Makes `person` a holder of `account`.
    pub async fn add_holder(&self, account: AccountId, person: PersonId) -> ResultEngine<()> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move {
                if Gateway::<Account, _>::on(db_tx).find(account).await?.is_none() {
                    return Err(EngineError::AccountNotFound(account));
                }
                if Gateway::<Person, _>::on(db_tx).find(person).await?.is_none() {
                    return Err(EngineError::KeyNotFound(format!("person {person}")));
                }
                holders::ActiveModel {
                    person_id: ActiveValue::Set(person.get()),
                    account_id: ActiveValue::Set(account.get()),
                }
                .insert(db_tx)
                .await
                .map_err(storage_error)?;
                Ok(())
            })
        })
        .await
    }

    /// Removes the link; returns whether it existed.
    pub async fn remove_holder(&self, account: AccountId, person: PersonId) -> ResultEngine<bool> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move {
                let result = holders::Entity::delete_many()
                    .filter(holders::Column::AccountId.eq(account.get()))
                    .filter(holders::Column::PersonId.eq(person.get()))
                    .exec(db_tx)
                    .await?;
                Ok(result.rows_affected > 0)
            })
        })
        .await
    }

    /// The people holding `account`, ordered by id.
    pub async fn holders(&self, account: AccountId) -> ResultEngine<Vec<Person>> {
        holders::Entity::find()
            .filter(holders::Column::AccountId.eq(account.get()))
            .order_by_asc(holders::Column::PersonId)
            .find_also_related(persons::Entity)
            .all(&self.database)
            .await?
            .into_iter()
            .filter_map(|(_, person)| person)
            .map(Person::from_model)
            .collect()
    }
}
