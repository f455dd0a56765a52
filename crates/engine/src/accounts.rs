//! The module contains `Account` and its table.

use sea_orm::{ActiveValue, Condition, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    AccountId, Currency, EngineError, Money, ResultEngine, gateway::Record, guard,
    util::{ensure_positive, model_currency},
};

/// A bank account.
///
/// The balance is only moved through [`Account::debit`] and
/// [`Account::credit`], which keep it non-negative. `version` is bumped by the
/// store on every update and lets concurrent writers detect each other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique account number (10 characters in the legacy schema).
    pub number: String,
    pub balance: Money,
    /// Free-text category such as `checking` or `savings`.
    pub kind: String,
    pub currency: Currency,
    /// IBAN of the bank holding the account.
    pub iban: Option<String>,
    pub version: i64,
}

/// An account not yet stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub number: String,
    pub balance: Money,
    pub kind: String,
    pub currency: Currency,
    pub iban: Option<String>,
}

impl NewAccount {
    pub fn new(
        number: impl Into<String>,
        balance: Money,
        kind: impl Into<String>,
        currency: Currency,
    ) -> Self {
        Self {
            number: number.into(),
            balance,
            kind: kind.into(),
            currency,
            iban: None,
        }
    }

    /// Attach the account to the bank identified by `iban`.
    pub fn with_iban(mut self, iban: impl Into<String>) -> Self {
        self.iban = Some(iban.into());
        self
    }
}

impl Account {
    /// Remove `amount` from the balance, refusing to go below zero.
    pub fn debit(&mut self, amount: Money) -> ResultEngine<()> {
        ensure_positive(amount)?;
        guard::ensure_sufficient(self, amount)?;
        self.balance = self.balance.checked_sub(amount).ok_or_else(|| {
            EngineError::InvalidInput(format!("balance underflow on account {}", self.id))
        })?;
        Ok(())
    }

    /// Add `amount` to the balance.
    pub fn credit(&mut self, amount: Money) -> ResultEngine<()> {
        ensure_positive(amount)?;
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            EngineError::InvalidInput(format!("balance overflow on account {}", self.id))
        })?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "id_account")]
    pub id: i32,
    #[sea_orm(unique)]
    pub account_number: String,
    pub account_balance: i64,
    pub account_type: String,
    pub currency_type: String,
    pub iban: Option<String>,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::banks::Entity",
        from = "Column::Iban",
        to = "super::banks::Column::Iban",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Bank,
    #[sea_orm(has_many = "super::holders::Entity")]
    Holders,
    #[sea_orm(has_one = "super::payment_cards::Entity")]
    PaymentCard,
}

impl Related<super::banks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bank.def()
    }
}

impl Related<super::holders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Holders.def()
    }
}

impl Related<super::payment_cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AccountId::new(model.id),
            number: model.account_number,
            balance: Money::new(model.account_balance),
            kind: model.account_type,
            currency: model_currency(&model.currency_type)?,
            iban: model.iban,
            version: model.version,
        })
    }
}

impl Record for Account {
    type Entity = Entity;
    type Id = AccountId;
    type New = NewAccount;

    const LABEL: &'static str = "account";

    fn id(&self) -> AccountId {
        self.id
    }

    fn id_column() -> Column {
        Column::Id
    }

    fn new_model(new: &NewAccount) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            account_number: ActiveValue::Set(new.number.clone()),
            account_balance: ActiveValue::Set(new.balance.minor()),
            account_type: ActiveValue::Set(new.kind.clone()),
            currency_type: ActiveValue::Set(new.currency.code().to_string()),
            iban: ActiveValue::Set(new.iban.clone()),
            version: ActiveValue::Set(0),
        }
    }

    /// Every update moves the row to the next version.
    fn to_model(&self) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id.get()),
            account_number: ActiveValue::Set(self.number.clone()),
            account_balance: ActiveValue::Set(self.balance.minor()),
            account_type: ActiveValue::Set(self.kind.clone()),
            currency_type: ActiveValue::Set(self.currency.code().to_string()),
            iban: ActiveValue::Set(self.iban.clone()),
            version: ActiveValue::Set(self.version + 1),
        }
    }

    fn from_model(model: Model) -> ResultEngine<Self> {
        Account::try_from(model)
    }

    fn concurrency_token(&self) -> Option<Condition> {
        Some(Condition::all().add(Column::Version.eq(self.version)))
    }
}
