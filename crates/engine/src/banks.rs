//! Banks. Accounts reference their bank by IBAN.

use sea_orm::{ActiveValue, QueryFilter, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{BankId, EngineError, ResultEngine, gateway::Record};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: BankId,
    pub name: String,
    pub main_office: String,
    pub iban: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBank {
    pub name: String,
    pub main_office: String,
    pub iban: String,
}

impl NewBank {
    pub fn new(
        name: impl Into<String>,
        main_office: impl Into<String>,
        iban: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            main_office: main_office.into(),
            iban: iban.into(),
        }
    }
}

impl From<&Bank> for NewBank {
    fn from(bank: &Bank) -> Self {
        Self {
            name: bank.name.clone(),
            main_office: bank.main_office.clone(),
            iban: bank.iban.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bank")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "id_bank")]
    pub id: i32,
    #[sea_orm(unique)]
    pub bank_name: String,
    pub main_office: String,
    #[sea_orm(unique)]
    pub iban: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Bank {
    fn from(model: Model) -> Self {
        Self {
            id: BankId::new(model.id),
            name: model.bank_name,
            main_office: model.main_office,
            iban: model.iban,
        }
    }
}

impl Record for Bank {
    type Entity = Entity;
    type Id = BankId;
    type New = NewBank;

    const LABEL: &'static str = "bank";

    fn id(&self) -> BankId {
        self.id
    }

    fn id_column() -> Column {
        Column::Id
    }

    fn new_model(new: &NewBank) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            bank_name: ActiveValue::Set(new.name.clone()),
            main_office: ActiveValue::Set(new.main_office.clone()),
            iban: ActiveValue::Set(new.iban.clone()),
        }
    }

    fn to_model(&self) -> ActiveModel {
        let mut model = Self::new_model(&NewBank::from(self));
        model.id = ActiveValue::Set(self.id.get());
        model
    }

    fn from_model(model: Model) -> Result<Self, EngineError> {
        Ok(model.into())
    }
}

/// Look a bank up by its IBAN.
pub(crate) async fn find_by_iban<C: ConnectionTrait>(
    conn: &C,
    iban: &str,
) -> ResultEngine<Option<Bank>> {
    Ok(Entity::find()
        .filter(Column::Iban.eq(iban))
        .one(conn)
        .await?
        .map(Bank::from))
}
