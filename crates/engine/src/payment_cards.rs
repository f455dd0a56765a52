//! Payment cards. An account has at most one card.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{AccountId, EngineError, PaymentCardId, ResultEngine, gateway::Record};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCard {
    pub id: PaymentCardId,
    pub number: String,
    /// Free-text status such as `active` or `blocked`.
    pub status: String,
    pub expiration_date: NaiveDate,
    pub cvc: i16,
    pub account_id: AccountId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPaymentCard {
    pub number: String,
    pub status: String,
    pub expiration_date: NaiveDate,
    pub cvc: i16,
    pub account_id: AccountId,
}

impl From<&PaymentCard> for NewPaymentCard {
    fn from(card: &PaymentCard) -> Self {
        Self {
            number: card.number.clone(),
            status: card.status.clone(),
            expiration_date: card.expiration_date,
            cvc: card.cvc,
            account_id: card.account_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_card")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "id_card")]
    pub id: i32,
    #[sea_orm(unique)]
    pub card_number: String,
    pub card_status: String,
    pub expiration_date: Date,
    pub cvc: i16,
    #[sea_orm(unique)]
    pub account_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Account,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for PaymentCard {
    type Entity = Entity;
    type Id = PaymentCardId;
    type New = NewPaymentCard;

    const LABEL: &'static str = "payment card";

    fn id(&self) -> PaymentCardId {
        self.id
    }

    fn id_column() -> Column {
        Column::Id
    }

    fn new_model(new: &NewPaymentCard) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            card_number: ActiveValue::Set(new.number.clone()),
            card_status: ActiveValue::Set(new.status.clone()),
            expiration_date: ActiveValue::Set(new.expiration_date),
            cvc: ActiveValue::Set(new.cvc),
            account_id: ActiveValue::Set(new.account_id.get()),
        }
    }

    fn to_model(&self) -> ActiveModel {
        let mut model = Self::new_model(&NewPaymentCard::from(self));
        model.id = ActiveValue::Set(self.id.get());
        model
    }

    fn from_model(model: Model) -> Result<Self, EngineError> {
        Ok(Self {
            id: PaymentCardId::new(model.id),
            number: model.card_number,
            status: model.card_status,
            expiration_date: model.expiration_date,
            cvc: model.cvc,
            account_id: AccountId::new(model.account_id),
        })
    }
}

/// The card attached to `account_id`, if any.
pub(crate) async fn find_by_account<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> ResultEngine<Option<PaymentCard>> {
    Entity::find()
        .filter(Column::AccountId.eq(account_id.get()))
        .one(conn)
        .await?
        .map(PaymentCard::from_model)
        .transpose()
}
