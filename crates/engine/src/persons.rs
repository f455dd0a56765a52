//! People known to the bank.
//!
//! Employees and customers are people with extra attributes. Instead of a
//! class hierarchy the extra attributes live in [`PersonKind`], and all kinds
//! share the `person` table with a `kind` discriminator column.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, PersonId, ResultEngine, gateway::Record};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub postcode: String,
    pub street: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersonKind {
    /// A plain account holder.
    Individual,
    Employee {
        superior_id: Option<PersonId>,
    },
    Customer {
        status: String,
        registration_date: NaiveDate,
        /// The employee looking after the customer.
        advisor_id: PersonId,
    },
}

impl PersonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Employee { .. } => "employee",
            Self::Customer { .. } => "customer",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub birth_certificate_number: String,
    pub birth_date: NaiveDate,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: Address,
    pub kind: PersonKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub birth_certificate_number: String,
    pub birth_date: NaiveDate,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: Address,
    pub kind: PersonKind,
}

impl From<&Person> for NewPerson {
    fn from(person: &Person) -> Self {
        Self {
            birth_certificate_number: person.birth_certificate_number.clone(),
            birth_date: person.birth_date,
            full_name: person.full_name.clone(),
            email: person.email.clone(),
            phone_number: person.phone_number.clone(),
            address: person.address.clone(),
            kind: person.kind.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "person")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "id_person")]
    pub id: i32,
    #[sea_orm(unique)]
    pub birth_certificate_number: String,
    pub birth_date: Date,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub country: String,
    pub city: String,
    pub postcode: String,
    pub street: String,
    pub kind: String,
    pub superior_id: Option<i32>,
    pub customer_status: Option<String>,
    pub registration_date: Option<Date>,
    pub advisor_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Person {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| {
            EngineError::InvalidInput(format!("person {}: {what}", model.id))
        };
        let kind = match model.kind.as_str() {
            "individual" => PersonKind::Individual,
            "employee" => PersonKind::Employee {
                superior_id: model.superior_id.map(PersonId::new),
            },
            "customer" => PersonKind::Customer {
                status: model
                    .customer_status
                    .clone()
                    .ok_or_else(|| corrupt("customer without status"))?,
                registration_date: model
                    .registration_date
                    .ok_or_else(|| corrupt("customer without registration date"))?,
                advisor_id: model
                    .advisor_id
                    .map(PersonId::new)
                    .ok_or_else(|| corrupt("customer without advisor"))?,
            },
            other => return Err(corrupt(&format!("unknown kind {other:?}"))),
        };

        Ok(Self {
            id: PersonId::new(model.id),
            birth_certificate_number: model.birth_certificate_number,
            birth_date: model.birth_date,
            full_name: model.full_name,
            email: model.email,
            phone_number: model.phone_number,
            address: Address {
                country: model.country,
                city: model.city,
                postcode: model.postcode,
                street: model.street,
            },
            kind,
        })
    }
}

impl Record for Person {
    type Entity = Entity;
    type Id = PersonId;
    type New = NewPerson;

    const LABEL: &'static str = "person";

    fn id(&self) -> PersonId {
        self.id
    }

    fn id_column() -> Column {
        Column::Id
    }

    fn new_model(new: &NewPerson) -> ActiveModel {
        let (superior_id, customer_status, registration_date, advisor_id) = match &new.kind {
            PersonKind::Individual => (None, None, None, None),
            PersonKind::Employee { superior_id } => {
                (superior_id.map(PersonId::get), None, None, None)
            }
            PersonKind::Customer {
                status,
                registration_date,
                advisor_id,
            } => (
                None,
                Some(status.clone()),
                Some(*registration_date),
                Some(advisor_id.get()),
            ),
        };

        ActiveModel {
            id: ActiveValue::NotSet,
            birth_certificate_number: ActiveValue::Set(new.birth_certificate_number.clone()),
            birth_date: ActiveValue::Set(new.birth_date),
            full_name: ActiveValue::Set(new.full_name.clone()),
            email: ActiveValue::Set(new.email.clone()),
            phone_number: ActiveValue::Set(new.phone_number.clone()),
            country: ActiveValue::Set(new.address.country.clone()),
            city: ActiveValue::Set(new.address.city.clone()),
            postcode: ActiveValue::Set(new.address.postcode.clone()),
            street: ActiveValue::Set(new.address.street.clone()),
            kind: ActiveValue::Set(new.kind.as_str().to_string()),
            superior_id: ActiveValue::Set(superior_id),
            customer_status: ActiveValue::Set(customer_status),
            registration_date: ActiveValue::Set(registration_date),
            advisor_id: ActiveValue::Set(advisor_id),
        }
    }

    fn to_model(&self) -> ActiveModel {
        let mut model = Self::new_model(&NewPerson::from(self));
        model.id = ActiveValue::Set(self.id.get());
        model
    }

    fn from_model(model: Model) -> ResultEngine<Self> {
        Person::try_from(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_person(kind: PersonKind) -> NewPerson {
        NewPerson {
            birth_certificate_number: "8001011234".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            full_name: "Jana Novakova".to_string(),
            email: "jana@example.com".to_string(),
            phone_number: "+420123456789".to_string(),
            address: Address {
                country: "Czechia".to_string(),
                city: "Brno".to_string(),
                postcode: "60200".to_string(),
                street: "Husova 5".to_string(),
            },
            kind,
        }
    }

    fn stored(new: &NewPerson, id: i32) -> Model {
        let active = Person::new_model(new);
        Model {
            id,
            birth_certificate_number: new.birth_certificate_number.clone(),
            birth_date: new.birth_date,
            full_name: new.full_name.clone(),
            email: new.email.clone(),
            phone_number: new.phone_number.clone(),
            country: new.address.country.clone(),
            city: new.address.city.clone(),
            postcode: new.address.postcode.clone(),
            street: new.address.street.clone(),
            kind: new.kind.as_str().to_string(),
            superior_id: active.superior_id.unwrap(),
            customer_status: active.customer_status.unwrap(),
            registration_date: active.registration_date.unwrap(),
            advisor_id: active.advisor_id.unwrap(),
        }
    }

    #[test]
    fn customer_columns_round_trip() {
        let kind = PersonKind::Customer {
            status: "active".to_string(),
            registration_date: NaiveDate::from_ymd_opt(2023, 5, 17).unwrap(),
            advisor_id: PersonId::new(2),
        };
        let new = new_person(kind.clone());

        let person = Person::try_from(stored(&new, 5)).unwrap();

        assert_eq!(person.id, PersonId::new(5));
        assert_eq!(person.kind, kind);
        assert_eq!(person.address.city, "Brno");
    }

    #[test]
    fn employee_keeps_superior() {
        let kind = PersonKind::Employee {
            superior_id: Some(PersonId::new(1)),
        };
        let person = Person::try_from(stored(&new_person(kind.clone()), 3)).unwrap();
        assert_eq!(person.kind, kind);
    }

    #[test]
    fn customer_row_without_advisor_is_rejected() {
        let mut model = stored(&new_person(PersonKind::Individual), 4);
        model.kind = "customer".to_string();
        assert!(Person::try_from(model).is_err());
    }
}
