//! Education records of employees.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EducationId, EngineError, PersonId, gateway::Record};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub id: EducationId,
    pub institution_name: String,
    pub employee_id: PersonId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEducation {
    pub institution_name: String,
    pub employee_id: PersonId,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "education")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "id_education")]
    pub id: i32,
    pub institution_name: String,
    pub employee_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::persons::Entity",
        from = "Column::EmployeeId",
        to = "super::persons::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Employee,
}

impl Related<super::persons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Education {
    type Entity = Entity;
    type Id = EducationId;
    type New = NewEducation;

    const LABEL: &'static str = "education";

    fn id(&self) -> EducationId {
        self.id
    }

    fn id_column() -> Column {
        Column::Id
    }

    fn new_model(new: &NewEducation) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::NotSet,
            institution_name: ActiveValue::Set(new.institution_name.clone()),
            employee_id: ActiveValue::Set(new.employee_id.get()),
        }
    }

    fn to_model(&self) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id.get()),
            institution_name: ActiveValue::Set(self.institution_name.clone()),
            employee_id: ActiveValue::Set(self.employee_id.get()),
        }
    }

    fn from_model(model: Model) -> Result<Self, EngineError> {
        Ok(Self {
            id: EducationId::new(model.id),
            institution_name: model.institution_name,
            employee_id: PersonId::new(model.employee_id),
        })
    }
}
