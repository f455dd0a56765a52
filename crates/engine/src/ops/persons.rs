use sea_orm::{Condition, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Education, EducationId, EngineError, NewEducation, NewPerson, Person, PersonId, PersonKind,
    ResultEngine, education,
    gateway::{Gateway, Record},
    persons,
};

use super::Engine;

impl Engine {
    /// Stores a person.
    ///
    /// A customer's advisor and an employee's superior must be existing
    /// employees.
    pub async fn create_person(&self, new: NewPerson) -> ResultEngine<Person> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move {
                check_references(db_tx, &new.kind).await?;
                Gateway::<Person, _>::on(db_tx).create(&new).await
            })
        })
        .await
    }

    pub async fn person(&self, id: PersonId) -> ResultEngine<Option<Person>> {
        Gateway::<Person, _>::on(&self.database).find(id).await
    }

    pub async fn persons(&self) -> ResultEngine<Vec<Person>> {
        Gateway::<Person, _>::on(&self.database).list().await
    }

    /// Writes back an edited person.
    ///
    /// An employee who still advises customers, supervises employees or has
    /// education records cannot stop being an employee.
    pub async fn update_person(&self, person: &Person) -> ResultEngine<()> {
        let person = person.clone();
        self.with_tx(|_, db_tx| {
            Box::pin(async move {
                check_references(db_tx, &person.kind).await?;
                if !matches!(person.kind, PersonKind::Employee { .. }) {
                    ensure_no_dependents(db_tx, person.id).await?;
                }
                Gateway::<Person, _>::on(db_tx).update(&person).await
            })
        })
        .await
    }

    /// Deletes a person. Fails with [`EngineError::Restricted`] while the
    /// person still holds an account or has education records.
    pub async fn delete_person(&self, id: PersonId) -> ResultEngine<()> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move { Gateway::<Person, _>::on(db_tx).delete(id).await })
        })
        .await
    }

    /// Records a finished school for an employee.
    pub async fn add_education(&self, new: NewEducation) -> ResultEngine<Education> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move {
                ensure_employee(db_tx, new.employee_id).await?;
                Gateway::<Education, _>::on(db_tx).create(&new).await
            })
        })
        .await
    }

    pub async fn education(&self, id: EducationId) -> ResultEngine<Option<Education>> {
        Gateway::<Education, _>::on(&self.database).find(id).await
    }

    /// Education records of one employee, oldest first.
    pub async fn educations_of(&self, employee: PersonId) -> ResultEngine<Vec<Education>> {
        education::Entity::find()
            .filter(education::Column::EmployeeId.eq(employee.get()))
            .order_by_asc(education::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Education::from_model)
            .collect()
    }

    pub async fn update_education(&self, education: &Education) -> ResultEngine<()> {
        let education = education.clone();
        self.with_tx(|_, db_tx| {
            Box::pin(async move {
                ensure_employee(db_tx, education.employee_id).await?;
                Gateway::<Education, _>::on(db_tx).update(&education).await
            })
        })
        .await
    }

    pub async fn delete_education(&self, id: EducationId) -> ResultEngine<()> {
        self.with_tx(|_, db_tx| {
            Box::pin(async move { Gateway::<Education, _>::on(db_tx).delete(id).await })
        })
        .await
    }
}

async fn check_references(db_tx: &DatabaseTransaction, kind: &PersonKind) -> ResultEngine<()> {
    match kind {
        PersonKind::Individual => Ok(()),
        PersonKind::Employee { superior_id } => match superior_id {
            Some(superior) => ensure_employee(db_tx, *superior).await,
            None => Ok(()),
        },
        PersonKind::Customer { advisor_id, .. } => ensure_employee(db_tx, *advisor_id).await,
    }
}

async fn ensure_employee(db_tx: &DatabaseTransaction, id: PersonId) -> ResultEngine<()> {
    match Gateway::<Person, _>::on(db_tx).find(id).await? {
        Some(Person {
            kind: PersonKind::Employee { .. },
            ..
        }) => Ok(()),
        Some(_) => Err(EngineError::InvalidInput(format!(
            "person {id} is not an employee"
        ))),
        None => Err(EngineError::KeyNotFound(format!("employee {id}"))),
    }
}

async fn ensure_no_dependents(db_tx: &DatabaseTransaction, id: PersonId) -> ResultEngine<()> {
    let stored = Gateway::<Person, _>::on(db_tx).find(id).await?;
    if !matches!(
        stored,
        Some(Person {
            kind: PersonKind::Employee { .. },
            ..
        })
    ) {
        return Ok(());
    }

    let subordinates = persons::Entity::find()
        .filter(
            Condition::any()
                .add(persons::Column::AdvisorId.eq(id.get()))
                .add(persons::Column::SuperiorId.eq(id.get())),
        )
        .count(db_tx)
        .await?;
    if subordinates > 0 {
        return Err(EngineError::Restricted(format!(
            "employee {id} still advises or supervises {subordinates} person(s)"
        )));
    }

    let schools = education::Entity::find()
        .filter(education::Column::EmployeeId.eq(id.get()))
        .count(db_tx)
        .await?;
    if schools > 0 {
        return Err(EngineError::Restricted(format!(
            "employee {id} still has {schools} education record(s)"
        )));
    }
    Ok(())
}
