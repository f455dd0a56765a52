use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    AccountId, Address, Currency, Engine, EngineError, Money, NewAccount, NewEducation,
    NewPaymentCard, NewPerson, Person, PersonId, PersonKind,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_person(certificate: &str, name: &str, kind: PersonKind) -> NewPerson {
    NewPerson {
        birth_certificate_number: certificate.to_string(),
        birth_date: date(1990, 4, 12),
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone_number: "+420 600 000 000".to_string(),
        address: Address {
            country: "Czechia".to_string(),
            city: "Brno".to_string(),
            postcode: "60200".to_string(),
            street: "Nádražní 1".to_string(),
        },
        kind,
    }
}

async fn employee(engine: &Engine, certificate: &str, name: &str) -> Person {
    engine
        .create_person(new_person(
            certificate,
            name,
            PersonKind::Employee { superior_id: None },
        ))
        .await
        .unwrap()
}

async fn open(engine: &Engine, number: &str, balance: i64) -> AccountId {
    engine
        .open_account(NewAccount::new(
            number,
            Money::new(balance),
            "checking",
            Currency::CZK,
        ))
        .await
        .unwrap()
        .id
}

fn card_for(account: AccountId, number: &str) -> NewPaymentCard {
    NewPaymentCard {
        number: number.to_string(),
        status: "active".to_string(),
        expiration_date: date(2030, 1, 31),
        cvc: 123,
        account_id: account,
    }
}

#[tokio::test]
async fn register_bank_rejects_duplicate_iban() {
    let (engine, _db) = engine_with_db().await;

    let bank = engine
        .register_bank("First Bank", "Praha", "CZ6508000000192000145399")
        .await
        .unwrap();
    let err = engine
        .register_bank("Second Bank", "Brno", "CZ6508000000192000145399")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let found = engine
        .bank_by_iban("CZ6508000000192000145399")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, bank);
    assert_eq!(engine.banks().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_bank_by_iban_reports_whether_found() {
    let (engine, _db) = engine_with_db().await;
    engine
        .register_bank("First Bank", "Praha", "CZ01")
        .await
        .unwrap();

    assert!(engine.delete_bank_by_iban("CZ01").await.unwrap());
    assert!(!engine.delete_bank_by_iban("CZ01").await.unwrap());
    assert!(engine.bank_by_iban("CZ01").await.unwrap().is_none());
}

#[tokio::test]
async fn bank_with_accounts_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let bank = engine
        .register_bank("First Bank", "Praha", "CZ01")
        .await
        .unwrap();
    let account = engine
        .open_account(
            NewAccount::new("1000000001", Money::new(10), "checking", Currency::CZK)
                .with_iban("CZ01"),
        )
        .await
        .unwrap();
    assert_eq!(account.iban.as_deref(), Some("CZ01"));

    let err = engine.delete_bank(bank.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Restricted(_)));
    assert!(engine.bank(bank.id).await.unwrap().is_some());
}

#[tokio::test]
async fn update_bank_renames() {
    let (engine, _db) = engine_with_db().await;
    let mut bank = engine
        .register_bank("First Bank", "Praha", "CZ01")
        .await
        .unwrap();

    bank.main_office = "Ostrava".to_string();
    engine.update_bank(&bank).await.unwrap();

    let stored = engine.bank(bank.id).await.unwrap().unwrap();
    assert_eq!(stored.main_office, "Ostrava");
}

#[tokio::test]
async fn account_with_card_or_holder_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let account = open(&engine, "1000000001", 100).await;
    let holder = employee(&engine, "900101/0001", "Alice").await;

    let card = engine
        .issue_card(card_for(account, "4111111111111111"))
        .await
        .unwrap();
    engine.add_holder(account, holder.id).await.unwrap();

    let err = engine.delete_account(account).await.unwrap_err();
    assert!(matches!(err, EngineError::Restricted(_)));

    engine.delete_card(card.id).await.unwrap();
    let err = engine.delete_account(account).await.unwrap_err();
    assert!(matches!(err, EngineError::Restricted(_)));

    assert!(engine.remove_holder(account, holder.id).await.unwrap());
    engine.delete_account(account).await.unwrap();
    assert!(engine.account(account).await.unwrap().is_none());
}

#[tokio::test]
async fn account_has_at_most_one_card() {
    let (engine, _db) = engine_with_db().await;
    let account = open(&engine, "1000000001", 100).await;

    let card = engine
        .issue_card(card_for(account, "4111111111111111"))
        .await
        .unwrap();
    let err = engine
        .issue_card(card_for(account, "4222222222222222"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    assert_eq!(engine.card_of(account).await.unwrap(), Some(card.clone()));

    let mut blocked = card.clone();
    blocked.status = "blocked".to_string();
    engine.update_card(&blocked).await.unwrap();
    assert_eq!(engine.card(card.id).await.unwrap(), Some(blocked));
}

#[tokio::test]
async fn card_for_missing_account_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let missing = AccountId::new(77);

    let err = engine
        .issue_card(card_for(missing, "4111111111111111"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::AccountNotFound(missing));
}

#[tokio::test]
async fn holders_are_listed_per_account() {
    let (engine, _db) = engine_with_db().await;
    let account = open(&engine, "1000000001", 100).await;
    let other = open(&engine, "1000000002", 100).await;
    let alice = employee(&engine, "900101/0001", "Alice").await;
    let bob = employee(&engine, "900101/0002", "Bob").await;

    engine.add_holder(account, alice.id).await.unwrap();
    engine.add_holder(account, bob.id).await.unwrap();
    engine.add_holder(other, bob.id).await.unwrap();

    let names: Vec<_> = engine
        .holders(account)
        .await
        .unwrap()
        .into_iter()
        .map(|person| person.full_name)
        .collect();
    assert_eq!(names, ["Alice", "Bob"]);
    assert_eq!(engine.holders(other).await.unwrap(), vec![bob.clone()]);

    let err = engine.add_holder(account, alice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine
        .add_holder(account, PersonId::new(404))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine.delete_person(bob.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Restricted(_)));

    assert!(engine.remove_holder(other, bob.id).await.unwrap());
    assert!(!engine.remove_holder(other, bob.id).await.unwrap());
}

#[tokio::test]
async fn customer_needs_an_employee_as_advisor() {
    let (engine, _db) = engine_with_db().await;
    let advisor = employee(&engine, "800101/0001", "Eva").await;
    let individual = engine
        .create_person(new_person(
            "800101/0002",
            "Petr",
            PersonKind::Individual,
        ))
        .await
        .unwrap();

    let customer = engine
        .create_person(new_person(
            "950505/0003",
            "Jana",
            PersonKind::Customer {
                status: "gold".to_string(),
                registration_date: date(2024, 2, 1),
                advisor_id: advisor.id,
            },
        ))
        .await
        .unwrap();
    assert_eq!(engine.person(customer.id).await.unwrap(), Some(customer));

    let err = engine
        .create_person(new_person(
            "950505/0004",
            "Karel",
            PersonKind::Customer {
                status: "basic".to_string(),
                registration_date: date(2024, 2, 1),
                advisor_id: individual.id,
            },
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_person(new_person(
            "950505/0005",
            "Lukas",
            PersonKind::Customer {
                status: "basic".to_string(),
                registration_date: date(2024, 2, 1),
                advisor_id: PersonId::new(999),
            },
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert_eq!(engine.persons().await.unwrap().len(), 3);
}

#[tokio::test]
async fn duplicate_birth_certificate_is_existing_key() {
    let (engine, _db) = engine_with_db().await;
    employee(&engine, "900101/0001", "Alice").await;

    let err = engine
        .create_person(new_person(
            "900101/0001",
            "Alicia",
            PersonKind::Individual,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn employee_education_history() {
    let (engine, _db) = engine_with_db().await;
    let alice = employee(&engine, "900101/0001", "Alice").await;
    let bob = employee(&engine, "900101/0002", "Bob").await;

    for school in ["Masaryk University", "Brno University of Technology"] {
        engine
            .add_education(NewEducation {
                institution_name: school.to_string(),
                employee_id: alice.id,
            })
            .await
            .unwrap();
    }
    let bobs = engine
        .add_education(NewEducation {
            institution_name: "Charles University".to_string(),
            employee_id: bob.id,
        })
        .await
        .unwrap();

    let schools: Vec<_> = engine
        .educations_of(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|education| education.institution_name)
        .collect();
    assert_eq!(schools, ["Masaryk University", "Brno University of Technology"]);

    let mut renamed = bobs.clone();
    renamed.institution_name = "Charles University in Prague".to_string();
    engine.update_education(&renamed).await.unwrap();
    assert_eq!(engine.education(bobs.id).await.unwrap(), Some(renamed));

    let err = engine.delete_person(bob.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Restricted(_)));

    engine.delete_education(bobs.id).await.unwrap();
    assert!(engine.education(bobs.id).await.unwrap().is_none());
    engine.delete_person(bob.id).await.unwrap();
    assert!(engine.person(bob.id).await.unwrap().is_none());
}

#[tokio::test]
async fn promoting_an_individual_to_employee() {
    let (engine, _db) = engine_with_db().await;
    let boss = employee(&engine, "700101/0001", "Boss").await;
    let mut person = engine
        .create_person(new_person(
            "900101/0009",
            "Olga",
            PersonKind::Individual,
        ))
        .await
        .unwrap();

    person.kind = PersonKind::Employee {
        superior_id: Some(boss.id),
    };
    engine.update_person(&person).await.unwrap();

    let stored = engine.person(person.id).await.unwrap().unwrap();
    assert_eq!(stored.kind, PersonKind::Employee { superior_id: Some(boss.id) });
}

#[tokio::test]
async fn employee_with_dependents_cannot_be_demoted() {
    let (engine, _db) = engine_with_db().await;
    let mut eva = employee(&engine, "800101/0001", "Eva").await;
    let customer = engine
        .create_person(new_person(
            "950505/0003",
            "Jana",
            PersonKind::Customer {
                status: "gold".to_string(),
                registration_date: date(2024, 2, 1),
                advisor_id: eva.id,
            },
        ))
        .await
        .unwrap();
    let school = engine
        .add_education(NewEducation {
            institution_name: "Masaryk University".to_string(),
            employee_id: eva.id,
        })
        .await
        .unwrap();

    eva.kind = PersonKind::Individual;
    let err = engine.update_person(&eva).await.unwrap_err();
    assert!(matches!(err, EngineError::Restricted(_)));

    engine.delete_person(customer.id).await.unwrap();
    let err = engine.update_person(&eva).await.unwrap_err();
    assert!(matches!(err, EngineError::Restricted(_)));

    let stored = engine.person(eva.id).await.unwrap().unwrap();
    assert_eq!(stored.kind, PersonKind::Employee { superior_id: None });

    engine.delete_education(school.id).await.unwrap();
    engine.update_person(&eva).await.unwrap();
    let stored = engine.person(eva.id).await.unwrap().unwrap();
    assert_eq!(stored.kind, PersonKind::Individual);
}
