//! Initial schema.
//!
//! - `bank`: banks, addressed by IBAN
//! - `person`: individuals, employees and customers in one table
//! - `education`: schools finished by employees
//! - `account`: bank accounts with their balance in minor units
//! - `payment_card`: at most one card per account
//! - `person_account`: account holders
//!
//! Every foreign key is `ON DELETE RESTRICT`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Bank {
    Table,
    IdBank,
    BankName,
    MainOffice,
    Iban,
}

#[derive(Iden)]
enum Person {
    Table,
    IdPerson,
    BirthCertificateNumber,
    BirthDate,
    FullName,
    Email,
    PhoneNumber,
    Country,
    City,
    Postcode,
    Street,
    Kind,
    SuperiorId,
    CustomerStatus,
    RegistrationDate,
    AdvisorId,
}

#[derive(Iden)]
enum Education {
    Table,
    IdEducation,
    InstitutionName,
    EmployeeId,
}

#[derive(Iden)]
enum Account {
    Table,
    IdAccount,
    AccountNumber,
    AccountBalance,
    AccountType,
    CurrencyType,
    Iban,
    Version,
}

#[derive(Iden)]
enum PaymentCard {
    Table,
    IdCard,
    CardNumber,
    CardStatus,
    ExpirationDate,
    Cvc,
    AccountId,
}

#[derive(Iden)]
enum PersonAccount {
    Table,
    PersonId,
    AccountId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Banks
        manager
            .create_table(
                Table::create()
                    .table(Bank::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bank::IdBank)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bank::BankName).string().not_null().unique_key())
                    .col(ColumnDef::new(Bank::MainOffice).string().not_null())
                    .col(ColumnDef::new(Bank::Iban).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // 2. Persons
        manager
            .create_table(
                Table::create()
                    .table(Person::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Person::IdPerson)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Person::BirthCertificateNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Person::BirthDate).date().not_null())
                    .col(ColumnDef::new(Person::FullName).string().not_null())
                    .col(ColumnDef::new(Person::Email).string().not_null())
                    .col(ColumnDef::new(Person::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Person::Country).string().not_null())
                    .col(ColumnDef::new(Person::City).string().not_null())
                    .col(ColumnDef::new(Person::Postcode).string().not_null())
                    .col(ColumnDef::new(Person::Street).string().not_null())
                    .col(
                        ColumnDef::new(Person::Kind)
                            .string()
                            .not_null()
                            .default("individual"),
                    )
                    .col(ColumnDef::new(Person::SuperiorId).integer())
                    .col(ColumnDef::new(Person::CustomerStatus).string())
                    .col(ColumnDef::new(Person::RegistrationDate).date())
                    .col(ColumnDef::new(Person::AdvisorId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-person-superior_id")
                            .from(Person::Table, Person::SuperiorId)
                            .to(Person::Table, Person::IdPerson)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-person-advisor_id")
                            .from(Person::Table, Person::AdvisorId)
                            .to(Person::Table, Person::IdPerson)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. Education
        manager
            .create_table(
                Table::create()
                    .table(Education::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Education::IdEducation)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Education::InstitutionName).string().not_null())
                    .col(ColumnDef::new(Education::EmployeeId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-education-employee_id")
                            .from(Education::Table, Education::EmployeeId)
                            .to(Person::Table, Person::IdPerson)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-education-employee_id")
                    .table(Education::Table)
                    .col(Education::EmployeeId)
                    .to_owned(),
            )
            .await?;

        // 4. Accounts
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Account::IdAccount)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Account::AccountNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Account::AccountBalance)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Account::AccountType).string().not_null())
                    .col(ColumnDef::new(Account::CurrencyType).string().not_null())
                    .col(ColumnDef::new(Account::Iban).string())
                    .col(
                        ColumnDef::new(Account::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-account-iban")
                            .from(Account::Table, Account::Iban)
                            .to(Bank::Table, Bank::Iban)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-account-iban")
                    .table(Account::Table)
                    .col(Account::Iban)
                    .to_owned(),
            )
            .await?;

        // 5. Payment cards
        manager
            .create_table(
                Table::create()
                    .table(PaymentCard::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentCard::IdCard)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentCard::CardNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PaymentCard::CardStatus).string().not_null())
                    .col(ColumnDef::new(PaymentCard::ExpirationDate).date().not_null())
                    .col(ColumnDef::new(PaymentCard::Cvc).small_integer().not_null())
                    .col(
                        ColumnDef::new(PaymentCard::AccountId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment_card-account_id")
                            .from(PaymentCard::Table, PaymentCard::AccountId)
                            .to(Account::Table, Account::IdAccount)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 6. Holders
        manager
            .create_table(
                Table::create()
                    .table(PersonAccount::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PersonAccount::PersonId).integer().not_null())
                    .col(ColumnDef::new(PersonAccount::AccountId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PersonAccount::PersonId)
                            .col(PersonAccount::AccountId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-person_account-person_id")
                            .from(PersonAccount::Table, PersonAccount::PersonId)
                            .to(Person::Table, Person::IdPerson)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-person_account-account_id")
                            .from(PersonAccount::Table, PersonAccount::AccountId)
                            .to(Account::Table, Account::IdAccount)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-person_account-account_id")
                    .table(PersonAccount::Table)
                    .col(PersonAccount::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of creation.
        manager
            .drop_table(Table::drop().table(PersonAccount::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentCard::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Education::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Person::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bank::Table).to_owned())
            .await?;
        Ok(())
    }
}
