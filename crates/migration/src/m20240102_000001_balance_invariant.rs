//! Storage-level balance guard.
//!
//! Triggers on `account` abort any insert or balance update that would leave
//! `account_balance` NULL or negative. The engine checks the same rule before
//! writing; these triggers catch every other writer.

use sea_orm::{ConnectionTrait, DbBackend, Statement};
use sea_orm_migration::prelude::*;

use crate::BALANCE_INVARIANT_MESSAGE;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SQLITE_INSERT_TRIGGER: &str = "account_balance_insert_check";
const SQLITE_UPDATE_TRIGGER: &str = "account_balance_update_check";
const POSTGRES_FUNCTION: &str = "account_balance_check";

fn sqlite_up() -> Vec<String> {
    vec![
        format!(
            "CREATE TRIGGER IF NOT EXISTS {SQLITE_INSERT_TRIGGER} \
             BEFORE INSERT ON account FOR EACH ROW \
             WHEN NEW.account_balance IS NULL OR NEW.account_balance < 0 \
             BEGIN SELECT RAISE(ABORT, '{BALANCE_INVARIANT_MESSAGE}'); END;"
        ),
        format!(
            "CREATE TRIGGER IF NOT EXISTS {SQLITE_UPDATE_TRIGGER} \
             BEFORE UPDATE OF account_balance ON account FOR EACH ROW \
             WHEN NEW.account_balance IS NULL OR NEW.account_balance < 0 \
             BEGIN SELECT RAISE(ABORT, '{BALANCE_INVARIANT_MESSAGE}'); END;"
        ),
    ]
}

fn postgres_up() -> Vec<String> {
    vec![
        format!(
            "CREATE OR REPLACE FUNCTION {POSTGRES_FUNCTION}() RETURNS trigger AS $$ \
             BEGIN \
                 IF NEW.account_balance IS NULL OR NEW.account_balance < 0 THEN \
                     RAISE EXCEPTION '{BALANCE_INVARIANT_MESSAGE}'; \
                 END IF; \
                 RETURN NEW; \
             END; \
             $$ LANGUAGE plpgsql;"
        ),
        format!(
            "CREATE TRIGGER {POSTGRES_FUNCTION} \
             BEFORE INSERT OR UPDATE OF account_balance ON account \
             FOR EACH ROW EXECUTE FUNCTION {POSTGRES_FUNCTION}();"
        ),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let statements = match backend {
            DbBackend::Sqlite => sqlite_up(),
            DbBackend::Postgres => postgres_up(),
            other => {
                return Err(DbErr::Migration(format!(
                    "no balance guard available for {other:?}"
                )));
            }
        };
        for sql in statements {
            db.execute(Statement::from_string(backend, sql)).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let statements = match backend {
            DbBackend::Sqlite => vec![
                format!("DROP TRIGGER IF EXISTS {SQLITE_INSERT_TRIGGER};"),
                format!("DROP TRIGGER IF EXISTS {SQLITE_UPDATE_TRIGGER};"),
            ],
            DbBackend::Postgres => vec![
                format!("DROP TRIGGER IF EXISTS {POSTGRES_FUNCTION} ON account;"),
                format!("DROP FUNCTION IF EXISTS {POSTGRES_FUNCTION}();"),
            ],
            _ => Vec::new(),
        };
        for sql in statements {
            db.execute(Statement::from_string(backend, sql)).await?;
        }
        Ok(())
    }
}
