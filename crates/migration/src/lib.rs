pub use sea_orm_migration::prelude::*;

mod m20240101_000001_init;
mod m20240102_000001_balance_invariant;

/// Error text raised by the storage guard when a write would leave an account
/// balance NULL or negative.
pub const BALANCE_INVARIANT_MESSAGE: &str = "account balance cannot be null or negative";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_init::Migration),
            Box::new(m20240102_000001_balance_invariant::Migration),
        ]
    }
}
