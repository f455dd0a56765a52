//! Banking records and the funds-transfer engine.
//!
//! [`Engine`] owns a database pool and runs every operation inside its own
//! transaction. [`Engine::transfer`] moves money between two accounts as one
//! unit: both balances change or neither does, and no balance ever drops
//! below zero (see [`guard`]). Plain record access goes through the generic
//! [`Gateway`](gateway::Gateway).

pub use accounts::{Account, NewAccount};
pub use banks::{Bank, NewBank};
pub use currency::Currency;
pub use education::{Education, NewEducation};
pub use error::EngineError;
pub use ids::{AccountId, BankId, EducationId, PaymentCardId, PersonId};
pub use money::Money;
pub use ops::{Engine, EngineBuilder, RetryPolicy};
pub use payment_cards::{NewPaymentCard, PaymentCard};
pub use persons::{Address, NewPerson, Person, PersonKind};

pub mod gateway;
pub mod guard;

mod accounts;
mod banks;
mod currency;
mod education;
mod error;
mod holders;
mod ids;
mod money;
mod ops;
mod payment_cards;
mod persons;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
