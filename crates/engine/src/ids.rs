//! Typed identifiers.
//!
//! Every record is keyed by an integer assigned by the database on insert.
//! The newtypes keep an account id from being passed where a person id is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of an [`Account`](crate::Account).
    AccountId
);
record_id!(
    /// Identifier of a [`Bank`](crate::Bank).
    BankId
);
record_id!(
    /// Identifier of a [`Person`](crate::Person), whatever its kind.
    PersonId
);
record_id!(
    /// Identifier of an [`Education`](crate::Education) record.
    EducationId
);
record_id!(
    /// Identifier of a [`PaymentCard`](crate::PaymentCard).
    PaymentCardId
);
