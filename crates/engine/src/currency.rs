use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Three-letter ISO-like currency code stored on every account.
///
/// The engine never converts between currencies: a transfer is only allowed
/// between accounts holding the same code. Codes are normalized to upper case
/// on parse, so `"usd"` and `"USD"` are the same currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub const EUR: Currency = Currency(*b"EUR");
    pub const USD: Currency = Currency(*b"USD");
    pub const CZK: Currency = Currency(*b"CZK");

    /// Canonical currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_bytes() {
            &[a, b, c] if [a, b, c].iter().all(u8::is_ascii_uppercase) => {
                Ok(Currency([a, b, c]))
            }
            _ => Err(EngineError::InvalidInput(format!(
                "unsupported currency: {value}"
            ))),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::try_from(value.as_str())
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case() {
        assert_eq!(Currency::try_from("usd").unwrap(), Currency::USD);
        assert_eq!(Currency::try_from(" CZK ").unwrap().code(), "CZK");
    }

    #[test]
    fn parse_rejects_non_codes() {
        assert!(Currency::try_from("").is_err());
        assert!(Currency::try_from("EURO").is_err());
        assert!(Currency::try_from("E1R").is_err());
        assert!(Currency::try_from("€").is_err());
    }
}
