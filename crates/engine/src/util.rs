//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use crate::{Currency, EngineError, Money, ResultEngine};

/// Reject zero and negative amounts.
pub(crate) fn ensure_positive(amount: Money) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidInput(format!(
            "amount must be > 0, got {amount}"
        )));
    }
    Ok(())
}

/// Parse a currency code stored in the DB into a strongly typed `Currency`.
pub(crate) fn model_currency(value: &str) -> ResultEngine<Currency> {
    Currency::try_from(value)
        .map_err(|_| EngineError::InvalidInput(format!("invalid stored currency: {value}")))
}

/// Ensure two accounts hold the same currency; there is no conversion.
pub(crate) fn ensure_same_currency(from: Currency, to: Currency) -> ResultEngine<()> {
    if from != to {
        return Err(EngineError::CurrencyMismatch(format!(
            "source account holds {}, target account holds {}",
            from.code(),
            to.code()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_amounts_only() {
        assert!(ensure_positive(Money::new(1)).is_ok());
        assert_eq!(
            ensure_positive(Money::ZERO).unwrap_err(),
            EngineError::InvalidInput("amount must be > 0, got 0.00".to_string())
        );
        assert!(ensure_positive(Money::new(-500)).is_err());
    }

    #[test]
    fn same_currency() {
        assert!(ensure_same_currency(Currency::USD, Currency::USD).is_ok());
        assert_eq!(
            ensure_same_currency(Currency::USD, Currency::EUR).unwrap_err(),
            EngineError::CurrencyMismatch(
                "source account holds USD, target account holds EUR".to_string()
            )
        );
    }
}
