use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code attached to accounts and transactions.
///
/// Hamyon is effectively mono-currency (default `TJS`); no conversion happens
/// anywhere, the code is carried so records stay meaningful if more than one
/// currency is in use.
///
/// ## Minor units
///
/// Monetary values are stored as an `i64` number of **minor units**:
/// `10.50 TJS` ⇄ `1050`. All supported currencies use 2 fraction digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Tajikistani somoni.
    #[default]
    Tjs,
    Rub,
    Usd,
    Kzt,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Tjs => "TJS",
            Currency::Rub => "RUB",
            Currency::Usd => "USD",
            Currency::Kzt => "KZT",
        }
    }

    /// Number of fraction digits used when converting to/from minor units.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Tjs | Currency::Rub | Currency::Usd | Currency::Kzt => 2,
        }
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
        match value.trim().to_ascii_uppercase().as_str() {
            "TJS" => Ok(Currency::Tjs),
            "RUB" => Ok(Currency::Rub),
            "USD" => Ok(Currency::Usd),
            "KZT" => Ok(Currency::Kzt),
            other => Err(EngineError::InvalidRequest(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::try_from("tjs").unwrap(), Currency::Tjs);
        assert_eq!(Currency::try_from(" USD ").unwrap(), Currency::Usd);
    }

    #[test]
    fn rejects_unknown_code() {
        assert!(Currency::try_from("EUR").is_err());
    }
}
