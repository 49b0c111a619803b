use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ResultStore, StoreError};

/// Money amount represented as an integer number of **minor units**.
///
/// `fraction` is the number of decimal digits between minor and major units,
/// so `Money::new(85_00, 2, "RUB")` is 85 RUB. The value is immutable: every
/// operation returns a new `Money`.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let price = Money::new(85_50, 2, "RUB");
/// assert_eq!(price.to_string(), "85.5 RUB");
/// ```
///
/// Parsing user input in the currency's precision (accepts `.` or `,`):
///
/// ```rust
/// use engine::Money;
///
/// let parsed = Money::parse("90,5", 2, "RUB").unwrap();
/// assert_eq!(parsed.amount(), 90_50);
/// assert!(Money::parse("1.234", 2, "RUB").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    fraction: u32,
    currency: String,
}

impl Money {
    /// Creates a new amount from minor units.
    #[must_use]
    pub fn new(amount: i64, fraction: u32, currency: impl Into<String>) -> Self {
        Self {
            amount,
            fraction,
            currency: currency.into(),
        }
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    #[must_use]
    pub const fn fraction(&self) -> u32 {
        self.fraction
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Subtraction that refuses to mix currencies.
    ///
    /// Operands with a different `fraction` are rescaled to the larger one.
    pub fn checked_sub(&self, rhs: &Money) -> ResultStore<Money> {
        if self.currency != rhs.currency {
            return Err(StoreError::CurrencyMismatch(format!(
                "cannot subtract {} from {}",
                rhs.currency, self.currency
            )));
        }

        let fraction = self.fraction.max(rhs.fraction);
        let lhs = rescale(self.amount, self.fraction, fraction)?;
        let rhs = rescale(rhs.amount, rhs.fraction, fraction)?;
        let amount = lhs
            .checked_sub(rhs)
            .ok_or_else(|| StoreError::InvalidAmount("amount too large".to_string()))?;

        Ok(Money::new(amount, fraction, self.currency.clone()))
    }

    /// Parses a decimal string in major units into `fraction` minor digits.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - at most `fraction` fractional digits (rejects `12.345` for 2)
    /// - rejects empty/invalid strings
    pub fn parse(input: &str, fraction: u32, currency: impl Into<String>) -> ResultStore<Money> {
        let empty = || StoreError::InvalidAmount("empty amount".to_string());
        let invalid = || StoreError::InvalidAmount("invalid amount".to_string());
        let overflow = || StoreError::InvalidAmount("amount too large".to_string());

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let minor_str = parts.next().unwrap_or("");

        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !minor_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if minor_str.len() > fraction as usize {
            return Err(StoreError::InvalidAmount("too many decimals".to_string()));
        }

        let scale = 10i64.checked_pow(fraction).ok_or_else(overflow)?;
        let major: i64 = major_str.parse().map_err(|_| overflow())?;
        let minor: i64 = if minor_str.is_empty() {
            0
        } else {
            let padded = format!("{minor_str:0<width$}", width = fraction as usize);
            padded.parse().map_err(|_| invalid())?
        };

        let total = major
            .checked_mul(scale)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(overflow)?;

        let amount = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money::new(amount, fraction, currency))
    }
}

fn rescale(amount: i64, from: u32, to: u32) -> ResultStore<i64> {
    10i64
        .checked_pow(to - from)
        .and_then(|factor| amount.checked_mul(factor))
        .ok_or_else(|| StoreError::InvalidAmount("amount too large".to_string()))
}

/// Major units with trailing zero decimals dropped, then the currency code.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        let scale = 10u64.saturating_pow(self.fraction);
        let major = abs / scale;
        let minor = abs % scale;

        if minor == 0 {
            return write!(f, "{sign}{major} {}", self.currency);
        }

        let digits = format!("{minor:0width$}", width = self.fraction as usize);
        write!(
            f,
            "{sign}{major}.{} {}",
            digits.trim_end_matches('0'),
            self.currency
        )
    }
}

impl From<api_types::Money> for Money {
    fn from(value: api_types::Money) -> Self {
        Self::new(value.amount, value.fraction, value.currency)
    }
}

impl From<Money> for api_types::Money {
    fn from(value: Money) -> Self {
        Self {
            amount: value.amount,
            fraction: value.fraction,
            currency: value.currency,
        }
    }
}
