//! Free-text parsing

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::normalize_symbol;

/// 10^28, the exclusive bound on an amount's magnitude. Stored amounts are
/// JSON floats, and values near `Decimal::MAX` do not survive the round trip.
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0x1000_0000, 0x3E25_0261, 0x204F_CE5E, false, 0);

/// Why a line of user input was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("expected exactly three values")]
    WrongShape,

    #[error("amount is not a number")]
    NotANumber,

    #[error("amount cannot be represented")]
    OutOfRange,
}

/// Whether `text` is the cancel keyword (case-insensitive, whitespace ignored)
pub fn is_cancel(text: &str, keyword: &str) -> bool {
    text.trim().eq_ignore_ascii_case(keyword.trim())
}

/// Parse a user-typed amount such as `1.5`, `-2` or `1e-3`.
///
/// Anything that reads as a finite float is a number. Numbers whose magnitude
/// reaches 1e28, or that are non-zero but round to zero, are `OutOfRange`.
pub fn parse_amount(text: &str) -> Result<Decimal, InputError> {
    let text = text.trim();
    let float = f64::from_str(text).ok().filter(|f| f.is_finite());
    let exact = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok();

    let amount = match (exact, float) {
        (Some(amount), _) => amount,
        (None, Some(f)) => Decimal::try_from(f).map_err(|_| InputError::OutOfRange)?,
        (None, None) => return Err(InputError::NotANumber),
    };

    let lost = amount.is_zero() && float.is_some_and(|f| f.abs() > 0.0);
    if lost || amount.abs() >= AMOUNT_LIMIT {
        return Err(InputError::OutOfRange);
    }
    Ok(amount)
}

/// `SYMBOL AMOUNT TOKEN_ADDRESS`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetLine {
    pub symbol: String,
    pub amount: Decimal,
    pub token_address: String,
}

impl AssetLine {
    /// Exactly three whitespace-separated tokens with a numeric amount
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let [symbol, amount, token_address] = parts[..] else {
            return Err(InputError::WrongShape);
        };

        Ok(Self {
            symbol: normalize_symbol(symbol),
            amount: parse_amount(amount)?,
            token_address: token_address.to_string(),
        })
    }
}
