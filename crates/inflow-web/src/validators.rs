//! Request Field Validators
//!
//! Newtypes for request payload fields that carry their own validation
//! rules. Deserialize them transparently with serde, then call
//! `validate()` before acting on the value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_PRICE: f64 = 0.01;
const MAX_PRICE: f64 = 10_000_000.0;
const MAX_DIGITS_AFTER_COMMA: usize = 2;

/// Validation errors for request fields
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("value must be greater than or equal to {min}")]
    BelowMinimum { min: f64 },

    #[error("value must be less than or equal to {max}")]
    AboveMaximum { max: f64 },

    #[error("price can not be zero")]
    ZeroPrice,

    #[error("number with max. two digits after a comma")]
    TooManyDecimals,

    #[error("value contains emoji")]
    ContainsEmoji,

    #[error("value must be letters separated by single spaces")]
    InvalidSpacingOrChars,
}

/// A price with at most two digits after the comma.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub f64);

impl Price {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.0 < MIN_PRICE {
            return Err(ValidationError::BelowMinimum { min: MIN_PRICE });
        }
        if self.0 > MAX_PRICE {
            return Err(ValidationError::AboveMaximum { max: MAX_PRICE });
        }

        validate_digits_after_comma(self.0)
    }
}

/// A line item price. May be negative for discounts, but never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemPrice(pub f64);

impl LineItemPrice {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.0 == 0.0 {
            return Err(ValidationError::ZeroPrice);
        }
        if self.0 < -MAX_PRICE {
            return Err(ValidationError::BelowMinimum { min: -MAX_PRICE });
        }
        if self.0 > MAX_PRICE {
            return Err(ValidationError::AboveMaximum { max: MAX_PRICE });
        }

        validate_digits_after_comma(self.0)
    }
}

/// A name-like field: letters separated by single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnlyLetters(pub String);

impl OnlyLetters {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.0.chars().any(is_emoji) {
            return Err(ValidationError::ContainsEmoji);
        }
        if !is_letters_with_single_spaces(&self.0) {
            return Err(ValidationError::InvalidSpacingOrChars);
        }

        Ok(())
    }
}

/// Checks the shortest decimal representation of `value`, so values
/// like 0.1 that have no exact binary form still count as one digit.
fn validate_digits_after_comma(value: f64) -> Result<(), ValidationError> {
    let formatted = value.to_string();
    if let Some((_, fraction)) = formatted.split_once('.') {
        if fraction.len() > MAX_DIGITS_AFTER_COMMA {
            return Err(ValidationError::TooManyDecimals);
        }
    }

    Ok(())
}

fn is_emoji(c: char) -> bool {
    matches!(
        u32::from(c),
        0x2190..=0x21FF     // arrows
        | 0x2600..=0x27BF   // misc symbols and dingbats
        | 0x2B00..=0x2BFF   // misc symbols and arrows
        | 0xFE00..=0xFE0F   // variation selectors
        | 0x1F300..=0x1F5FF // misc symbols and pictographs
        | 0x1F600..=0x1F64F // emoticons
        | 0x1F680..=0x1F6FF // transport and map symbols
        | 0x1F900..=0x1F9FF // supplemental symbols and pictographs
    )
}

fn is_letters_with_single_spaces(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(' ')
        && !s.ends_with(' ')
        && !s.contains("  ")
        && s.chars().all(|c| c.is_alphabetic() || c == ' ')
}
