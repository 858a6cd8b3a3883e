use std::{fmt, ops::Deref, str::FromStr};

use error_stack::report;
use masking::{PeekInterface, Strategy, StrongSecret, WithType};
use serde::{Deserialize, Deserializer, Serialize};

use crate::CardError;

/// Card number.
///
/// Construction strips every non-digit character and then verifies the Luhn
/// checksum of what remains, so formatted input (`4548 8120 4940 0004`,
/// `4548-8120-4940-0004`) is accepted while a transposed digit is not.
#[derive(Clone, Debug, Serialize)]
pub struct CardNumber(StrongSecret<String, CardNumberStrategy>);

impl CardNumber {
    pub fn new(pan: &str) -> error_stack::Result<Self, CardError> {
        let digits: String = pan.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() || !luhn::valid(&digits) {
            return Err(report!(CardError::InvalidPan));
        }

        Ok(Self(StrongSecret::new(digits)))
    }

    /// The digits-only card number, as sent on the wire.
    pub fn get_card_no(&self) -> String {
        self.0.peek().clone()
    }

    pub fn get_card_isin(&self) -> String {
        self.0.peek().chars().take(6).collect()
    }

    pub fn get_last4(&self) -> String {
        let digits = self.0.peek();
        digits
            .chars()
            .skip(digits.len().saturating_sub(4))
            .collect()
    }
}

impl FromStr for CardNumber {
    type Err = error_stack::Report<CardError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CardNumber {
    type Error = error_stack::Report<CardError>;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl Deref for CardNumber {
    type Target = StrongSecret<String, CardNumberStrategy>;

    fn deref(&self) -> &StrongSecret<String, CardNumberStrategy> {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        if val_str.len() < 15 || val_str.len() > 19 {
            return WithType::fmt(val, f);
        }

        if let Some(value) = val_str.get(..6) {
            write!(f, "{}{}", value, "*".repeat(val_str.len() - 6))
        } else {
            WithType::fmt(val, f)
        }
    }
}
