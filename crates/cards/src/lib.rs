//! Validated card primitives with masked debug output.
//!
//! Every type validates eagerly at construction and stores its value behind
//! a [`masking`] secret, so invalid data never escapes and valid data never
//! leaks through `Debug` formatting.

mod validate;

use std::sync::LazyLock;

use error_stack::{report, ResultExt};
use masking::{PeekInterface, Secret, StrongSecret};
use regex::Regex;
use time::{Date, Month, OffsetDateTime};

pub use crate::validate::{CardNumber, CardNumberStrategy};

/// Failures raised while validating card data.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CardError {
    #[error("Invalid PAN provided.")]
    InvalidPan,
    #[error("expiration year must have at most 2 digits")]
    InvalidExpirationYear,
    #[error("expiration month must be between 1 and 12")]
    InvalidExpirationMonth,
    #[error("card expiration date must be in the future")]
    ExpirationInPast,
    #[error("holder name must contain only letters and spaces")]
    InvalidHolderName,
    #[error("security code must contain only digits")]
    NonNumericSecurityCode,
    #[error("security code must have 3 or 4 digits")]
    InvalidSecurityCodeLength,
}

#[derive(Clone, Debug)]
pub struct CardExpirationMonth(StrongSecret<u8>);

impl CardExpirationMonth {
    pub fn new(month: u8) -> error_stack::Result<Self, CardError> {
        if (1..=12).contains(&month) {
            Ok(Self(StrongSecret::new(month)))
        } else {
            Err(report!(CardError::InvalidExpirationMonth))
        }
    }

    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek())
    }
}

#[derive(Clone, Debug)]
pub struct CardExpirationYear(StrongSecret<u8>);

impl CardExpirationYear {
    pub fn new(year: u8) -> error_stack::Result<Self, CardError> {
        if year > 99 {
            Err(report!(CardError::InvalidExpirationYear))
        } else {
            Ok(Self(StrongSecret::new(year)))
        }
    }

    pub fn two_digits(&self) -> String {
        format!("{:02}", self.0.peek())
    }
}

/// Card expiration, carried as a two-digit year and a month.
///
/// The gateway rejects expired cards before even looking at the rest of the
/// request, so the first day of the expiration month must lie strictly after
/// the current UTC date. The two-digit year is reconstructed as `20YY`.
#[derive(Clone, Debug)]
pub struct CardExpiration {
    month: CardExpirationMonth,
    year: CardExpirationYear,
}

impl CardExpiration {
    pub fn new(year: &str, month: &str) -> error_stack::Result<Self, CardError> {
        let year = parse_component(year, 2).ok_or(CardError::InvalidExpirationYear)?;
        let month = parse_component(month, 2).ok_or(CardError::InvalidExpirationMonth)?;

        let year = CardExpirationYear::new(year)?;
        let month = CardExpirationMonth::new(month)?;

        let month_number = Month::try_from(*month.0.peek())
            .change_context(CardError::InvalidExpirationMonth)?;
        let first_of_month =
            Date::from_calendar_date(2000 + i32::from(*year.0.peek()), month_number, 1)
                .change_context(CardError::InvalidExpirationMonth)?;

        if first_of_month <= OffsetDateTime::now_utc().date() {
            return Err(report!(CardError::ExpirationInPast));
        }

        Ok(Self { month, year })
    }

    /// The `YYMM` wire form expected by the gateway.
    pub fn yymm(&self) -> String {
        format!("{}{}", self.year.two_digits(), self.month.two_digits())
    }

    pub fn month(&self) -> &CardExpirationMonth {
        &self.month
    }

    pub fn year(&self) -> &CardExpirationYear {
        &self.year
    }
}

fn parse_component(value: &str, max_digits: usize) -> Option<u8> {
    let value = value.trim();
    if value.is_empty()
        || value.len() > max_digits
        || !value.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    value.parse().ok()
}

/// Card verification value, kept as a string so leading zeros survive.
#[derive(Clone, Debug)]
pub struct CardSecurityCode(StrongSecret<String>);

impl CardSecurityCode {
    pub fn new(csc: &str) -> error_stack::Result<Self, CardError> {
        if !csc.chars().all(|c| c.is_ascii_digit()) {
            return Err(report!(CardError::NonNumericSecurityCode));
        }

        if !(3..=4).contains(&csc.len()) {
            return Err(report!(CardError::InvalidSecurityCodeLength));
        }

        Ok(Self(StrongSecret::new(csc.to_owned())))
    }
}

/// Cardholder name; anything other than letters and spaces is rejected
/// rather than stripped.
#[derive(Clone, Debug)]
pub struct CardHolderName(Secret<String>);

impl CardHolderName {
    pub fn new(name: &str) -> error_stack::Result<Self, CardError> {
        static HOLDER_NAME: LazyLock<Option<Regex>> =
            LazyLock::new(|| Regex::new(r"^[a-zA-Z ]*$").ok());

        match HOLDER_NAME.as_ref() {
            Some(pattern) if pattern.is_match(name) => {
                Ok(Self(Secret::new(name.to_owned())))
            }
            _ => Err(report!(CardError::InvalidHolderName)),
        }
    }
}

impl PeekInterface<String> for CardSecurityCode {
    fn peek(&self) -> &String {
        self.0.peek()
    }
}

impl PeekInterface<String> for CardHolderName {
    fn peek(&self) -> &String {
        self.0.peek()
    }
}
