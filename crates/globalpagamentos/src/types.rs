//! Domain model shared by the request builders and the response parser.

use std::fmt;

use error_stack::report;
use masking::Secret;
use serde::{Deserialize, Serialize};

use crate::{
    card::Card,
    errors::{CustomResult, ValidationError},
};

/// Amount in minor currency units, the only form the gateway accepts.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// Converts a major-unit amount to minor units: multiply by 100, round
    /// half away from zero at two decimals, truncate. The gateway recomputes
    /// the request signature over this value, so the conversion must match
    /// it digit for digit.
    #[allow(clippy::as_conversions)]
    pub fn from_major(amount: f64) -> Self {
        let cents = (amount * 100.0 * 100.0).round() / 100.0;
        Self(cents as i64)
    }

    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MinorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Currencies the gateway settles in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum Currency {
    Brl,
}

impl Currency {
    pub const fn iso_numeric(self) -> u16 {
        match self {
            Self::Brl => 986,
        }
    }

    pub fn from_iso_numeric(code: u16) -> CustomResult<Self, ValidationError> {
        match code {
            986 => Ok(Self::Brl),
            _ => Err(report!(ValidationError::InvalidCurrency)),
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Brl
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iso_numeric().fmt(f)
    }
}

/// Merchant credentials: the shared signing key, the merchant code and the
/// terminal number assigned by the gateway.
#[derive(Clone, Debug)]
pub struct Merchant {
    merchant_key: Secret<String>,
    merchant_code: String,
    terminal: String,
}

impl Merchant {
    pub fn new(
        merchant_key: impl Into<String>,
        merchant_code: impl Into<String>,
        terminal: &str,
    ) -> Self {
        Self {
            merchant_key: Secret::new(merchant_key.into()),
            merchant_code: merchant_code.into(),
            terminal: normalize_terminal(terminal),
        }
    }

    pub fn merchant_key(&self) -> &Secret<String> {
        &self.merchant_key
    }

    pub fn merchant_code(&self) -> &str {
        &self.merchant_code
    }

    /// The terminal in its normalized decimal form.
    pub fn terminal(&self) -> &str {
        &self.terminal
    }
}

/// Decimal-prefix normalization of the terminal number: leading digits kept,
/// leading zeros dropped, anything else becomes `0`.
fn normalize_terminal(terminal: &str) -> String {
    let digits: String = terminal
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let digits = digits.trim_start_matches('0');

    if digits.is_empty() {
        "0".to_owned()
    } else {
        digits.to_owned()
    }
}

/// One order as the gateway sees it: number, minor-unit amount, currency.
#[derive(Clone, Debug)]
pub struct Order {
    number: String,
    amount: MinorUnit,
    currency: Currency,
    description: String,
}

impl Order {
    /// Creates an order in the default currency.
    pub fn new(number: impl Into<String>, amount: f64) -> Self {
        Self {
            number: number.into(),
            amount: MinorUnit::from_major(amount),
            currency: Currency::default(),
            description: String::new(),
        }
    }

    /// Creates an order with an explicit ISO 4217 numeric currency code,
    /// failing immediately when the code is not supported.
    pub fn with_currency(
        number: impl Into<String>,
        amount: f64,
        currency_code: u16,
    ) -> CustomResult<Self, ValidationError> {
        let mut order = Self::new(number, amount);
        order.set_currency(currency_code)?;
        Ok(order)
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn amount(&self) -> MinorUnit {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_number(&mut self, number: impl Into<String>) {
        self.number = number.into();
    }

    /// Replaces the amount, reapplying the major-to-minor conversion.
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = MinorUnit::from_major(amount);
    }

    pub fn set_currency(&mut self, currency_code: u16) -> CustomResult<(), ValidationError> {
        self.currency = Currency::from_iso_numeric(currency_code)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
}

/// The mutable transaction aggregate. Callers populate the outbound half
/// (order, card, descriptor, installments); the response parser fills in the
/// rest. One instance must not be shared across in-flight operations.
#[derive(Clone, Debug)]
pub struct Payment {
    order: Order,
    card: Option<Card>,
    soft_descriptor: String,
    installments: u32,
    secure_payment: bool,
    authentication_url: Option<String>,
    authorization_code: Option<String>,
    language: Option<String>,
    nsu: Option<String>,
    processed_pay_method: Option<String>,
    response: Option<String>,
    response_int: Option<String>,
    pa_request: Option<String>,
    md: Option<String>,
    merchant_data: Option<String>,
    state: Option<String>,
    transaction_type: Option<String>,
}

impl Payment {
    pub fn new(order: Order, card: Option<Card>, soft_descriptor: impl Into<String>) -> Self {
        Self {
            order,
            card,
            soft_descriptor: soft_descriptor.into(),
            installments: 1,
            secure_payment: false,
            authentication_url: None,
            authorization_code: None,
            language: None,
            nsu: None,
            processed_pay_method: None,
            response: None,
            response_int: None,
            pa_request: None,
            md: None,
            merchant_data: None,
            state: None,
            transaction_type: None,
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn order_mut(&mut self) -> &mut Order {
        &mut self.order
    }

    /// The card attached to this payment, if any. Reading never mutates the
    /// payment; operations on a card-less payment behave as if an empty card
    /// were attached.
    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn set_card(&mut self, card: Card) {
        self.card = Some(card);
    }

    pub(crate) fn card_mut_or_default(&mut self) -> &mut Card {
        self.card.get_or_insert_with(Card::default)
    }

    pub fn soft_descriptor(&self) -> &str {
        &self.soft_descriptor
    }

    pub fn set_soft_descriptor(&mut self, soft_descriptor: impl Into<String>) {
        self.soft_descriptor = soft_descriptor.into();
    }

    pub fn installments(&self) -> u32 {
        self.installments
    }

    pub fn set_installments(&mut self, installments: u32) {
        self.installments = installments;
    }

    pub fn is_secure_payment(&self) -> bool {
        self.secure_payment
    }

    pub fn authentication_url(&self) -> Option<&str> {
        self.authentication_url.as_deref()
    }

    pub fn authorization_code(&self) -> Option<&str> {
        self.authorization_code.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Gateway-issued transaction sequence reference.
    pub fn nsu(&self) -> Option<&str> {
        self.nsu.as_deref()
    }

    pub fn processed_pay_method(&self) -> Option<&str> {
        self.processed_pay_method.as_deref()
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn response_int(&self) -> Option<&str> {
        self.response_int.as_deref()
    }

    pub fn pa_request(&self) -> Option<&str> {
        self.pa_request.as_deref()
    }

    pub fn md(&self) -> Option<&str> {
        self.md.as_deref()
    }

    pub fn merchant_data(&self) -> Option<&str> {
        self.merchant_data.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn transaction_type(&self) -> Option<&str> {
        self.transaction_type.as_deref()
    }

    pub(crate) fn set_secure_payment(&mut self, secure_payment: bool) {
        self.secure_payment = secure_payment;
    }

    pub(crate) fn set_authentication_url(&mut self, url: impl Into<String>) {
        self.authentication_url = Some(url.into());
    }

    pub(crate) fn set_authorization_code(&mut self, code: impl Into<String>) {
        self.authorization_code = Some(code.into());
    }

    pub(crate) fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    pub(crate) fn set_nsu(&mut self, nsu: impl Into<String>) {
        self.nsu = Some(nsu.into());
    }

    pub(crate) fn set_processed_pay_method(&mut self, method: impl Into<String>) {
        self.processed_pay_method = Some(method.into());
    }

    pub(crate) fn set_response(&mut self, response: impl Into<String>) {
        self.response = Some(response.into());
    }

    pub(crate) fn set_response_int(&mut self, response_int: impl Into<String>) {
        self.response_int = Some(response_int.into());
    }

    pub(crate) fn set_pa_request(&mut self, pa_request: impl Into<String>) {
        self.pa_request = Some(pa_request.into());
    }

    pub(crate) fn set_md(&mut self, md: impl Into<String>) {
        self.md = Some(md.into());
    }

    pub(crate) fn set_merchant_data(&mut self, merchant_data: impl Into<String>) {
        self.merchant_data = Some(merchant_data.into());
    }

    pub(crate) fn set_state(&mut self, state: impl Into<String>) {
        self.state = Some(state.into());
    }

    pub(crate) fn set_transaction_type(&mut self, transaction_type: impl Into<String>) {
        self.transaction_type = Some(transaction_type.into());
    }
}
