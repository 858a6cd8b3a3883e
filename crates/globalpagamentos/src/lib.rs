//! Client for the GlobalPagamentos card-payment SOAP gateway.
//!
//! The gateway speaks the Redsys `DS_MERCHANT_*` protocol family: every
//! transaction request carries a SHA-256 signature computed over an exact,
//! delimiter-free concatenation of its fields, and the gateway recomputes
//! that signature before accepting the call. This crate owns the whole
//! client side of that contract: domain validation, per-operation request
//! composition and signing (including both 3-D Secure generations), and
//! parsing of the nested XML responses back into the [`Payment`] aggregate.
//!
//! The raw HTTP/SOAP layer is supplied by the caller through the
//! [`Transport`] trait; see [`environment`] for the envelope contract.
//!
//! ```no_run
//! use globalpagamentos::{Card, GlobalPagamentos, Merchant, Order, Payment};
//! # fn transport() -> Box<dyn globalpagamentos::Transport> { unimplemented!() }
//!
//! let gateway = GlobalPagamentos::create(
//!     Merchant::new("qwertyasdf0123456789", "012005541349001", "1"),
//!     false,
//!     transport(),
//! );
//!
//! let card = Card::credit("4548812049400004", "34", "12", "Fulano de tal", "626")
//!     .expect("valid card data");
//! let mut payment = Payment::new(Order::new("123test", 624.80), Some(card), "MY STORE");
//!
//! gateway.authorize(&mut payment, true).expect("gateway approval");
//! assert_eq!(payment.response(), Some("0000"));
//! ```

pub mod card;
pub mod environment;
pub mod errors;
pub mod requests;
mod response;
mod signature;
pub mod types;
mod utils;

pub use cards;

pub use crate::{
    card::{AccountType, Card, ThreeDSecureVersion},
    environment::{
        MessageObserver, SoapCall, SoapEnvironment, Transport, WS_CONSULT_NAMESPACE,
        WS_NAMESPACE,
    },
    errors::{CustomResult, OperationError, TransportError, ValidationError},
    requests::{AuthorizeOptions, Operation, Service, SignedRequest},
    types::{Currency, Merchant, MinorUnit, Order, Payment},
};

/// Entry point of the SDK: a thin facade over [`SoapEnvironment`] exposing
/// one method per gateway operation.
#[derive(Debug)]
pub struct GlobalPagamentos {
    environment: SoapEnvironment,
}

impl GlobalPagamentos {
    pub fn new(environment: SoapEnvironment) -> Self {
        Self { environment }
    }

    /// Creates a client for the production or test endpoint pair.
    pub fn create(merchant: Merchant, production: bool, transport: Box<dyn Transport>) -> Self {
        Self::new(SoapEnvironment::new(merchant, production, transport))
    }

    pub fn environment(&self) -> &SoapEnvironment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut SoapEnvironment {
        &mut self.environment
    }

    /// Authorizes a payment; `capture` settles it immediately, otherwise a
    /// pre-authorization is left for a later [`Self::capture`].
    pub fn authorize(
        &self,
        payment: &mut Payment,
        capture: bool,
    ) -> CustomResult<(), OperationError> {
        self.environment.authorize(
            payment,
            AuthorizeOptions {
                capture,
                ..AuthorizeOptions::default()
            },
        )
    }

    /// Authorizes and asks the gateway to tokenize the presented card; on
    /// success the token lands in the payment card's identifier.
    pub fn tokenize(
        &self,
        payment: &mut Payment,
        capture: bool,
    ) -> CustomResult<(), OperationError> {
        self.environment.authorize(
            payment,
            AuthorizeOptions {
                capture,
                tokenize: true,
                ..AuthorizeOptions::default()
            },
        )
    }

    /// Authorizes a payment belonging to a recurring series.
    pub fn recurring(&self, payment: &mut Payment) -> CustomResult<(), OperationError> {
        self.environment.authorize(
            payment,
            AuthorizeOptions {
                recurring: true,
                ..AuthorizeOptions::default()
            },
        )
    }

    /// Card-verification transaction: authorizes a copy of the payment with
    /// the amount forced to zero and returns the enriched copy, leaving the
    /// original untouched.
    pub fn zero_amount(&self, payment: &Payment) -> CustomResult<Payment, OperationError> {
        let mut verification = payment.clone();
        verification.order_mut().set_amount(0.0);
        self.environment
            .authorize(&mut verification, AuthorizeOptions::default())?;
        Ok(verification)
    }

    /// Confirms a previously authorized payment.
    pub fn capture(&self, payment: &mut Payment) -> CustomResult<(), OperationError> {
        self.environment.capture(payment)
    }

    /// Cancels a settled payment.
    pub fn cancel(&self, payment: &mut Payment) -> CustomResult<(), OperationError> {
        self.environment.cancel(payment, false)
    }

    /// Releases an uncaptured pre-authorization.
    pub fn void(&self, payment: &mut Payment) -> CustomResult<(), OperationError> {
        self.environment.cancel(payment, true)
    }

    /// Looks the payment's order up on the consultation sub-service.
    pub fn consult(&self, payment: &mut Payment) -> CustomResult<(), OperationError> {
        self.environment.consult(payment)
    }
}
