//! Per-operation request composition.
//!
//! Each of the four gateway operations has an independent, pure builder that
//! resolves merchant/order/card values, computes the operation's signature
//! and emits the exact field layout the gateway verifies. Dispatch happens
//! over [`Operation`]; no builder knows about the others.

pub(crate) mod authorize;
pub(crate) mod cancel;
pub(crate) mod capture;
pub(crate) mod consult;

use crate::{
    errors::{CustomResult, OperationError},
    types::{Merchant, Payment},
};

pub(crate) const TRANSACTION_ACTION: &str = "trataPeticion";
pub(crate) const TRANSACTION_V2_ACTION: &str = "iniciaPeticion";
pub(crate) const CONSULTATION_ACTION: &str = "consultaOperaciones";

/// Which gateway sub-service a call targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    Transaction,
    Consultation,
}

/// Options of an authorization call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorizeOptions {
    /// Capture immediately instead of pre-authorizing.
    pub capture: bool,
    /// Flag the transaction as part of a recurring series.
    pub recurring: bool,
    /// Ask the gateway to tokenize the presented card.
    pub tokenize: bool,
}

impl Default for AuthorizeOptions {
    fn default() -> Self {
        Self {
            capture: true,
            recurring: false,
            tokenize: false,
        }
    }
}

/// The four gateway operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Authorize(AuthorizeOptions),
    Capture,
    Cancel { pre_authorization: bool },
    Consult,
}

/// A fully composed, signed body fragment ready for the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    /// SOAP action and message element name.
    pub action: &'static str,
    /// The collapsed body fragment, byte-identical to what was signed.
    pub body: String,
    /// Whether this call follows the 3-D Secure v2 flow.
    pub v2: bool,
    pub service: Service,
}

pub(crate) fn build(
    operation: Operation,
    merchant: &Merchant,
    payment: &Payment,
    user_agent: &str,
) -> CustomResult<SignedRequest, OperationError> {
    match operation {
        Operation::Authorize(options) => authorize::build(merchant, payment, options, user_agent),
        Operation::Capture => capture::build(merchant, payment),
        Operation::Cancel { pre_authorization } => {
            cancel::build(merchant, payment, pre_authorization)
        }
        Operation::Consult => consult::build(merchant, payment),
    }
}
