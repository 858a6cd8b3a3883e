//! Gateway environment: endpoint routing, the transport boundary and the
//! four public operations.

use std::fmt;

use error_stack::ResultExt;

use crate::{
    errors::{CustomResult, OperationError, TransportError},
    requests::{self, AuthorizeOptions, Operation, Service, SignedRequest},
    response,
    types::{Merchant, Payment},
};

/// Transaction web-service namespace.
pub const WS_NAMESPACE: &str = "http://webservice.sis.sermepa.es";

/// Consultation web-service namespace.
pub const WS_CONSULT_NAMESPACE: &str = "http://webservices.apl02.redsys.es";

const PRODUCTION_ENDPOINT: &str = "https://sisw.redsys.es/sis/services/SerClsWSEntradaV2";
const TEST_ENDPOINT: &str = "https://sis-t.redsys.es:25443/sis/services/SerClsWSEntradaV2";
const PRODUCTION_CONSULT_ENDPOINT: &str =
    "https://sisw.globalpaybrasil.com.br/apl02/services/SerClsWSConsulta";
const TEST_CONSULT_ENDPOINT: &str =
    "https://sis-t.redsys.es:25443/apl02/services/SerClsWSConsulta";

/// One routed gateway call, handed to the [`Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoapCall<'a> {
    /// SOAP action and message element name.
    pub action: &'a str,
    /// The body fragment to place as CDATA under the namespaced element.
    pub body: &'a str,
    pub endpoint: &'a str,
    pub namespace: &'a str,
    pub service: Service,
    /// Whether the reply unwraps from the v2 return element.
    pub v2: bool,
    /// Value for the `User-Agent` header.
    pub user_agent: &'a str,
}

/// The transport collaborator.
///
/// Implementations wrap `call.body` in a SOAP envelope (CDATA payload under
/// the namespaced data element), post it to `call.endpoint` over TLS 1.2+
/// with `SOAPAction: call.action`, `Accept: text/xml` and
/// `Content-Type: text/xml; charset=utf-8`, then unwrap the single inner
/// return element and hand its textual content back. The call is a scoped
/// resource: one send per operation, no reuse mandated.
pub trait Transport {
    fn send(&self, call: &SoapCall<'_>) -> CustomResult<String, TransportError>;
}

/// Observer for the raw request/response documents of each call.
///
/// The core never logs XML on its own; registering an observer is the only
/// way to see the documents on the wire.
pub trait MessageObserver {
    fn outgoing(&self, body: &str);
    fn incoming(&self, body: &str);
}

/// A gateway environment: merchant credentials bound to one endpoint pair
/// (production or test), dispatching over an injected [`Transport`].
pub struct SoapEnvironment {
    merchant: Merchant,
    production: bool,
    transport: Box<dyn Transport>,
    observer: Option<Box<dyn MessageObserver>>,
}

impl fmt::Debug for SoapEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoapEnvironment")
            .field("merchant_code", &self.merchant.merchant_code())
            .field("production", &self.production)
            .finish_non_exhaustive()
    }
}

impl SoapEnvironment {
    pub fn new(merchant: Merchant, production: bool, transport: Box<dyn Transport>) -> Self {
        Self {
            merchant,
            production,
            transport,
            observer: None,
        }
    }

    pub fn production(merchant: Merchant, transport: Box<dyn Transport>) -> Self {
        Self::new(merchant, true, transport)
    }

    pub fn test(merchant: Merchant, transport: Box<dyn Transport>) -> Self {
        Self::new(merchant, false, transport)
    }

    /// Registers an observer receiving each call's raw documents.
    pub fn set_observer(&mut self, observer: Box<dyn MessageObserver>) {
        self.observer = Some(observer);
    }

    pub fn merchant(&self) -> &Merchant {
        &self.merchant
    }

    pub fn is_production(&self) -> bool {
        self.production
    }

    /// Agent string sent with every call and replayed to the 3-D Secure
    /// access-control server during challenges.
    pub fn user_agent(&self) -> String {
        format!(
            "GlobalPagamentos SOAP SDK {} (rust; {} {})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
    }

    /// Authorizes a payment, optionally capturing immediately, flagging it
    /// as recurring, or asking the gateway to tokenize the card.
    pub fn authorize(
        &self,
        payment: &mut Payment,
        options: AuthorizeOptions,
    ) -> CustomResult<(), OperationError> {
        let reply = self.dispatch(Operation::Authorize(options), payment)?;
        response::parse_transaction(&reply, payment)
    }

    /// Confirms a previously authorized payment.
    pub fn capture(&self, payment: &mut Payment) -> CustomResult<(), OperationError> {
        let reply = self.dispatch(Operation::Capture, payment)?;
        response::parse_transaction(&reply, payment)
    }

    /// Cancels a payment; set `pre_authorization` to release an uncaptured
    /// authorization instead of refunding a settled one.
    pub fn cancel(
        &self,
        payment: &mut Payment,
        pre_authorization: bool,
    ) -> CustomResult<(), OperationError> {
        let reply = self.dispatch(Operation::Cancel { pre_authorization }, payment)?;
        response::parse_transaction(&reply, payment)
    }

    /// Looks the payment's order up on the consultation sub-service.
    pub fn consult(&self, payment: &mut Payment) -> CustomResult<(), OperationError> {
        let reply = self.dispatch(Operation::Consult, payment)?;
        response::parse_consult(&reply, payment)
    }

    fn dispatch(
        &self,
        operation: Operation,
        payment: &Payment,
    ) -> CustomResult<String, OperationError> {
        let user_agent = self.user_agent();
        let request = requests::build(operation, &self.merchant, payment, &user_agent)?;
        let (endpoint, namespace) = self.route(request.service);

        tracing::debug!(
            action = request.action,
            order = payment.order().number(),
            endpoint,
            "dispatching gateway call"
        );

        if let Some(observer) = &self.observer {
            observer.outgoing(&request.body);
        }

        let reply = self
            .transport
            .send(&self.call(&request, endpoint, namespace, &user_agent))
            .change_context(OperationError::Transport)?;

        if let Some(observer) = &self.observer {
            observer.incoming(&reply);
        }

        Ok(reply)
    }

    fn call<'a>(
        &self,
        request: &'a SignedRequest,
        endpoint: &'a str,
        namespace: &'a str,
        user_agent: &'a str,
    ) -> SoapCall<'a> {
        SoapCall {
            action: request.action,
            body: &request.body,
            endpoint,
            namespace,
            service: request.service,
            v2: request.v2,
            user_agent,
        }
    }

    fn route(&self, service: Service) -> (&'static str, &'static str) {
        match (service, self.production) {
            (Service::Transaction, true) => (PRODUCTION_ENDPOINT, WS_NAMESPACE),
            (Service::Transaction, false) => (TEST_ENDPOINT, WS_NAMESPACE),
            (Service::Consultation, true) => {
                (PRODUCTION_CONSULT_ENDPOINT, WS_CONSULT_NAMESPACE)
            }
            (Service::Consultation, false) => (TEST_CONSULT_ENDPOINT, WS_CONSULT_NAMESPACE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoTransport;

    impl Transport for NoTransport {
        fn send(&self, _call: &SoapCall<'_>) -> CustomResult<String, TransportError> {
            Err(error_stack::report!(TransportError::ConnectionFailed))
        }
    }

    fn merchant() -> Merchant {
        Merchant::new("key", "code", "7")
    }

    #[test]
    fn identity_accessors() {
        let environment = SoapEnvironment::test(merchant(), Box::new(NoTransport));

        assert!(!environment.is_production());
        assert_eq!(environment.merchant().merchant_code(), "code");
        assert!(environment
            .user_agent()
            .starts_with("GlobalPagamentos SOAP SDK 1.0.0 (rust; "));
    }

    #[test]
    fn each_axis_selects_its_endpoint_pair() {
        let production = SoapEnvironment::production(merchant(), Box::new(NoTransport));
        assert_eq!(
            production.route(Service::Transaction),
            (PRODUCTION_ENDPOINT, WS_NAMESPACE)
        );
        assert_eq!(
            production.route(Service::Consultation),
            (PRODUCTION_CONSULT_ENDPOINT, WS_CONSULT_NAMESPACE)
        );

        let test = SoapEnvironment::test(merchant(), Box::new(NoTransport));
        assert_eq!(
            test.route(Service::Transaction),
            (TEST_ENDPOINT, WS_NAMESPACE)
        );
        assert_eq!(
            test.route(Service::Consultation),
            (TEST_CONSULT_ENDPOINT, WS_CONSULT_NAMESPACE)
        );
    }
}
