#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use error_stack::report;
use globalpagamentos::{
    Card, CustomResult, GlobalPagamentos, Merchant, Order, Payment, SoapCall, Transport,
    TransportError,
};

/// One call as the transport saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub action: String,
    pub body: String,
    pub endpoint: String,
    pub namespace: String,
    pub v2: bool,
}

pub type CallLog = Rc<RefCell<Vec<RecordedCall>>>;

/// In-memory transport: records every call and pops canned replies in order.
/// Once the replies run out it fails like a dead connection.
pub struct MockTransport {
    replies: RefCell<VecDeque<String>>,
    calls: CallLog,
}

impl Transport for MockTransport {
    fn send(&self, call: &SoapCall<'_>) -> CustomResult<String, TransportError> {
        self.calls.borrow_mut().push(RecordedCall {
            action: call.action.to_owned(),
            body: call.body.to_owned(),
            endpoint: call.endpoint.to_owned(),
            namespace: call.namespace.to_owned(),
            v2: call.v2,
        });

        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| report!(TransportError::ConnectionFailed))
    }
}

pub fn mock_transport(replies: &[&str]) -> (Box<dyn Transport>, CallLog) {
    let calls: CallLog = Rc::new(RefCell::new(Vec::new()));
    let transport = MockTransport {
        replies: RefCell::new(replies.iter().map(|reply| (*reply).to_owned()).collect()),
        calls: Rc::clone(&calls),
    };
    (Box::new(transport), calls)
}

/// Test-environment client around a mock transport.
pub fn test_gateway(replies: &[&str]) -> (GlobalPagamentos, CallLog) {
    let (transport, calls) = mock_transport(replies);
    (
        GlobalPagamentos::create(test_merchant(), false, transport),
        calls,
    )
}

pub fn test_merchant() -> Merchant {
    Merchant::new("123", "123", "123")
}

#[allow(clippy::unwrap_used)]
pub fn credit_card() -> Card {
    Card::credit("4548812049400004", "34", "12", "Fulano de tal", "626").unwrap()
}

pub fn test_payment() -> Payment {
    Payment::new(Order::new("123test", 1.0), Some(credit_card()), "")
}

/// Minimal approving transaction reply.
pub const APPROVED_REPLY: &str = "<RETORNOXML><CODIGO>0</CODIGO><OPERACION>\
     <Ds_Response>0000</Ds_Response></OPERACION></RETORNOXML>";
