#![allow(clippy::unwrap_used)]

mod common;

use common::{mock_transport, test_gateway};
use globalpagamentos::{GlobalPagamentos, Merchant, OperationError, Order, Payment};

const TEST_CONSULT_ENDPOINT: &str =
    "https://sis-t.redsys.es:25443/apl02/services/SerClsWSConsulta";

const CONSULT_REPLY: &str = "<Messages><Version Ds_Version=\"0.0\"><Message>\
     <Response Ds_Version=\"0.0\">\
     <Ds_Order>123test</Ds_Order><Ds_Amount>100</Ds_Amount>\
     <Ds_Currency>986</Ds_Currency><Ds_Response>0000</Ds_Response>\
     <Ds_ResponseInt>0000</Ds_ResponseInt><Ds_SecurePayment>1</Ds_SecurePayment>\
     <Ds_State>F</Ds_State><Ds_TransactionType>1</Ds_TransactionType>\
     </Response></Message></Version></Messages>";

#[test]
fn consultation_routes_to_the_consultation_sub_service() {
    let (gateway, calls) = test_gateway(&[CONSULT_REPLY]);
    let mut payment = Payment::new(Order::new("123test", 1.0), None, "");

    gateway.consult(&mut payment).unwrap();

    let calls = calls.borrow();
    assert_eq!(calls[0].action, "consultaOperaciones");
    assert_eq!(calls[0].endpoint, TEST_CONSULT_ENDPOINT);
    assert_eq!(calls[0].namespace, "http://webservices.apl02.redsys.es");
    assert!(!calls[0].v2);
    assert_eq!(
        calls[0].body,
        "<Messages>\
         <Version Ds_Version=\"0.0\">\
         <Message><Monitor>\
         <Ds_MerchantCode>123</Ds_MerchantCode>\
         <Ds_Terminal>123</Ds_Terminal>\
         <Ds_Order>123test</Ds_Order>\
         </Monitor></Message>\
         </Version>\
         <Signature>f17c39d4a577e9b8c2163dc5b7e588a20d341046737d6c4f84000445e633f06c</Signature>\
         </Messages>"
    );
}

#[test]
fn short_terminals_are_zero_padded_to_three_digits() {
    let (transport, calls) = mock_transport(&[CONSULT_REPLY]);
    let gateway = GlobalPagamentos::create(Merchant::new("123", "123", "1"), false, transport);
    let mut payment = Payment::new(Order::new("123test", 1.0), None, "");

    gateway.consult(&mut payment).unwrap();

    assert!(calls.borrow()[0]
        .body
        .contains("<Ds_Terminal>001</Ds_Terminal>"));
}

#[test]
fn consultation_reply_fields_are_mapped() {
    let (gateway, _calls) = test_gateway(&[CONSULT_REPLY]);
    let mut payment = Payment::new(Order::new("other", 5.0), None, "");

    gateway.consult(&mut payment).unwrap();

    assert_eq!(payment.order().number(), "123test");
    assert_eq!(payment.order().amount().get_amount_as_i64(), 10000);
    assert_eq!(payment.response(), Some("0000"));
    assert_eq!(payment.response_int(), Some("0000"));
    assert!(payment.is_secure_payment());
    assert_eq!(payment.state(), Some("F"));
    assert_eq!(payment.transaction_type(), Some("1"));
}

#[test]
fn missing_message_node_is_a_structural_failure() {
    let reply = "<Messages><Version Ds_Version=\"0.0\"/></Messages>";
    let (gateway, _calls) = test_gateway(&[reply]);
    let mut payment = Payment::new(Order::new("123test", 1.0), None, "");

    let error = gateway.consult(&mut payment).unwrap_err();
    assert_eq!(
        error.current_context(),
        &OperationError::MissingNode { node: "Message" }
    );
}
