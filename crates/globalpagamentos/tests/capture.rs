#![allow(clippy::unwrap_used)]

mod common;

use common::{test_gateway, APPROVED_REPLY};
use globalpagamentos::{OperationError, Order, Payment};

#[test]
fn capture_body_matches_the_gateway_contract() {
    let (gateway, calls) = test_gateway(&[APPROVED_REPLY]);
    let mut payment = Payment::new(Order::new("123test", 1.0), None, "SDK Test");

    gateway.capture(&mut payment).unwrap();

    let calls = calls.borrow();
    assert_eq!(calls[0].action, "trataPeticion");
    assert!(!calls[0].v2);
    assert_eq!(
        calls[0].body,
        "<DATOSENTRADA>\
         <DS_MERCHANT_AMOUNT>100</DS_MERCHANT_AMOUNT>\
         <DS_MERCHANT_ORDER>123test</DS_MERCHANT_ORDER>\
         <DS_MERCHANT_MERCHANTCODE>123</DS_MERCHANT_MERCHANTCODE>\
         <DS_MERCHANT_TERMINAL>123</DS_MERCHANT_TERMINAL>\
         <DS_MERCHANT_CURRENCY>986</DS_MERCHANT_CURRENCY>\
         <DS_MERCHANT_TRANSACTIONTYPE>2</DS_MERCHANT_TRANSACTIONTYPE>\
         <DS_MERCHANT_MERCHANTDESCRIPTOR>SDK Test</DS_MERCHANT_MERCHANTDESCRIPTOR>\
         <DS_MERCHANT_MERCHANTSIGNATURE>08337a239102563bc253d8dd8a60799677d989a17e933486fb97201fa6b2792a</DS_MERCHANT_MERCHANTSIGNATURE>\
         </DATOSENTRADA>"
    );
}

#[test]
fn capture_keeps_the_descriptor_field_when_empty() {
    let (gateway, calls) = test_gateway(&[APPROVED_REPLY]);
    let mut payment = Payment::new(Order::new("123test", 1.0), None, "");

    gateway.capture(&mut payment).unwrap();

    assert!(calls.borrow()[0]
        .body
        .contains("<DS_MERCHANT_MERCHANTDESCRIPTOR></DS_MERCHANT_MERCHANTDESCRIPTOR>"));
}

#[test]
fn gateway_declines_carry_the_result_code() {
    let reply = "<RETORNOXML><CODIGO>SIS0062</CODIGO></RETORNOXML>";
    let (gateway, _calls) = test_gateway(&[reply]);
    let mut payment = Payment::new(Order::new("123test", 1.0), None, "");

    let error = gateway.capture(&mut payment).unwrap_err();
    assert_eq!(
        error.current_context(),
        &OperationError::Gateway {
            code: "SIS0062".to_owned()
        }
    );
    assert_eq!(
        error.current_context().to_string(),
        "GlobalPagamentos returned the error SIS0062."
    );
}
