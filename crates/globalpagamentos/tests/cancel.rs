#![allow(clippy::unwrap_used)]

mod common;

use common::{test_gateway, APPROVED_REPLY};
use globalpagamentos::{Order, Payment};

#[test]
fn cancelling_a_settled_payment_uses_type_three() {
    let (gateway, calls) = test_gateway(&[APPROVED_REPLY]);
    let mut payment = Payment::new(Order::new("123test", 1.0), None, "SDK Test");

    gateway.cancel(&mut payment).unwrap();

    let calls = calls.borrow();
    assert_eq!(calls[0].action, "trataPeticion");
    assert_eq!(
        calls[0].body,
        "<DATOSENTRADA>\
         <DS_MERCHANT_AMOUNT>100</DS_MERCHANT_AMOUNT>\
         <DS_MERCHANT_ORDER>123test</DS_MERCHANT_ORDER>\
         <DS_MERCHANT_MERCHANTCODE>123</DS_MERCHANT_MERCHANTCODE>\
         <DS_MERCHANT_TERMINAL>123</DS_MERCHANT_TERMINAL>\
         <DS_MERCHANT_CURRENCY>986</DS_MERCHANT_CURRENCY>\
         <DS_MERCHANT_TRANSACTIONTYPE>3</DS_MERCHANT_TRANSACTIONTYPE>\
         <DS_MERCHANT_MERCHANTDESCRIPTOR>SDK Test</DS_MERCHANT_MERCHANTDESCRIPTOR>\
         <DS_MERCHANT_MERCHANTSIGNATURE>f25f823c4039a1eef4acca4dc593e317a751819ca2bf4c389ece2016e694d908</DS_MERCHANT_MERCHANTSIGNATURE>\
         </DATOSENTRADA>"
    );
}

#[test]
fn voiding_a_pre_authorization_uses_type_nine() {
    let (gateway, calls) = test_gateway(&[APPROVED_REPLY]);
    let mut payment = Payment::new(Order::new("123test", 1.0), None, "");

    gateway.void(&mut payment).unwrap();

    let body = &calls.borrow()[0].body;
    assert!(body.contains("<DS_MERCHANT_TRANSACTIONTYPE>9</DS_MERCHANT_TRANSACTIONTYPE>"));
    assert!(body.contains(
        "<DS_MERCHANT_MERCHANTSIGNATURE>3ca591df873ab2bad361c898bd85f2da873ae8f78505e0f3dc1e0f59fd02f2a0</DS_MERCHANT_MERCHANTSIGNATURE>"
    ));
}
