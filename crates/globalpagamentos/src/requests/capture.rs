use super::{Service, SignedRequest, TRANSACTION_ACTION};
use crate::{
    errors::{CustomResult, OperationError},
    signature::sign_fields,
    types::{Merchant, Payment},
    utils::collapse_fragment,
};

/// Confirms a pre-authorization. Transaction type is the literal `2` and the
/// signature covers no card data.
pub(crate) fn build(
    merchant: &Merchant,
    payment: &Payment,
) -> CustomResult<SignedRequest, OperationError> {
    let order = payment.order();
    let amount = order.amount().to_string();
    let currency = order.currency().to_string();

    let signature = sign_fields(
        &[
            &amount,
            order.number(),
            merchant.merchant_code(),
            &currency,
            "2",
        ],
        merchant.merchant_key(),
    );

    let fragment = format!(
        r#"<DATOSENTRADA>
            <DS_MERCHANT_AMOUNT>{amount}</DS_MERCHANT_AMOUNT>
            <DS_MERCHANT_ORDER>{number}</DS_MERCHANT_ORDER>
            <DS_MERCHANT_MERCHANTCODE>{merchant_code}</DS_MERCHANT_MERCHANTCODE>
            <DS_MERCHANT_TERMINAL>{terminal}</DS_MERCHANT_TERMINAL>
            <DS_MERCHANT_CURRENCY>{currency}</DS_MERCHANT_CURRENCY>
            <DS_MERCHANT_TRANSACTIONTYPE>2</DS_MERCHANT_TRANSACTIONTYPE>
            <DS_MERCHANT_MERCHANTDESCRIPTOR>{descriptor}</DS_MERCHANT_MERCHANTDESCRIPTOR>
            <DS_MERCHANT_MERCHANTSIGNATURE>{signature}</DS_MERCHANT_MERCHANTSIGNATURE>
        </DATOSENTRADA>"#,
        number = order.number(),
        merchant_code = merchant.merchant_code(),
        terminal = merchant.terminal(),
        descriptor = payment.soft_descriptor(),
    );

    Ok(SignedRequest {
        action: TRANSACTION_ACTION,
        body: collapse_fragment(&fragment)?,
        v2: false,
        service: Service::Transaction,
    })
}
