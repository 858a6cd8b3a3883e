use super::{
    AuthorizeOptions, Service, SignedRequest, TRANSACTION_ACTION, TRANSACTION_V2_ACTION,
};
use crate::{
    card::Card,
    errors::{CustomResult, OperationError},
    signature::sign_fields,
    types::{Merchant, Payment},
    utils::collapse_fragment,
};

const ACCEPT_HEADER: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// 3-D Secure v2 card-data marker embedded verbatim in the request.
const EMV3DS_CARD_DATA: &str = "{'threeDSInfo':'CardData'}";

pub(crate) fn build(
    merchant: &Merchant,
    payment: &Payment,
    options: AuthorizeOptions,
    user_agent: &str,
) -> CustomResult<SignedRequest, OperationError> {
    let fallback = Card::default();
    let card = payment.card().unwrap_or(&fallback);

    if card.uses_emv_v2() {
        build_emv_v2(merchant, payment, card)
    } else {
        build_classic(merchant, payment, card, options, user_agent)
    }
}

fn build_classic(
    merchant: &Merchant,
    payment: &Payment,
    card: &Card,
    options: AuthorizeOptions,
    user_agent: &str,
) -> CustomResult<SignedRequest, OperationError> {
    let order = payment.order();
    let amount = order.amount().to_string();
    let currency = order.currency().to_string();

    // 3-D Secure forces type 0; otherwise A captures immediately and 1
    // leaves a pre-authorization behind.
    let transaction_type = if card.is_three_d_secure() {
        "0"
    } else if options.capture {
        "A"
    } else {
        "1"
    };

    let pan = card.pan_string().unwrap_or_default();
    let cvv = card.security_code_string().unwrap_or_default();
    let identifier = card.identifier().unwrap_or_default();

    let signature = if options.tokenize {
        sign_fields(
            &[
                &amount,
                order.number(),
                merchant.merchant_code(),
                &currency,
                &pan,
                &cvv,
                transaction_type,
                "REQUIRED",
            ],
            merchant.merchant_key(),
        )
    } else if pan.is_empty() {
        sign_fields(
            &[
                &amount,
                order.number(),
                merchant.merchant_code(),
                &currency,
                transaction_type,
                identifier,
            ],
            merchant.merchant_key(),
        )
    } else {
        sign_fields(
            &[
                &amount,
                order.number(),
                merchant.merchant_code(),
                &currency,
                &pan,
                &cvv,
                transaction_type,
            ],
            merchant.merchant_key(),
        )
    };

    let card_fields = if pan.is_empty() {
        format!("<DS_MERCHANT_IDENTIFIER>{identifier}</DS_MERCHANT_IDENTIFIER>")
    } else {
        format!(
            "<DS_MERCHANT_PAN>{pan}</DS_MERCHANT_PAN>\n\
             <DS_MERCHANT_EXPIRYDATE>{expiration}</DS_MERCHANT_EXPIRYDATE>\n\
             <DS_MERCHANT_CVV2>{cvv}</DS_MERCHANT_CVV2>",
            expiration = card.expiration_yymm().unwrap_or_default(),
        )
    };

    let plan_type = if payment.installments() > 1 { "02" } else { "01" };

    let tokenize_marker = if options.tokenize {
        "<DS_MERCHANT_IDENTIFIER>REQUIRED</DS_MERCHANT_IDENTIFIER>"
    } else {
        ""
    };

    let recurring_marker = if options.recurring {
        "\n<DS_MERCHANT_RECURRINGPAYMENT>Y</DS_MERCHANT_RECURRINGPAYMENT>"
    } else {
        ""
    };

    let descriptor = if payment.soft_descriptor().is_empty() {
        String::new()
    } else {
        format!(
            "<DS_MERCHANT_MERCHANTDESCRIPTOR>{}</DS_MERCHANT_MERCHANTDESCRIPTOR>",
            payment.soft_descriptor(),
        )
    };

    // The challenge flow needs the browser accept header and an agent
    // string; the gateway replays both to the access-control server.
    let challenge_fields = if card.is_three_d_secure() {
        format!(
            "<DS_MERCHANT_ACCEPTHEADER>{ACCEPT_HEADER}</DS_MERCHANT_ACCEPTHEADER>\n\
             <DS_MERCHANT_USERAGENT>{user_agent}</DS_MERCHANT_USERAGENT>",
        )
    } else {
        String::new()
    };

    let fragment = format!(
        r#"<DATOSENTRADA>
            <DS_MERCHANT_AMOUNT>{amount}</DS_MERCHANT_AMOUNT>
            <DS_MERCHANT_ORDER>{number}</DS_MERCHANT_ORDER>
            <DS_MERCHANT_MERCHANTCODE>{merchant_code}</DS_MERCHANT_MERCHANTCODE>
            <DS_MERCHANT_TERMINAL>{terminal}</DS_MERCHANT_TERMINAL>
            <DS_MERCHANT_CURRENCY>{currency}</DS_MERCHANT_CURRENCY>
            {card_fields}
            <DS_MERCHANT_TRANSACTIONTYPE>{transaction_type}</DS_MERCHANT_TRANSACTIONTYPE>
            <DS_MERCHANT_ACCOUNTTYPE>{account_type}</DS_MERCHANT_ACCOUNTTYPE>
            <DS_MERCHANT_PLANTYPE>{plan_type}</DS_MERCHANT_PLANTYPE>
            <DS_MERCHANT_PLANINSTALLMENTSNUMBER>{installments}</DS_MERCHANT_PLANINSTALLMENTSNUMBER>
            {tokenize_marker}
            <DS_MERCHANT_MERCHANTSIGNATURE>{signature}</DS_MERCHANT_MERCHANTSIGNATURE>{recurring_marker}{descriptor}{challenge_fields}
        </DATOSENTRADA>"#,
        number = order.number(),
        merchant_code = merchant.merchant_code(),
        terminal = merchant.terminal(),
        account_type = card.account_type().two_digits(),
        installments = payment.installments(),
    );

    Ok(SignedRequest {
        action: TRANSACTION_ACTION,
        body: collapse_fragment(&fragment)?,
        v2: false,
        service: Service::Transaction,
    })
}

/// The v2 flow signs the whole collapsed body rather than a field subset,
/// and emits the hash under its own field names.
fn build_emv_v2(
    merchant: &Merchant,
    payment: &Payment,
    card: &Card,
) -> CustomResult<SignedRequest, OperationError> {
    let order = payment.order();

    let dato_entrada = collapse_fragment(&format!(
        r#"<DATOSENTRADA>
            <DS_MERCHANT_AMOUNT>{amount}</DS_MERCHANT_AMOUNT>
            <DS_MERCHANT_ORDER>{number}</DS_MERCHANT_ORDER>
            <DS_MERCHANT_MERCHANTCODE>{merchant_code}</DS_MERCHANT_MERCHANTCODE>
            <DS_MERCHANT_CURRENCY>{currency}</DS_MERCHANT_CURRENCY>
            <DS_MERCHANT_PAN>{pan}</DS_MERCHANT_PAN>
            <DS_MERCHANT_EXPIRYDATE>{expiration}</DS_MERCHANT_EXPIRYDATE>
            <DS_MERCHANT_CVV2>{cvv}</DS_MERCHANT_CVV2>
            <DS_MERCHANT_TRANSACTIONTYPE>0</DS_MERCHANT_TRANSACTIONTYPE>
            <DS_MERCHANT_TERMINAL>{terminal}</DS_MERCHANT_TERMINAL>
            <DS_MERCHANT_ACCOUNTTYPE>02</DS_MERCHANT_ACCOUNTTYPE>
            <DS_MERCHANT_PLANTYPE>1</DS_MERCHANT_PLANTYPE>
            <DS_MERCHANT_EMV3DS>{emv3ds}</DS_MERCHANT_EMV3DS>
        </DATOSENTRADA>"#,
        amount = order.amount(),
        number = order.number(),
        merchant_code = merchant.merchant_code(),
        currency = order.currency(),
        pan = card.pan_string().unwrap_or_default(),
        expiration = card.expiration_yymm().unwrap_or_default(),
        cvv = card.security_code_string().unwrap_or_default(),
        terminal = merchant.terminal(),
        emv3ds = EMV3DS_CARD_DATA,
    ))?;

    let signature = sign_fields(&[&dato_entrada], merchant.merchant_key());

    let body = format!(
        "<REQUEST>{dato_entrada}\
         <DS_SIGNATURE>{signature}</DS_SIGNATURE>\
         <DS_SIGNATUREVERSION>T23V1</DS_SIGNATUREVERSION>\
         </REQUEST>",
    );

    Ok(SignedRequest {
        action: TRANSACTION_V2_ACTION,
        body,
        v2: true,
        service: Service::Transaction,
    })
}
