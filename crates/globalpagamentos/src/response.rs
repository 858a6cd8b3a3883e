//! Response parsing and classification.
//!
//! Both parsers validate the mandatory structure first, classify gateway
//! declines, and only then map recognized fields into the [`Payment`] (and
//! lazily its card). Unrecognized tags are ignored so newer gateway versions
//! keep working.

use error_stack::{report, ResultExt};
use roxmltree::{Document, Node};

use crate::{
    card::AccountType,
    errors::{CustomResult, OperationError},
    types::Payment,
};

/// Parses a transaction (authorize/capture/cancel) response into `payment`.
///
/// The document must carry a `RETORNOXML` element with a `CODIGO` child; any
/// code other than `0` is a gateway decline carrying that code.
pub(crate) fn parse_transaction(
    xml: &str,
    payment: &mut Payment,
) -> CustomResult<(), OperationError> {
    let document = Document::parse(xml).change_context(OperationError::MalformedResponse)?;

    let retorno = document
        .descendants()
        .find(|node| node.has_tag_name("RETORNOXML"))
        .ok_or_else(|| report!(OperationError::MissingNode { node: "RETORNOXML" }))?;

    let code = retorno
        .children()
        .find(|node| node.has_tag_name("CODIGO"))
        .ok_or_else(|| report!(OperationError::MissingNode { node: "CODIGO" }))?
        .text()
        .unwrap_or_default();

    if code != "0" {
        tracing::warn!(code, "gateway returned a non-zero result code");
        return Err(report!(OperationError::Gateway {
            code: code.to_owned(),
        }));
    }

    for operation in retorno
        .children()
        .filter(|node| node.has_tag_name("OPERACION"))
    {
        for field in operation.children().filter(Node::is_element) {
            map_transaction_field(&field, payment)?;
        }
    }

    Ok(())
}

fn map_transaction_field(
    field: &Node<'_, '_>,
    payment: &mut Payment,
) -> CustomResult<(), OperationError> {
    let value = field.text().unwrap_or_default();

    match field.tag_name().name().to_ascii_lowercase().as_str() {
        "ds_amount" => payment
            .order_mut()
            .set_amount(value.trim().parse().unwrap_or(0.0)),
        "ds_currency" => payment
            .order_mut()
            .set_currency(value.trim().parse().unwrap_or(0))
            .change_context(OperationError::Validation)?,
        "ds_order" => payment.order_mut().set_number(value),
        "ds_md" => payment.set_md(value),
        "ds_authorisationcode" => payment.set_authorization_code(value),
        // The gateway reports an unauthenticated payment as `0`, which
        // counts as "not secure" just like an absent value.
        "ds_securepayment" => payment.set_secure_payment(!value.is_empty() && value != "0"),
        "ds_language" => payment.set_language(value),
        "ds_nsu" => payment.set_nsu(value),
        "ds_parequest" => payment.set_pa_request(value),
        "ds_acsurl" => payment.set_authentication_url(value),
        "ds_response" => payment.set_response(value),
        "ds_response_int" => payment.set_response_int(value),
        "ds_card_type" => {
            let account_type = if value == "C" {
                AccountType::Credit
            } else {
                AccountType::Debit
            };
            payment.card_mut_or_default().set_account_type(account_type);
        }
        "ds_merchantdata" => payment.set_merchant_data(value),
        "ds_card_country" => payment
            .card_mut_or_default()
            .set_card_country(value.trim().parse().unwrap_or(0)),
        "ds_card_brand" => payment
            .card_mut_or_default()
            .set_card_brand(value.trim().parse().unwrap_or(0)),
        "ds_processedpaymethod" => payment.set_processed_pay_method(value),
        "ds_merchant_identifier" => payment.card_mut_or_default().set_identifier(value),
        _ => {}
    }

    Ok(())
}

/// Parses a consultation response into `payment`.
///
/// The document must carry a `Message` element with at least one child; its
/// first child holds the `Ds_*` fields.
pub(crate) fn parse_consult(
    xml: &str,
    payment: &mut Payment,
) -> CustomResult<(), OperationError> {
    let document = Document::parse(xml).change_context(OperationError::MalformedResponse)?;

    let message = document
        .descendants()
        .find(|node| node.has_tag_name("Message"))
        .ok_or_else(|| report!(OperationError::MissingNode { node: "Message" }))?;

    let content = message
        .children()
        .find(Node::is_element)
        .ok_or_else(|| report!(OperationError::EmptyConsultMessage))?;

    for field in content.children().filter(Node::is_element) {
        let value = field.text().unwrap_or_default();

        match field.tag_name().name() {
            "Ds_Order" => payment.order_mut().set_number(value),
            "Ds_Amount" => payment
                .order_mut()
                .set_amount(value.trim().parse().unwrap_or(0.0)),
            "Ds_Currency" => payment
                .order_mut()
                .set_currency(value.trim().parse().unwrap_or(0))
                .change_context(OperationError::Validation)?,
            "Ds_Response" => payment.set_response(value),
            "Ds_ResponseInt" => payment.set_response_int(value),
            "Ds_SecurePayment" => payment.set_secure_payment(value != "0"),
            "Ds_State" => payment.set_state(value),
            "Ds_TransactionType" => payment.set_transaction_type(value),
            _ => {}
        }
    }

    Ok(())
}
