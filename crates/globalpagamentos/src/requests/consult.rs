use super::{Service, SignedRequest, CONSULTATION_ACTION};
use crate::{
    errors::{CustomResult, OperationError},
    signature::sign_fields,
    types::{Merchant, Payment},
    utils::collapse_fragment,
};

/// Looks an order up on the consultation sub-service. The signature covers
/// the collapsed inner `<Version>` fragment, independent of the outer
/// `<Messages>` envelope, and the terminal is re-padded to three digits.
pub(crate) fn build(
    merchant: &Merchant,
    payment: &Payment,
) -> CustomResult<SignedRequest, OperationError> {
    let order = payment.order();
    let terminal = format!("{:0>3}", merchant.terminal());

    let monitor = collapse_fragment(&format!(
        r#"<Version Ds_Version="0.0">
            <Message>
                <Monitor>
                    <Ds_MerchantCode>{merchant_code}</Ds_MerchantCode>
                    <Ds_Terminal>{terminal}</Ds_Terminal>
                    <Ds_Order>{number}</Ds_Order>
                </Monitor>
            </Message>
        </Version>"#,
        merchant_code = merchant.merchant_code(),
        number = order.number(),
    ))?;

    let signature = sign_fields(&[&monitor], merchant.merchant_key());

    let body = format!("<Messages>{monitor}<Signature>{signature}</Signature></Messages>");

    Ok(SignedRequest {
        action: CONSULTATION_ACTION,
        body,
        v2: false,
        service: Service::Consultation,
    })
}
