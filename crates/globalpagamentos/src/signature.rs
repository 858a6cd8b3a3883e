//! Request signing.
//!
//! The gateway recomputes every signature from the raw field values, so the
//! canonical input is the plain concatenation of the fields in protocol
//! order, with no separators and the merchant key appended last.

use masking::{PeekInterface, Secret};
use sha2::{Digest, Sha256};

pub(crate) fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Hex SHA-256 over `fields[0] ‖ fields[1] ‖ … ‖ merchant_key`.
pub(crate) fn sign_fields(fields: &[&str], merchant_key: &Secret<String>) -> String {
    let mut canonical = String::with_capacity(
        fields.iter().map(|field| field.len()).sum::<usize>()
            + merchant_key.peek().len(),
    );

    for field in fields {
        canonical.push_str(field);
    }
    canonical.push_str(merchant_key.peek());

    sha256_hex(&canonical)
}
