//! Payment Signature
//!
//! `signature = hex(HMAC-SHA256(key_secret, "<gateway order id>|<gateway payment id>"))`

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{PaymentError, Result};

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &str, gateway_order_id: &str, payment_id: &str) -> HmacSha256 {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac
}

/// Compute the signature the gateway attaches to a completed checkout
pub fn sign(secret: &str, gateway_order_id: &str, payment_id: &str) -> String {
    hex::encode(mac_for(secret, gateway_order_id, payment_id).finalize().into_bytes())
}

/// Verify a checkout signature in constant time
pub fn verify(secret: &str, gateway_order_id: &str, payment_id: &str, signature: &str) -> Result<()> {
    let expected = hex::decode(signature.trim())
        .map_err(|e| PaymentError::MalformedSignature(e.to_string()))?;

    mac_for(secret, gateway_order_id, payment_id)
        .verify_slice(&expected)
        .map_err(|_| PaymentError::SignatureMismatch)
}
