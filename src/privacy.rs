//! Redaction helpers for privacy-relevant record fields.

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::models::{Address, Order};

/// One-way content hash over the address fields used for audit display.
/// Deterministic for identical inputs; the plaintext is never recoverable
/// from the result.
pub fn hash_address(address: &Address) -> String {
    let canonical = format!(
        "{} {} {} {}",
        address.street, address.city, address.postal_code, address.country
    );
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)
}

/// Strip a payment method down to its display-safe subset. Anything beyond
/// type and last-four digits never leaves the service.
pub fn redact_payment_method(payment: &Value) -> Value {
    json!({
        "type": payment.get("type").cloned().unwrap_or(Value::Null),
        "lastFour": payment.get("lastFour").cloned().unwrap_or(Value::Null),
    })
}

/// Apply read-side privacy rules to an order: redact the payment method and
/// attach the one-way address hash when the stored record lacks one.
pub fn redact_order(order: &mut Order) {
    if let Some(payment) = &order.payment_method {
        order.payment_method = Some(redact_payment_method(payment));
    }
    if let Some(address) = &mut order.shipping_address {
        if address.hashed_address.is_none() {
            address.hashed_address = Some(hash_address(address));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn address() -> Address {
        Address {
            street: "Kungsgatan 12".to_string(),
            city: "Stockholm".to_string(),
            postal_code: "11143".to_string(),
            country: "Sweden".to_string(),
            hashed_address: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn address_hash_is_stable_hex() {
        let a = hash_address(&address());
        let b = hash_address(&address());
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn address_hash_changes_with_any_field() {
        let mut other = address();
        other.postal_code = "11144".to_string();
        assert_ne!(hash_address(&address()), hash_address(&other));
    }

    #[test]
    fn payment_redaction_keeps_only_type_and_last_four() {
        let full = json!({
            "type": "card",
            "lastFour": "4242",
            "number": "4242424242424242",
            "cvv": "123"
        });
        let redacted = redact_payment_method(&full);
        assert_eq!(redacted["type"], "card");
        assert_eq!(redacted["lastFour"], "4242");
        assert!(redacted.get("number").is_none());
        assert!(redacted.get("cvv").is_none());
    }

    #[test]
    fn redact_order_preserves_existing_hash() {
        let mut order: Order = serde_json::from_value(json!({
            "type": "order",
            "userId": "user::a@b.se",
            "shippingAddress": {
                "street": "Kungsgatan 12",
                "city": "Stockholm",
                "postalCode": "11143",
                "country": "Sweden",
                "hashedAddress": "precomputed"
            }
        }))
        .unwrap();
        redact_order(&mut order);
        assert_eq!(
            order.shipping_address.unwrap().hashed_address.as_deref(),
            Some("precomputed")
        );
    }
}
