use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

/// Order returned by the gateway; relayed to the client so it can open the
/// checkout widget. Amounts are in the currency's minor unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: u8,
}

/// Thin client for the payment gateway: order creation over HTTP plus
/// callback-signature verification. Settlement, retries, and timeouts are the
/// gateway's own concern; a failed call here is surfaced as-is and the caller
/// resubmits.
#[derive(Clone)]
pub struct PaymentGateway {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    api_base: String,
}

impl PaymentGateway {
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self::with_api_base(key_id, key_secret, DEFAULT_API_BASE.to_string())
    }

    pub fn with_api_base(key_id: String, key_secret: String, api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            key_id,
            key_secret,
            api_base,
        }
    }

    pub fn from_env() -> Self {
        let key_id = std::env::var("PAYMENT_KEY_ID").expect("PAYMENT_KEY_ID must be set");
        let key_secret =
            std::env::var("PAYMENT_KEY_SECRET").expect("PAYMENT_KEY_SECRET must be set");
        Self::new(key_id, key_secret)
    }

    /// Create a capture-on-payment order for `amount` minor units.
    pub async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, ApiError> {
        let request = CreateOrderRequest {
            amount,
            currency,
            receipt,
            payment_capture: 1,
        };

        let response = self
            .client
            .post(format!("{}/orders", self.api_base))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Gateway(format!("order request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Gateway(format!(
                "order creation returned HTTP {status}"
            )));
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| ApiError::Gateway(format!("invalid order response: {e}")))
    }

    /// Verify the HMAC-SHA256 signature the gateway attaches to its payment
    /// confirmation: hex(HMAC(key_secret, "order_id|payment_id")).
    pub fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(self.key_secret.as_bytes()) else {
            return false;
        };
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        expected == signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_gateway() -> PaymentGateway {
        PaymentGateway::new("key_test".to_string(), "secret_test".to_string())
    }

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_is_accepted() {
        let gw = test_gateway();
        let sig = sign("secret_test", "order_1", "pay_1");
        assert!(gw.verify_signature("order_1", "pay_1", &sig));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let gw = test_gateway();
        let mut sig = sign("secret_test", "order_1", "pay_1");
        // Flip one hex digit.
        let last = sig.pop().unwrap();
        sig.push(if last == '0' { '1' } else { '0' });
        assert!(!gw.verify_signature("order_1", "pay_1", &sig));
    }

    #[test]
    fn signature_binds_order_and_payment() {
        let gw = test_gateway();
        let sig = sign("secret_test", "order_1", "pay_1");
        assert!(!gw.verify_signature("order_2", "pay_1", &sig));
        assert!(!gw.verify_signature("order_1", "pay_2", &sig));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let gw = test_gateway();
        let sig = sign("another_secret", "order_1", "pay_1");
        assert!(!gw.verify_signature("order_1", "pay_1", &sig));
    }
}
