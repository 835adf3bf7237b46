//! Payment processor client: the synchronous `verify` half of §4.6 step 3.

use serde::Deserialize;
use std::env;

const VERIFY_URL: &str = "https://api.paystack.co/transaction/verify";

#[derive(Debug, Clone)]
pub struct VerifiedCharge {
    pub status: String,
    pub amount_minor_units: i64,
}

pub struct PaymentClient {
    http: reqwest::Client,
    secret_key: String,
}

impl PaymentClient {
    pub fn from_env() -> Option<Self> {
        let secret_key = env::var("PAYSTACK_SECRET_KEY").ok()?;
        Some(Self {
            http: reqwest::Client::new(),
            secret_key,
        })
    }

    /// Calls the processor's `verify` endpoint for `reference`. Returns the
    /// reported status and amount in minor currency units.
    pub async fn verify(&self, reference: &str) -> Result<VerifiedCharge, reqwest::Error> {
        let url = format!("{VERIFY_URL}/{reference}");
        let response: VerifyResponse = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?
            .json()
            .await?;

        Ok(VerifiedCharge {
            status: response.data.status,
            amount_minor_units: response.data.amount,
        })
    }
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    data: VerifyResponseData,
}

#[derive(Debug, Deserialize)]
struct VerifyResponseData {
    status: String,
    amount: i64,
}
