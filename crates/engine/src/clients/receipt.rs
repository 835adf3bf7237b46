//! Receipt service client: the best-effort side effect of §4.6 step 10 and
//! the §4.7 webhook fallback.

use serde::{Deserialize, Serialize};
use std::env;

pub struct ReceiptClient {
    http: reqwest::Client,
    webhook_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest<'a> {
    pub booking_id: i64,
    pub passenger_name: &'a str,
    pub email: &'a str,
    pub seats: &'a [String],
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub receipt_url: String,
    pub drive_file_id: Option<String>,
}

impl ReceiptClient {
    pub fn from_env() -> Option<Self> {
        let webhook_url = env::var("GAS_WEBHOOK_URL").ok()?;
        Some(Self {
            http: reqwest::Client::new(),
            webhook_url,
        })
    }

    pub async fn generate(
        &self,
        request: &ReceiptRequest<'_>,
    ) -> Result<ReceiptResponse, reqwest::Error> {
        self.http
            .post(&self.webhook_url)
            .json(request)
            .send()
            .await?
            .json()
            .await
    }
}
