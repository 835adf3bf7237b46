//! SMS gateway client (Arkesel) for the §4.6/§4.7 booking-confirmation text.

use serde::Serialize;
use std::env;

pub struct SmsClient {
    http: reqwest::Client,
    api_key: String,
    sender_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendSmsRequest<'a> {
    sender: &'a str,
    message: &'a str,
    recipients: &'a [&'a str],
}

impl SmsClient {
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("ARKESEL_API_KEY").ok()?;
        let sender_id = env::var("ARKESEL_SENDER_ID").unwrap_or_else(|_| "EliteTransport".to_owned());
        Some(Self {
            http: reqwest::Client::new(),
            api_key,
            sender_id,
        })
    }

    pub async fn send(&self, phone: &str, message: &str) -> Result<(), reqwest::Error> {
        self.http
            .post("https://sms.arkesel.com/api/v2/sms/send")
            .header("api-key", &self.api_key)
            .json(&SendSmsRequest {
                sender: &self.sender_id,
                message,
                recipients: &[phone],
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
