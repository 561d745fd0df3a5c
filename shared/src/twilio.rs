use serde::Deserialize;
use showreel_atoms::error::DomainError;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Minimal Twilio Messages API client. One attempt per send - no retry, no
/// queue; the caller hears about failures synchronously.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: Option<String>,
}

impl TwilioClient {
    pub fn new(account_sid: &str, auth_token: &str, from: &str, to: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Submit one WhatsApp message and return the provider-assigned sid.
    pub async fn send_whatsapp(&self, body: &str) -> Result<String, DomainError> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.account_sid
        );
        let params = [
            ("From", format!("whatsapp:{}", self.from)),
            ("To", format!("whatsapp:{}", self.to)),
            ("Body", body.to_string()),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| DomainError::RemoteCall(format!("Twilio request error: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let message: MessageResponse = response.json().await.map_err(|e| {
                DomainError::RemoteCall(format!("Twilio response parse error: {}", e))
            })?;
            Ok(message.sid)
        } else {
            let detail = response
                .json::<TwilioErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("Twilio returned HTTP {}", status));
            Err(DomainError::RemoteCall(detail))
        }
    }
}
