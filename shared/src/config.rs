use std::env;

use lambda_http::Error as LambdaError;

/// Environment-sourced configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub bucket_name: String,
    pub region: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    /// Sender number, without the `whatsapp:` prefix.
    pub whatsapp_from: String,
    /// Recipient number the relay forwards every submission to.
    pub whatsapp_to: String,
}

impl Config {
    pub fn from_env() -> Result<Self, LambdaError> {
        Ok(Self {
            table_name: env::var("TABLE_NAME").unwrap_or_else(|_| "showreel".to_string()),
            bucket_name: env::var("S3_BUCKET_NAME")
                .unwrap_or_else(|_| "showreel-media".to_string()),
            region: env::var("AWS_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            twilio_account_sid: require("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: require("TWILIO_AUTH_TOKEN")?,
            whatsapp_from: require("TWILIO_WHATSAPP_FROM")?,
            whatsapp_to: require("TWILIO_WHATSAPP_TO")?,
        })
    }
}

fn require(key: &str) -> Result<String, LambdaError> {
    env::var(key).map_err(|_| LambdaError::from(format!("{} must be set", key)))
}
