pub mod config;
pub mod twilio;
pub mod whatsapp;

pub use config::Config;

use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;

use twilio::TwilioClient;

/// Service handles constructed once at startup and passed into every
/// handler. No module-level singletons, no reinitialization per request.
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub s3_client: S3Client,
    pub twilio: TwilioClient,
    pub config: Config,
}

impl AppState {
    pub async fn from_env() -> Result<Self, lambda_http::Error> {
        let config = Config::from_env()?;

        let aws_config = aws_config::load_from_env().await;
        let dynamo_client = DynamoClient::new(&aws_config);
        let s3_client = S3Client::new(&aws_config);

        let twilio = TwilioClient::new(
            &config.twilio_account_sid,
            &config.twilio_auth_token,
            &config.whatsapp_from,
            &config.whatsapp_to,
        );

        Ok(Self {
            dynamo_client,
            s3_client,
            twilio,
            config,
        })
    }
}
