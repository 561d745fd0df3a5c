mod http_handler;

use std::sync::Arc;

use http_handler::function_handler;
use lambda_http::{run, service_fn, Error};
use showreel_shared::AppState;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    // One set of service handles for the lifetime of the process.
    let state = Arc::new(AppState::from_env().await?);

    run(service_fn(move |event| {
        let state = state.clone();
        async move { function_handler(event, state).await }
    }))
    .await
}
