use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::model::{UpdateMotionPayload, UploadMotionPayload, UploadStillPayload};
use super::service;
use crate::error::{error_response, json_response, parse_json};

/// HTTP Handler: POST /clients/{id}/motions
pub async fn upload_motion_handler(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    region: &str,
    client_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: UploadMotionPayload = match parse_json(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(&e),
    };

    match service::upload_motion(dynamo, s3, table_name, bucket, region, client_id, payload).await {
        Ok(motion) => {
            tracing::info!(
                "✅ upload_motion success: motion_id={}, client_id={}",
                motion.motion_id,
                client_id
            );
            json_response(StatusCode::CREATED, &motion)
        }
        Err(e) => {
            tracing::error!("❌ upload_motion failed: client_id={}, error={}", client_id, e);
            error_response(&e)
        }
    }
}

/// HTTP Handler: PATCH /clients/{id}/motions/{motion_id}
pub async fn update_motion_handler(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    region: &str,
    client_id: &str,
    motion_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: UpdateMotionPayload = match parse_json(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(&e),
    };

    match service::update_motion(
        dynamo, s3, table_name, bucket, region, client_id, motion_id, payload,
    )
    .await
    {
        Ok(motion) => json_response(StatusCode::OK, &motion),
        Err(e) => {
            tracing::error!(
                "❌ update_motion failed: client_id={}, motion_id={}, error={}",
                client_id,
                motion_id,
                e
            );
            error_response(&e)
        }
    }
}

/// HTTP Handler: DELETE /clients/{id}/motions/{motion_id}
pub async fn delete_motion_handler(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    client_id: &str,
    motion_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match service::delete_motion(dynamo, s3, table_name, bucket, client_id, motion_id).await {
        Ok(()) => Ok(Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header("Access-Control-Allow-Origin", "*")
            .body(Body::Empty)
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!(
                "❌ delete_motion failed: client_id={}, motion_id={}, error={}",
                client_id,
                motion_id,
                e
            );
            error_response(&e)
        }
    }
}

/// HTTP Handler: POST /clients/{id}/stills
pub async fn upload_still_handler(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    region: &str,
    client_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: UploadStillPayload = match parse_json(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(&e),
    };

    match service::upload_still(dynamo, s3, table_name, bucket, region, client_id, payload).await {
        Ok(still) => {
            tracing::info!("✅ upload_still success: client_id={}, index={}", client_id, still.index);
            json_response(StatusCode::CREATED, &still)
        }
        Err(e) => {
            tracing::error!("❌ upload_still failed: client_id={}, error={}", client_id, e);
            error_response(&e)
        }
    }
}

/// HTTP Handler: DELETE /clients/{id}/stills/{index}
pub async fn delete_still_handler(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    client_id: &str,
    index: usize,
) -> Result<Response<Body>, LambdaError> {
    match service::delete_still(dynamo, s3, table_name, bucket, client_id, index).await {
        Ok(()) => Ok(Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header("Access-Control-Allow-Origin", "*")
            .body(Body::Empty)
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!(
                "❌ delete_still failed: client_id={}, index={}, error={}",
                client_id,
                index,
                e
            );
            error_response(&e)
        }
    }
}
