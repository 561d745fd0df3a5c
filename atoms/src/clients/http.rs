use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::model::{
    CreateClientPayload, ReorderMotionsPayload, ReorderStillsPayload, UpdateClientPayload,
};
use super::service;
use crate::error::{error_response, json_response, parse_json};

/// HTTP Handler: GET /clients
pub async fn list_clients_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, LambdaError> {
    match service::list_clients(client, table_name).await {
        Ok(clients) => json_response(StatusCode::OK, &clients),
        Err(e) => {
            tracing::error!("❌ list_clients failed: {}", e);
            error_response(&e)
        }
    }
}

/// HTTP Handler: POST /clients
pub async fn create_client_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: CreateClientPayload = match parse_json(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(&e),
    };

    match service::create_client(client, table_name, payload).await {
        Ok(created) => json_response(StatusCode::CREATED, &created),
        Err(e) => {
            tracing::error!("❌ create_client failed: {}", e);
            error_response(&e)
        }
    }
}

/// HTTP Handler: GET /clients/{id}
pub async fn get_client_handler(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match service::get_client(client, table_name, client_id).await {
        Ok(found) => json_response(StatusCode::OK, &found),
        Err(e) => error_response(&e),
    }
}

/// HTTP Handler: PATCH /clients/{id}
pub async fn update_client_handler(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: UpdateClientPayload = match parse_json(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(&e),
    };

    match service::update_client(client, table_name, client_id, payload).await {
        Ok(updated) => json_response(StatusCode::OK, &updated),
        Err(e) => {
            tracing::error!("❌ update_client failed: client_id={}, error={}", client_id, e);
            error_response(&e)
        }
    }
}

/// HTTP Handler: DELETE /clients/{id}
pub async fn delete_client_handler(
    dynamo: &DynamoClient,
    s3: &S3Client,
    table_name: &str,
    bucket: &str,
    client_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match service::delete_client(dynamo, s3, table_name, bucket, client_id).await {
        Ok(()) => Ok(Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header("Access-Control-Allow-Origin", "*")
            .body(Body::Empty)
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!("❌ delete_client failed: client_id={}, error={}", client_id, e);
            error_response(&e)
        }
    }
}

/// HTTP Handler: PUT /clients/{id}/motions/order
///
/// The reorder commit: fired once per completed drag gesture with the full
/// id sequence in its new order.
pub async fn reorder_motions_handler(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: ReorderMotionsPayload = match parse_json(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(&e),
    };

    match service::reorder_motions(client, table_name, client_id, &payload.motion_ids).await {
        Ok(motions) => json_response(StatusCode::OK, &motions),
        Err(e) => {
            tracing::error!("❌ reorder_motions failed: client_id={}, error={}", client_id, e);
            error_response(&e)
        }
    }
}

/// HTTP Handler: PUT /clients/{id}/stills/order
pub async fn reorder_stills_handler(
    client: &DynamoClient,
    table_name: &str,
    client_id: &str,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: ReorderStillsPayload = match parse_json(body) {
        Ok(payload) => payload,
        Err(e) => return error_response(&e),
    };

    match service::reorder_stills(client, table_name, client_id, &payload.order).await {
        Ok(stills) => json_response(StatusCode::OK, &stills),
        Err(e) => {
            tracing::error!("❌ reorder_stills failed: client_id={}, error={}", client_id, e);
            error_response(&e)
        }
    }
}
