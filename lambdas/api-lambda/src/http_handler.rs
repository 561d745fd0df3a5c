use std::sync::Arc;

use lambda_http::http::header::{HeaderValue, VARY};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use showreel_atoms as atoms;
use showreel_shared::{whatsapp, AppState};

fn with_cors_headers(mut resp: Response<Body>) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PUT,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));
    resp
}

fn finalize_response(resp: Result<Response<Body>, Error>) -> Result<Response<Body>, Error> {
    resp.map(with_cors_headers)
}

/// Main Lambda handler - routes requests to the relay or client endpoints
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    tracing::info!("🚀 API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == "OPTIONS" {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp));
    }

    let cfg = &state.config;

    // Notification relay routes (public - no auth required)
    if path == "/send-whatsapp" {
        return match method {
            &Method::POST => {
                finalize_response(whatsapp::handle_send_whatsapp(&state.twilio, body).await)
            }
            _ => finalize_response(method_not_allowed()),
        };
    }

    if path == "/send-whatsapp-location" {
        return match method {
            &Method::POST => finalize_response(
                whatsapp::handle_send_whatsapp_location(&state.twilio, body).await,
            ),
            _ => finalize_response(method_not_allowed()),
        };
    }

    // Client content routes
    if path.starts_with("/clients") {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let resp = match (method, parts.as_slice()) {
            // --- CLIENTS ---
            // GET /clients - list all clients
            (&Method::GET, ["clients"]) => {
                atoms::clients::list_clients_handler(&state.dynamo_client, &cfg.table_name).await
            }
            // POST /clients - create client
            (&Method::POST, ["clients"]) => {
                atoms::clients::create_client_handler(&state.dynamo_client, &cfg.table_name, body)
                    .await
            }
            // GET /clients/{id} - get specific client
            (&Method::GET, ["clients", client_id]) => {
                atoms::clients::get_client_handler(&state.dynamo_client, &cfg.table_name, client_id)
                    .await
            }
            // PATCH /clients/{id} - update client name/logo
            (&Method::PATCH, ["clients", client_id]) => {
                atoms::clients::update_client_handler(
                    &state.dynamo_client,
                    &cfg.table_name,
                    client_id,
                    body,
                )
                .await
            }
            // DELETE /clients/{id} - delete client and its managed blobs
            (&Method::DELETE, ["clients", client_id]) => {
                atoms::clients::delete_client_handler(
                    &state.dynamo_client,
                    &state.s3_client,
                    &cfg.table_name,
                    &cfg.bucket_name,
                    client_id,
                )
                .await
            }

            // --- MOTIONS ---
            // PUT /clients/{id}/motions/order - reorder commit
            (&Method::PUT, ["clients", client_id, "motions", "order"]) => {
                atoms::clients::reorder_motions_handler(
                    &state.dynamo_client,
                    &cfg.table_name,
                    client_id,
                    body,
                )
                .await
            }
            // POST /clients/{id}/motions - upload motion
            (&Method::POST, ["clients", client_id, "motions"]) => {
                atoms::media::upload_motion_handler(
                    &state.dynamo_client,
                    &state.s3_client,
                    &cfg.table_name,
                    &cfg.bucket_name,
                    &cfg.region,
                    client_id,
                    body,
                )
                .await
            }
            // PATCH /clients/{id}/motions/{mid} - update motion
            (&Method::PATCH, ["clients", client_id, "motions", motion_id]) => {
                atoms::media::update_motion_handler(
                    &state.dynamo_client,
                    &state.s3_client,
                    &cfg.table_name,
                    &cfg.bucket_name,
                    &cfg.region,
                    client_id,
                    motion_id,
                    body,
                )
                .await
            }
            // DELETE /clients/{id}/motions/{mid} - delete motion
            (&Method::DELETE, ["clients", client_id, "motions", motion_id]) => {
                atoms::media::delete_motion_handler(
                    &state.dynamo_client,
                    &state.s3_client,
                    &cfg.table_name,
                    &cfg.bucket_name,
                    client_id,
                    motion_id,
                )
                .await
            }

            // --- STILLS ---
            // PUT /clients/{id}/stills/order - reorder commit
            (&Method::PUT, ["clients", client_id, "stills", "order"]) => {
                atoms::clients::reorder_stills_handler(
                    &state.dynamo_client,
                    &cfg.table_name,
                    client_id,
                    body,
                )
                .await
            }
            // POST /clients/{id}/stills - crop and upload still
            (&Method::POST, ["clients", client_id, "stills"]) => {
                atoms::media::upload_still_handler(
                    &state.dynamo_client,
                    &state.s3_client,
                    &cfg.table_name,
                    &cfg.bucket_name,
                    &cfg.region,
                    client_id,
                    body,
                )
                .await
            }
            // DELETE /clients/{id}/stills/{index} - delete still by position
            (&Method::DELETE, ["clients", client_id, "stills", index]) => {
                match index.parse::<usize>() {
                    Ok(index) => {
                        atoms::media::delete_still_handler(
                            &state.dynamo_client,
                            &state.s3_client,
                            &cfg.table_name,
                            &cfg.bucket_name,
                            client_id,
                            index,
                        )
                        .await
                    }
                    Err(_) => bad_request("still index must be a number"),
                }
            }

            _ => not_found(),
        };

        return finalize_response(resp);
    }

    // No matching route
    tracing::warn!("⚠️ No route matched - Method: {} Path: {}", method, path);
    finalize_response(not_found())
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({"error": "Method not allowed"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

fn bad_request(message: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({ "error": message }).to_string().into())
        .map_err(Box::new)?)
}
