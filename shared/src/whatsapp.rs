use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::{Deserialize, Serialize};

use crate::twilio::TwilioClient;
use showreel_atoms::error::DomainError;

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub content: String,
    pub number: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub message: String,
    pub location_name: String,
    pub location_address: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    success: bool,
    message_sid: String,
}

#[derive(Serialize)]
struct SendErrorResponse {
    success: bool,
    error: String,
}

/// Handle POST /send-whatsapp - contact form submission
pub async fn handle_send_whatsapp(
    twilio: &TwilioClient,
    body: &Body,
) -> Result<Response<Body>, Error> {
    let body_str = match body {
        Body::Text(text) => text,
        Body::Binary(bytes) => std::str::from_utf8(bytes).unwrap_or(""),
        Body::Empty => "",
    };

    tracing::info!("Contact form submission received");

    let request: ContactRequest = match serde_json::from_str(body_str) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!("Failed to parse contact request: {}", e);
            return failure_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid request body: {}", e),
            );
        }
    };

    if let Err(message) = validate_contact(&request) {
        return failure_response(StatusCode::BAD_REQUEST, message);
    }

    deliver(twilio, &format_contact_message(&request)).await
}

/// Handle POST /send-whatsapp-location - location request submission
pub async fn handle_send_whatsapp_location(
    twilio: &TwilioClient,
    body: &Body,
) -> Result<Response<Body>, Error> {
    let body_str = match body {
        Body::Text(text) => text,
        Body::Binary(bytes) => std::str::from_utf8(bytes).unwrap_or(""),
        Body::Empty => "",
    };

    tracing::info!("Location request submission received");

    let request: LocationRequest = match serde_json::from_str(body_str) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!("Failed to parse location request: {}", e);
            return failure_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid request body: {}", e),
            );
        }
    };

    if let Err(message) = validate_location(&request) {
        return failure_response(StatusCode::BAD_REQUEST, message);
    }

    deliver(twilio, &format_location_message(&request)).await
}

/// Single-attempt submission to the messaging provider.
async fn deliver(twilio: &TwilioClient, text: &str) -> Result<Response<Body>, Error> {
    match twilio.send_whatsapp(text).await {
        Ok(sid) => {
            tracing::info!("WhatsApp message sent: sid={}", sid);
            let response = SendResponse {
                success: true,
                message_sid: sid,
            };
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(serde_json::to_string(&response)?.into())
                .map_err(Box::new)?)
        }
        Err(e) => {
            tracing::error!("Failed to send WhatsApp message: {}", e);
            let status = match &e {
                DomainError::RemoteCall(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            failure_response(status, &e.to_string())
        }
    }
}

fn failure_response(status: StatusCode, error: &str) -> Result<Response<Body>, Error> {
    let body = SendErrorResponse {
        success: false,
        error: error.to_string(),
    };
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&body)?.into())
        .map_err(Box::new)?)
}

fn validate_contact(req: &ContactRequest) -> Result<(), &'static str> {
    if req.name.trim().is_empty() {
        return Err("Please provide a name");
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err("Please provide a valid email address");
    }
    if req.content.trim().is_empty() {
        return Err("Please provide a message");
    }
    Ok(())
}

fn validate_location(req: &LocationRequest) -> Result<(), &'static str> {
    if req.name.trim().is_empty() {
        return Err("Please provide a name");
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err("Please provide a valid email address");
    }
    if req.location_name.trim().is_empty() {
        return Err("Please provide a location");
    }
    Ok(())
}

fn format_contact_message(req: &ContactRequest) -> String {
    format!(
        "New contact form submission\n\nName: {}\nEmail: {}\nPhone: {}\nMessage: {}",
        req.name, req.email, req.number, req.content
    )
}

fn format_location_message(req: &LocationRequest) -> String {
    format!(
        "New location request\n\nName: {}\nEmail: {}\nPhone: {}\nDate: {}\nLocation: {} ({})\nMessage: {}",
        req.name,
        req.email,
        req.phone,
        req.date,
        req.location_name,
        req.location_address,
        req.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactRequest {
        ContactRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            content: "We need a showreel".to_string(),
            number: "+61400000000".to_string(),
        }
    }

    #[test]
    fn contact_message_carries_every_field() {
        let text = format_contact_message(&contact());
        assert!(text.contains("Ada"));
        assert!(text.contains("ada@example.com"));
        assert!(text.contains("+61400000000"));
        assert!(text.contains("We need a showreel"));
    }

    #[test]
    fn contact_validation_rejects_bad_email_and_empty_fields() {
        let mut req = contact();
        req.email = "not-an-email".to_string();
        assert!(validate_contact(&req).is_err());

        let mut req = contact();
        req.name = "  ".to_string();
        assert!(validate_contact(&req).is_err());

        let mut req = contact();
        req.content = String::new();
        assert!(validate_contact(&req).is_err());

        assert!(validate_contact(&contact()).is_ok());
    }

    #[test]
    fn location_request_parses_camel_case_keys() {
        let req: LocationRequest = serde_json::from_str(
            r#"{
                "name": "Ada",
                "email": "ada@example.com",
                "phone": "+61400000000",
                "date": "2026-09-12",
                "message": "Scouting",
                "locationName": "Warehouse 7",
                "locationAddress": "12 Dock Rd"
            }"#,
        )
        .unwrap();
        assert_eq!(req.location_name, "Warehouse 7");

        let text = format_location_message(&req);
        assert!(text.contains("Warehouse 7"));
        assert!(text.contains("12 Dock Rd"));
        assert!(text.contains("2026-09-12"));
    }

    #[test]
    fn success_response_uses_message_sid_key() {
        let json = serde_json::to_string(&SendResponse {
            success: true,
            message_sid: "SM123".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"messageSid\":\"SM123\""));
    }
}
