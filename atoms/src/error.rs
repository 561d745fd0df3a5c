use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

/// Error taxonomy shared by every domain operation.
///
/// Remote-call failures are wrapped at the operation boundary and propagated;
/// nothing retries, nothing is swallowed.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("remote call failed: {0}")]
    RemoteCall(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) | DomainError::IndexOutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            DomainError::RemoteCall(_) => StatusCode::BAD_GATEWAY,
            DomainError::Upload(_) | DomainError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response in the shape the admin frontend expects.
pub fn error_response(err: &DomainError) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(err.status_code())
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({ "error": err.to_string() })
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

/// Parse a JSON request body, folding malformed input into the validation
/// arm so handlers answer 400 instead of surfacing a raw runtime error.
pub fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, DomainError> {
    serde_json::from_slice(body)
        .map_err(|e| DomainError::Validation(format!("invalid request body: {}", e)))
}

pub fn json_response<T: serde::Serialize>(
    status: StatusCode,
    value: &T,
) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            DomainError::not_found("client", "c1").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::Validation("empty".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DomainError::IndexOutOfRange { index: 9, len: 2 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DomainError::RemoteCall("twilio down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn malformed_json_body_maps_to_bad_request() {
        #[derive(Debug, serde::Deserialize)]
        struct Payload {
            #[allow(dead_code)]
            name: String,
        }

        let err = parse_json::<Payload>(b"{not json").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        assert!(parse_json::<Payload>(br#"{"name":"Ada"}"#).is_ok());
    }
}
