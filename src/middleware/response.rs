use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Success envelope: `{ "status": "success", <key>: <payload> }`.
/// Without a key, an object payload is merged into the envelope.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub key: Option<&'static str>,
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with the payload under `key`
    pub fn success(key: &'static str, data: T) -> Self {
        Self {
            key: Some(key),
            data,
            status_code: None,
        }
    }

    /// 200 OK with the payload's own fields at the top level
    pub fn flat(data: T) -> Self {
        Self {
            key: None,
            data,
            status_code: None,
        }
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = Some(status_code);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "message": "Failed to serialize response data",
                        "code": "INTERNAL_SERVER_ERROR",
                        "statusCode": 500
                    })),
                )
                    .into_response();
            }
        };

        let envelope = match (self.key, data_value) {
            (Some(key), value) => {
                let mut fields = serde_json::Map::new();
                fields.insert("status".to_string(), json!("success"));
                fields.insert(key.to_string(), value);
                Value::Object(fields)
            }
            (None, Value::Object(mut fields)) => {
                fields.insert("status".to_string(), json!("success"));
                Value::Object(fields)
            }
            (None, value) => json!({ "status": "success", "data": value }),
        };

        (status, Json(envelope)).into_response()
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
