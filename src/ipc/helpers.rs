//! Shared plumbing for handler families: parameter extraction, the
//! handler-level error type, and its mappings from the API and
//! validation layers.

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::api::{ApiClient, ApiError};
use crate::ipc::error::err;
use crate::ipc::types::AppState;
use crate::validate::ValidationError;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> HandlerErr {
        HandlerErr {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<ApiError> for HandlerErr {
    fn from(e: ApiError) -> HandlerErr {
        match e {
            ApiError::Transport(detail) => HandlerErr {
                code: "api_unreachable",
                message: "Sunucuya ulaşılamadı".to_string(),
                details: Some(json!({ "detail": detail })),
            },
            // The server's own message goes through untouched.
            ApiError::Server { status, message } => HandlerErr {
                code: "api_error",
                message,
                details: Some(json!({ "status": status })),
            },
            ApiError::BadResponse(detail) => HandlerErr {
                code: "bad_response",
                message: "Sunucudan beklenmeyen yanıt alındı".to_string(),
                details: Some(json!({ "detail": detail })),
            },
        }
    }
}

impl From<ValidationError> for HandlerErr {
    fn from(e: ValidationError) -> HandlerErr {
        HandlerErr {
            code: "validation_failed",
            details: Some(json!({ "field": e.field })),
            message: e.message,
        }
    }
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Deserialize the whole params object into a typed shape.
pub fn parse_params<T: DeserializeOwned>(params: &serde_json::Value) -> Result<T, HandlerErr> {
    serde_json::from_value(params.clone()).map_err(|e| HandlerErr::bad_params(e.to_string()))
}

/// Deserialize one key of the params object.
pub fn parse_field<T: DeserializeOwned>(
    params: &serde_json::Value,
    key: &str,
) -> Result<T, HandlerErr> {
    let v = params
        .get(key)
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))?;
    serde_json::from_value(v.clone())
        .map_err(|e| HandlerErr::bad_params(format!("{}: {}", key, e)))
}

/// Deserialize one key, tolerating its absence (and explicit null).
pub fn parse_optional_field<T: DeserializeOwned>(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<T>, HandlerErr> {
    match params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| HandlerErr::bad_params(format!("{}: {}", key, e))),
    }
}

pub fn require_api(state: &AppState) -> Result<&ApiClient, HandlerErr> {
    state.api.as_ref().ok_or(HandlerErr {
        code: "no_session",
        message: "Önce oturum açın".to_string(),
        details: None,
    })
}

/// Run a data handler behind the session check and wrap its outcome in
/// the response envelope.
pub fn with_api(
    state: &AppState,
    req: &crate::ipc::types::Request,
    f: impl FnOnce(&ApiClient, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    match require_api(state).and_then(|api| f(api, &req.params)) {
        Ok(result) => crate::ipc::error::ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}
