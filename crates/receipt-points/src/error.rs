use crate::config::ConfigError;
use crate::receipts::{ErrorKind, ReceiptServiceError};
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Receipt(ReceiptServiceError),
    Input(serde_json::Error),
    Payload(JsonRejection),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Receipt(err) => match err.kind() {
                ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Payload(rejection) => match rejection {
                JsonRejection::JsonDataError(_)
                | JsonRejection::JsonSyntaxError(_)
                | JsonRejection::MissingJsonContentType(_) => StatusCode::BAD_REQUEST,
                other => other.status(),
            },
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire names of the request fields that caused a rejection.
    pub fn fields(&self) -> Vec<String> {
        match self {
            AppError::Receipt(ReceiptServiceError::Validation(err)) => err.fields().to_vec(),
            AppError::Payload(rejection) => rejected_field(rejection).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Field path reported when a JSON value has the wrong type, e.g. `items[0].price`.
fn rejected_field(rejection: &JsonRejection) -> Option<String> {
    let JsonRejection::JsonDataError(err) = rejection else {
        return None;
    };
    let text = err.body_text();
    let (_, detail) = text.split_once("target type: ")?;
    let (path, _) = detail.split_once(": ")?;
    if path.is_empty() || path.contains(char::is_whitespace) {
        return None;
    }
    Some(path.to_string())
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Receipt(err) => write!(f, "receipt error: {}", err),
            AppError::Input(err) => write!(f, "malformed receipt payload: {}", err),
            AppError::Payload(rejection) => {
                write!(f, "malformed receipt payload: {}", rejection.body_text())
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Receipt(err) => Some(err),
            AppError::Input(err) => Some(err),
            AppError::Payload(rejection) => Some(rejection),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            json!({ "error": "internal server error" })
        } else if status == StatusCode::BAD_REQUEST {
            json!({
                "error": self.to_string(),
                "fields": self.fields(),
            })
        } else {
            json!({ "error": self.to_string() })
        };

        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ReceiptServiceError> for AppError {
    fn from(value: ReceiptServiceError) -> Self {
        Self::Receipt(value)
    }
}

impl From<crate::receipts::ValidationError> for AppError {
    fn from(value: crate::receipts::ValidationError) -> Self {
        Self::Receipt(value.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Payload(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}
