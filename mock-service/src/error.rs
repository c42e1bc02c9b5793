use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::PoisonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid car.")]
    InvalidCar,

    #[error("Plate {0} is already registered")]
    DuplicatePlate(String),

    #[error("Email {0} is already registered")]
    DuplicateEmail(String),

    #[error("Missing field {0}")]
    MissingField(&'static str),

    #[error("Malformed request body: {message}")]
    MalformedBody { status: StatusCode, message: String },

    #[error("Too many requests")]
    Overloaded,

    #[error("Store lock is poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for ApiError {
    fn from(_err: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use ApiError::*;
        match self {
            Unauthorized | InvalidCredentials => StatusCode::UNAUTHORIZED,
            DuplicateEmail(_) => StatusCode::CONFLICT,
            MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MalformedBody { status, .. } => *status,
            InvalidCar | DuplicatePlate(_) | Overloaded | Poisoned => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
