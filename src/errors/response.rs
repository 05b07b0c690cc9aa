use axum::{
    response::{IntoResponse, Response, Redirect},
    http::StatusCode,
};
use crate::errors::AppError;

fn back_to_form(path: &str, msg: &str) -> Response {
    Redirect::to(&format!("{}?error={}", path, urlencoding::encode(msg))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Sign-up problems go back to the sign-up form
            AppError::DuplicateEmail | AppError::SubmitDisabled => {
                back_to_form("/signup", &self.to_string())
            }

            AppError::AuthFailure => back_to_form("/", &self.to_string()),

            // Storage faults are internal server errors
            AppError::Redis(_)
            | AppError::Session(_)
            | AppError::Serialization(_)
            | AppError::Template(_) => {
                tracing::error!("Request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}
