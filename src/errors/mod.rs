// Error type and result alias shared by the stores, the form and the handlers.
use thiserror::Error;

pub mod response;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("E-mail already registered")]
    DuplicateEmail,

    #[error("Wrong e-mail or password")]
    AuthFailure,

    #[error("Form is not valid yet")]
    SubmitDisabled,

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
