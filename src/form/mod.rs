mod auth_form;
pub mod render;
pub mod validation;

pub use auth_form::{AuthForm, Submission};
pub use validation::{validate, FieldValidation};
