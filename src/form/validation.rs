//! Live checks for the sign-up form.
//!
//! The e-mail rule is intentionally narrow: an `@` somewhere and a `.com` or
//! `.com.br` ending. It is not general address syntax.

use serde::Serialize;
use crate::models::{FormFields, FormMode};

pub const MIN_PASSWORD_LEN: usize = 6;

const EMAIL_SUFFIXES: [&str; 2] = [".com", ".com.br"];

pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && EMAIL_SUFFIXES.iter().any(|suffix| email.ends_with(suffix))
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn passwords_match(password: &str, repassword: &str) -> bool {
    password == repassword
}

/// Error flags per field plus the submit gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldValidation {
    pub email_error: bool,
    pub password_error: bool,
    pub repassword_error: bool,
    pub submit_enabled: bool,
}

impl FieldValidation {
    const SKIPPED: Self = Self {
        email_error: false,
        password_error: false,
        repassword_error: false,
        submit_enabled: true,
    };
}

// Untouched (empty) fields never show an error.
fn shows_error(value: &str, valid: bool) -> bool {
    !value.is_empty() && !valid
}

pub fn validate(mode: FormMode, fields: &FormFields) -> FieldValidation {
    if mode == FormMode::SignIn {
        return FieldValidation::SKIPPED;
    }

    let email_valid = is_valid_email(&fields.email);
    let password_valid = is_valid_password(&fields.password);
    let repassword_valid = passwords_match(&fields.password, &fields.repassword);

    FieldValidation {
        email_error: shows_error(&fields.email, email_valid),
        password_error: shows_error(&fields.password, password_valid),
        repassword_error: shows_error(&fields.repassword, repassword_valid),
        submit_enabled: email_valid && password_valid && repassword_valid,
    }
}
