use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    SignIn,
    SignUp,
}

impl FormMode {
    pub fn submit_path(self) -> &'static str {
        match self {
            FormMode::SignIn => "/signin",
            FormMode::SignUp => "/signup",
        }
    }

    pub fn button_text(self) -> &'static str {
        match self {
            FormMode::SignIn => "Sign in",
            FormMode::SignUp => "Sign up",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    // HTML checkboxes are only sent when checked
    #[serde(default)]
    pub remember: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub repassword: String,
}

/// Fields posted by the page on every keystroke.
#[derive(Debug, Deserialize)]
pub struct ValidateForm {
    pub mode: FormMode,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub repassword: String,
}

/// Current contents of the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub email: String,
    pub password: String,
    pub repassword: String,
    pub remember: bool,
}

impl From<SignInForm> for FormFields {
    fn from(form: SignInForm) -> Self {
        Self {
            email: form.email,
            password: form.password,
            repassword: String::new(),
            remember: form.remember.is_some(),
        }
    }
}

impl From<SignUpForm> for FormFields {
    fn from(form: SignUpForm) -> Self {
        Self {
            email: form.email,
            password: form.password,
            repassword: form.repassword,
            remember: false,
        }
    }
}

impl From<ValidateForm> for FormFields {
    fn from(form: ValidateForm) -> Self {
        Self {
            email: form.email,
            password: form.password,
            repassword: form.repassword,
            remember: false,
        }
    }
}
