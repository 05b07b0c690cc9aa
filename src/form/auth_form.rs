use std::sync::Arc;
use crate::config::StorageConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{FormFields, FormMode, User};
use crate::services::{CredentialStore, KeyValueStore, MarkerStores};
use super::validation::{self, FieldValidation};

pub const TASKS_PATH: &str = "/tasks";

#[derive(Debug, PartialEq)]
pub enum Submission {
    Registered,
    SignedIn { user: User, redirect_to: &'static str },
}

/// One mounted form: its mode never changes, its credential list is read once.
pub struct AuthForm {
    mode: FormMode,
    fields: FormFields,
    credentials: CredentialStore,
}

impl AuthForm {
    pub async fn mount(
        mode: FormMode,
        durable: Arc<dyn KeyValueStore>,
        keys: StorageConfig,
    ) -> Self {
        Self {
            mode,
            fields: FormFields::default(),
            credentials: CredentialStore::load(durable, keys).await,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    #[cfg(test)]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn fill(&mut self, fields: FormFields) {
        self.fields = fields;
    }

    #[cfg(test)]
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.fields.email = email.into();
    }

    #[cfg(test)]
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.fields.password = password.into();
    }

    #[cfg(test)]
    pub fn set_repassword(&mut self, repassword: impl Into<String>) {
        self.fields.repassword = repassword.into();
    }

    #[cfg(test)]
    pub fn set_remember(&mut self, remember: bool) {
        self.fields.remember = remember;
    }

    pub fn validation(&self) -> FieldValidation {
        validation::validate(self.mode, &self.fields)
    }

    pub fn submit_enabled(&self) -> bool {
        self.validation().submit_enabled
    }

    pub async fn submit(&mut self, markers: MarkerStores<'_>) -> AppResult<Submission> {
        match self.mode {
            FormMode::SignUp => {
                if !self.submit_enabled() {
                    return Err(AppError::SubmitDisabled);
                }
                self.credentials
                    .register(&self.fields.email, &self.fields.password)
                    .await?;
                self.fields.email.clear();
                self.fields.password.clear();
                self.fields.repassword.clear();
                Ok(Submission::Registered)
            }
            FormMode::SignIn => {
                let user = self
                    .credentials
                    .authenticate(
                        &self.fields.email,
                        &self.fields.password,
                        self.fields.remember,
                        markers,
                    )
                    .await?;
                Ok(Submission::SignedIn { user, redirect_to: TASKS_PATH })
            }
        }
    }
}
