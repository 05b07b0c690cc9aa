//! Pages rendered from `templates/` with HTML autoescape.

use minijinja::{context, Environment, UndefinedBehavior};
use crate::errors::AppResult;
use crate::models::{FormFields, FormMode, User};
use super::validation::FieldValidation;

const FORM_TEMPLATE: &str = include_str!("../../templates/form.html");
const TASKS_TEMPLATE: &str = include_str!("../../templates/tasks.html");

const EMAIL_ERROR: &str = "Invalid e-mail";
const PASSWORD_ERROR: &str = "Password must have at least 6 characters";
const REPASSWORD_ERROR: &str = "Passwords do not match";

// The `.html` suffix turns on autoescape
fn render(name: &str, source: &str, vars: minijinja::Value) -> AppResult<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_template(name, source)?;
    Ok(env.get_template(name)?.render(vars)?)
}

pub fn render_form(
    mode: FormMode,
    fields: &FormFields,
    validation: &FieldValidation,
    alert: Option<&str>,
) -> AppResult<String> {
    render(
        "form.html",
        FORM_TEMPLATE,
        context! {
            signup => mode == FormMode::SignUp,
            email => fields.email,
            password => fields.password,
            repassword => fields.repassword,
            remember => fields.remember,
            email_error => validation.email_error,
            password_error => validation.password_error,
            repassword_error => validation.repassword_error,
            submit_enabled => validation.submit_enabled,
            messages => context! {
                email => EMAIL_ERROR,
                password => PASSWORD_ERROR,
                repassword => REPASSWORD_ERROR,
            },
            alert => alert,
        },
    )
}

pub fn render_tasks(user: &User) -> AppResult<String> {
    render("tasks.html", TASKS_TEMPLATE, context! { email => user.email })
}
