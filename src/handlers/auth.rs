use axum::{
    extract::{Extension, Form, Query, State},
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use crate::app::AppState;
use crate::errors::AppResult;
use crate::form::{render, AuthForm, FieldValidation, Submission};
use crate::middleware::ClientId;
use crate::models::{FormFields, FormMode, SignInForm, SignUpForm, ValidateForm};
use crate::services::{marker, ClientScopedStore, MarkerStores, SessionScopedStore};

// Filled by the `?error=` redirects of user-facing errors
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    pub error: Option<String>,
}

fn blank_page(mode: FormMode, alert: Option<&str>) -> AppResult<Html<String>> {
    let fields = FormFields::default();
    let validation = crate::form::validate(mode, &fields);
    Ok(Html(render::render_form(mode, &fields, &validation, alert)?))
}

pub async fn serve_signin_page(Query(query): Query<AlertQuery>) -> AppResult<Html<String>> {
    blank_page(FormMode::SignIn, query.error.as_deref())
}

pub async fn serve_signup_page(Query(query): Query<AlertQuery>) -> AppResult<Html<String>> {
    blank_page(FormMode::SignUp, query.error.as_deref())
}

async fn submit(
    state: &AppState,
    client_id: &ClientId,
    session: Session,
    mode: FormMode,
    fields: FormFields,
) -> AppResult<Response> {
    let mut form = AuthForm::mount(mode, state.durable.clone(), state.config.storage.clone()).await;
    form.fill(fields);

    let client_store = ClientScopedStore::new(state.durable.clone(), &client_id.0);
    let session_store = SessionScopedStore::new(session);
    let markers = MarkerStores { durable: &client_store, session: &session_store };

    match form.submit(markers).await? {
        Submission::SignedIn { redirect_to, .. } => Ok(Redirect::to(redirect_to).into_response()),
        // The emptied sign-up form is shown again
        Submission::Registered => {
            let html = render::render_form(form.mode(), form.fields(), &form.validation(), None)?;
            Ok(Html(html).into_response())
        }
    }
}

#[axum::debug_handler]
pub async fn handle_signin(
    State(state): State<AppState>,
    Extension(client_id): Extension<ClientId>,
    session: Session,
    Form(signin_form): Form<SignInForm>,
) -> AppResult<Response> {
    tracing::info!("Sign-in attempt for: {}", signin_form.email);
    submit(&state, &client_id, session, FormMode::SignIn, signin_form.into()).await
}

#[axum::debug_handler]
pub async fn handle_signup(
    State(state): State<AppState>,
    Extension(client_id): Extension<ClientId>,
    session: Session,
    Form(signup_form): Form<SignUpForm>,
) -> AppResult<Response> {
    tracing::info!("Sign-up attempt for: {}", signup_form.email);
    submit(&state, &client_id, session, FormMode::SignUp, signup_form.into()).await
}

pub async fn handle_validate(Form(validate_form): Form<ValidateForm>) -> Json<FieldValidation> {
    let mode = validate_form.mode;
    Json(crate::form::validate(mode, &validate_form.into()))
}

#[axum::debug_handler]
pub async fn handle_logout(
    State(state): State<AppState>,
    Extension(client_id): Extension<ClientId>,
    session: Session,
) -> Response {
    let client_store = ClientScopedStore::new(state.durable.clone(), &client_id.0);
    let session_store = SessionScopedStore::new(session);
    let markers = MarkerStores { durable: &client_store, session: &session_store };

    if let Err(e) = marker::clear(markers, &state.config.storage.marker_key).await {
        tracing::warn!("Marker removal error: {}", e);
    }
    Redirect::to("/").into_response()
}
