use axum::{
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    extract::{Extension, Request, State},
};
use tower_sessions::Session;
use crate::app::AppState;
use crate::services::{marker, ClientScopedStore, MarkerStores, SessionScopedStore};
use super::client::ClientId;

fn is_public(path: &str) -> bool {
    matches!(path, "/" | "/signin" | "/signup" | "/validate" | "/logout")
        || path.starts_with("/static/")
}

/// Pages other than the form need a logged-in marker in either of this client's stores.
pub async fn require_login(
    State(state): State<AppState>,
    Extension(client_id): Extension<ClientId>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Response {
    if is_public(req.uri().path()) {
        return next.run(req).await;
    }

    let client_store = ClientScopedStore::new(state.durable.clone(), &client_id.0);
    let session_store = SessionScopedStore::new(session);
    let markers = MarkerStores { durable: &client_store, session: &session_store };

    match marker::current_user(markers, &state.config.storage.marker_key).await {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => Redirect::to("/").into_response(),
    }
}
