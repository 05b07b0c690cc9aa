use axum::{
    middleware::Next,
    response::{IntoResponse, Response},
    extract::{Request, State},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use crate::app::AppState;

/// Identifies one browser across sessions. Its durable marker lives under this id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

/// Reuses the client cookie when present, otherwise issues a permanent one.
pub async fn assign_client_id(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let session = &state.config.session;
    let existing = jar
        .get(&session.client_cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| !id.is_empty());

    let (client_id, jar) = match existing {
        Some(id) => (id, jar),
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            tracing::debug!("Issuing client id: {}", id);
            let cookie = Cookie::build((session.client_cookie_name.clone(), id.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(session.secure)
                .permanent();
            (id, jar.add(cookie))
        }
    };

    req.extensions_mut().insert(ClientId(client_id));
    (jar, next.run(req).await).into_response()
}
