use axum::{
    routing::{get, post},
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
};
use tower_http::{
    services::ServeDir,
    limit::RequestBodyLimitLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::SameSite;
use std::sync::Arc;
use crate::{config::Config, handlers, middleware, services::KeyValueStore};

// Application state shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub durable: Arc<dyn KeyValueStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(durable: Arc<dyn KeyValueStore>, config: Config) -> Self {
        Self {
            durable,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Session cookies expire with the browser session
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.session.secure)
        .with_same_site(SameSite::Lax)
        .with_name(state.config.session.cookie_name.clone());

    let max_body_size = state.config.form.max_body_size;

    Router::new()
        // Form routes
        .route("/", get(handlers::serve_signin_page))
        .route("/signin", get(handlers::serve_signin_page).post(handlers::handle_signin))
        .route("/signup", get(handlers::serve_signup_page).post(handlers::handle_signup))
        .route("/validate", post(handlers::handle_validate))
        .route("/logout", get(handlers::handle_logout))

        // Pages behind the marker
        .route("/tasks", get(handlers::serve_tasks_page))

        // Static files
        .nest_service("/static", ServeDir::new("static"))

        .layer(from_fn_with_state(state.clone(), middleware::require_login))
        .layer(from_fn_with_state(state.clone(), middleware::assign_client_id))
        .layer(session_layer)

        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;
    use crate::services::InMemoryStore;

    const ONE_USER: &str = r#"[{"email":"a@b.com","password":"secret1","tasks":[]}]"#;
    const MARKER: &str = r#"{"email":"a@b.com","password":"secret1","tasks":[]}"#;

    fn test_config() -> Config {
        Config::from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 0

            [redis]
            enabled = false
            url = ""
            sentinel_enabled = false
            "#,
        )
        .unwrap()
    }

    fn app(durable: &Arc<InMemoryStore>) -> Router {
        build_router(AppState::new(durable.clone(), test_config()))
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    // `name=value` of a cookie set by the response
    fn set_cookie(response: &Response, name: &str) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .find(|pair| pair.starts_with(&format!("{}=", name)))
            .map(str::to_string)
    }

    fn cookie_value(pair: &str) -> &str {
        pair.split_once('=').map(|(_, value)| value).unwrap_or("")
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn root_serves_signin_form() {
        let durable = Arc::new(InMemoryStore::new());
        let response = app(&durable).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Stay signed in"));
    }

    #[tokio::test]
    async fn query_error_becomes_alert() {
        let durable = Arc::new(InMemoryStore::new());
        let response = app(&durable)
            .oneshot(get("/signup?error=E-mail%20already%20registered"))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains(r#"alert("E-mail already registered");"#));
    }

    #[tokio::test]
    async fn signup_registers_and_renders_cleared_form() {
        let durable = Arc::new(InMemoryStore::new());
        let response = app(&durable)
            .oneshot(form_post(
                "/signup",
                "email=x%40y.com&password=abcdef&repassword=abcdef",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"name="email" type="email" value="""#));
        assert!(!html.contains("x@y.com"));
        assert_eq!(
            durable.snapshot("listaUsuarios").as_deref(),
            Some(r#"[{"email":"x@y.com","password":"abcdef","tasks":[]}]"#)
        );
    }

    #[tokio::test]
    async fn signup_keeps_records_without_tasks() {
        let durable = Arc::new(InMemoryStore::with_value(
            "listaUsuarios",
            r#"[{"email":"a@b.com","password":"secret1"}]"#,
        ));
        app(&durable)
            .oneshot(form_post(
                "/signup",
                "email=x%40y.com&password=abcdef&repassword=abcdef",
            ))
            .await
            .unwrap();

        assert_eq!(
            durable.snapshot("listaUsuarios").as_deref(),
            Some(concat!(
                r#"[{"email":"x@y.com","password":"abcdef","tasks":[]},"#,
                r#"{"email":"a@b.com","password":"secret1","tasks":[]}]"#
            ))
        );
    }

    #[tokio::test]
    async fn signup_duplicate_redirects_with_alert_and_keeps_store() {
        let durable = Arc::new(InMemoryStore::with_value("listaUsuarios", ONE_USER));
        let response = app(&durable)
            .oneshot(form_post(
                "/signup",
                "email=a%40b.com&password=abcdef&repassword=abcdef",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/signup?error=E-mail%20already%20registered"
        );
        assert_eq!(durable.snapshot("listaUsuarios").as_deref(), Some(ONE_USER));
    }

    #[tokio::test]
    async fn invalid_signup_post_is_refused() {
        let durable = Arc::new(InMemoryStore::new());
        let response = app(&durable)
            .oneshot(form_post(
                "/signup",
                "email=bad-email&password=abcdef&repassword=abcdef",
            ))
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::LOCATION],
            "/signup?error=Form%20is%20not%20valid%20yet"
        );
        assert_eq!(durable.snapshot("listaUsuarios"), None);
    }

    #[tokio::test]
    async fn remembered_signin_redirects_to_tasks() {
        let durable = Arc::new(InMemoryStore::with_value("listaUsuarios", ONE_USER));
        let app = app(&durable);
        let response = app
            .clone()
            .oneshot(form_post(
                "/signin",
                "email=a%40b.com&password=secret1&remember=on",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/tasks");

        let client = set_cookie(&response, "client_id").unwrap();
        let marker_key = format!("client:{}:usuarioLogado", cookie_value(&client));
        assert_eq!(durable.snapshot(&marker_key).as_deref(), Some(MARKER));
        assert_eq!(durable.snapshot("usuarioLogado"), None);

        // Only the permanent client cookie is replayed, as after a browser restart
        let response = app.oneshot(get_with_cookie("/tasks", &client)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Signed in as a@b.com"));
    }

    #[tokio::test]
    async fn remembered_marker_does_not_leak_to_other_clients() {
        let durable = Arc::new(InMemoryStore::with_value("listaUsuarios", ONE_USER));
        let app = app(&durable);
        let response = app
            .clone()
            .oneshot(form_post(
                "/signin",
                "email=a%40b.com&password=secret1&remember=on",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app.clone().oneshot(get("/tasks")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = app
            .oneshot(get_with_cookie("/tasks", "client_id=someone-else"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn session_signin_opens_tasks_for_that_session() {
        let durable = Arc::new(InMemoryStore::with_value("listaUsuarios", ONE_USER));
        let app = app(&durable);
        let response = app
            .clone()
            .oneshot(form_post("/signin", "email=a%40b.com&password=secret1"))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/tasks");

        let session = set_cookie(&response, "session").unwrap();
        let client = set_cookie(&response, "client_id").unwrap();
        let marker_key = format!("client:{}:usuarioLogado", cookie_value(&client));
        assert_eq!(durable.snapshot(&marker_key), None);

        let cookies = format!("{}; {}", session, client);
        let response = app
            .clone()
            .oneshot(get_with_cookie("/tasks", &cookies))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Signed in as a@b.com"));

        // A new browser session for the same client starts signed out
        let response = app.oneshot(get_with_cookie("/tasks", &client)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn wrong_password_redirects_with_alert_and_keeps_gate_closed() {
        let durable = Arc::new(InMemoryStore::with_value("listaUsuarios", ONE_USER));
        let app = app(&durable);
        let response = app
            .clone()
            .oneshot(form_post("/signin", "email=a%40b.com&password=wrong"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/?error=Wrong%20e-mail%20or%20password"
        );

        // The session now holds a null marker
        let session = set_cookie(&response, "session").unwrap();
        let client = set_cookie(&response, "client_id").unwrap();
        let cookies = format!("{}; {}", session, client);
        let response = app.oneshot(get_with_cookie("/tasks", &cookies)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn validate_reports_field_errors() {
        let durable = Arc::new(InMemoryStore::new());
        let response = app(&durable)
            .oneshot(form_post(
                "/validate",
                "mode=signup&email=bad-email&password=abcdef&repassword=",
            ))
            .await
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["email_error"], true);
        assert_eq!(json["password_error"], false);
        assert_eq!(json["repassword_error"], false);
        assert_eq!(json["submit_enabled"], false);
    }

    #[tokio::test]
    async fn tasks_requires_marker() {
        let durable = Arc::new(InMemoryStore::new());
        let response = app(&durable).oneshot(get("/tasks")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let durable = Arc::new(InMemoryStore::with_value("client:abc:usuarioLogado", "null"));
        let response = app(&durable)
            .oneshot(get_with_cookie("/tasks", "client_id=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn first_visit_issues_permanent_client_cookie() {
        let durable = Arc::new(InMemoryStore::new());
        let response = app(&durable).oneshot(get("/")).await.unwrap();
        let header = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("client_id="))
            .unwrap()
            .to_string();
        assert!(header.contains("Max-Age="));
        assert!(header.contains("HttpOnly"));

        let response = app(&durable)
            .oneshot(get_with_cookie("/", "client_id=abc"))
            .await
            .unwrap();
        assert_eq!(set_cookie(&response, "client_id"), None);
    }

    #[tokio::test]
    async fn logout_clears_this_clients_marker_only() {
        let durable = Arc::new(InMemoryStore::with_value("client:abc:usuarioLogado", MARKER));
        durable.set("client:xyz:usuarioLogado", MARKER).await.unwrap();

        let response = app(&durable)
            .oneshot(get_with_cookie("/logout", "client_id=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(durable.snapshot("client:abc:usuarioLogado"), None);
        assert_eq!(durable.snapshot("client:xyz:usuarioLogado").as_deref(), Some(MARKER));
    }
}
