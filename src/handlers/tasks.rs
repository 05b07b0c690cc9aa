use axum::{extract::Extension, response::Html};
use crate::errors::AppResult;
use crate::form::render;
use crate::models::User;

// Only reachable through `require_login`, which supplies the user.
pub async fn serve_tasks_page(Extension(user): Extension<User>) -> AppResult<Html<String>> {
    Ok(Html(render::render_tasks(&user)?))
}
