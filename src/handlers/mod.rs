mod auth;
mod tasks;

pub use auth::{
    handle_logout, handle_signin, handle_signup, handle_validate, serve_signin_page,
    serve_signup_page,
};
pub use tasks::serve_tasks_page;
