mod user;
mod forms;
mod task;

pub use user::User;
pub use forms::{FormFields, FormMode, SignInForm, SignUpForm, ValidateForm};
pub use task::Task;
