mod file_model;
mod user_model;

pub use file_model::{FileHeader, FileRecord, UploadedFile};
pub use user_model::{LoginForm, SignupForm, User};
