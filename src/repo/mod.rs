mod file_repo;
mod user_repo;

pub use file_repo::FileRepo;
pub use user_repo::UserRepo;
