pub mod file;
pub mod users;
