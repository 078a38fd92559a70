pub mod file;
pub mod login;

pub use file::File;
pub use login::Login;
