pub mod login;

pub use login::{LoginRequest, LoginResponse, ServerCapabilities};
