// Remote API: dispatcher and typed endpoints
pub mod api;
pub mod remote;
pub mod session;

// File and version operations over the encrypted catalog
pub mod catalog;
pub mod file_ops;
pub mod prune;

// Local configuration and logging
pub mod logging;
pub mod state;

#[cfg(test)]
pub(crate) mod testkit;

// Re-exports for consumers
pub use api::client::{ApiClient, ApiError, Dispatch, RequestBody, TlsIdentity};
pub use catalog::{CatalogError, FileResolver};
pub use file_ops::{FileOps, FileOpsError};
pub use prune::{MaxVersion, PruneError, PruneOutcome, VersionPruner};
pub use remote::Remote;
pub use session::{Credentials, Session, SessionError};
pub use state::{AppConfig, AppState, StateError};
