//! Authenticated session state
//!
//! A `Session` is built once by [`Session::login`] and then only ever read.
//! Every component takes it by reference; nothing mutates it after login.

use std::time::Duration;

use common::crypto::CryptoKey;
use url::Url;

use crate::api::client::{ApiError, ApiRequest, Dispatch, DispatchRequest, TlsIdentity};
use crate::api::v0::users::{LoginRequest, ServerCapabilities};

#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    /// Passphrase the file name key is derived from
    pub crypto_pass: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    /// Base URI of the server, e.g. `https://backup.example.com:8040`
    pub host: Url,
    /// Bearer token returned at login
    pub token: String,
    /// Salt for the name key, as returned at login
    pub crypto_hash: String,
    pub key: CryptoKey,
    pub capabilities: ServerCapabilities,
    pub tls: Option<TlsIdentity>,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("authentication failed: {0}")]
    Api(#[from] ApiError),
    #[error("server at {0} returned an empty token")]
    MissingToken(Url),
}

impl Session {
    /// Log in with a username and password and derive the name key.
    pub async fn login(
        dispatcher: &dyn Dispatch,
        host: Url,
        credentials: &Credentials,
        tls: Option<TlsIdentity>,
        request_timeout: Option<Duration>,
    ) -> Result<Self, SessionError> {
        let request = LoginRequest {
            user: credentials.user.clone(),
            password: credentials.password.clone(),
        };
        let url = endpoint(&host, &request.path()).map_err(ApiError::from)?;

        let body = dispatcher
            .dispatch(DispatchRequest {
                method: LoginRequest::METHOD,
                url: url.clone(),
                token: None,
                body: request.body()?,
                timeout: request_timeout,
            })
            .await?;
        let login = LoginRequest::parse(&body).map_err(|source| ApiError::Decode {
            url: url.clone(),
            source,
        })?;

        if login.token.is_empty() {
            return Err(SessionError::MissingToken(url));
        }

        tracing::info!(user = %credentials.user, %host, "authenticated");

        Ok(Self {
            key: CryptoKey::derive(&credentials.crypto_pass, &login.crypto_hash),
            host,
            token: login.token,
            crypto_hash: login.crypto_hash,
            capabilities: login.capabilities,
            tls,
            request_timeout,
        })
    }

    /// Full URL for an API path on this session's host.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        endpoint(&self.host, path)
    }
}

fn endpoint(host: &Url, path: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}{}", host.as_str().trim_end_matches('/'), path))
}
