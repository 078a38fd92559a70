use std::fs;
use std::path::PathBuf;

use bytes::Bytes;
use reqwest::{Certificate, Client, Identity, StatusCode};

use super::error::ApiError;
use super::{Dispatch, DispatchRequest, RequestBody};

/// Client certificate and private key for mutual TLS.
///
/// The certificate file doubles as the only trusted root, which fits a server
/// running on a self-signed certificate shared with its clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsIdentity {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Build a client, with mutual TLS when an identity is given.
    pub fn new(tls: Option<&TlsIdentity>) -> Result<Self, ApiError> {
        let client = match tls {
            Some(identity) => Self::tls_client(identity)?,
            None => Client::builder().build()?,
        };

        Ok(Self { client })
    }

    fn tls_client(identity: &TlsIdentity) -> Result<Client, ApiError> {
        let tls_error = |path: &PathBuf, reason: String| ApiError::TlsConfig {
            path: path.clone(),
            reason,
        };

        let cert_pem = fs::read(&identity.cert_path)
            .map_err(|e| tls_error(&identity.cert_path, format!("unable to read certificate: {e}")))?;
        let key_pem = fs::read(&identity.key_path)
            .map_err(|e| tls_error(&identity.key_path, format!("unable to read private key: {e}")))?;

        let root = Certificate::from_pem(&cert_pem)
            .map_err(|e| tls_error(&identity.cert_path, format!("couldn't load PEM data: {e}")))?;

        // reqwest wants the certificate chain and the key in a single PEM buffer
        let mut bundle = cert_pem.clone();
        if !bundle.ends_with(b"\n") {
            bundle.push(b'\n');
        }
        bundle.extend_from_slice(&key_pem);
        let client_identity = Identity::from_pem(&bundle)
            .map_err(|e| tls_error(&identity.key_path, format!("unable to load cert: {e}")))?;

        Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .add_root_certificate(root)
            .identity(client_identity)
            .build()
            .map_err(|e| tls_error(&identity.cert_path, e.to_string()))
    }
}

#[async_trait::async_trait]
impl Dispatch for ApiClient {
    async fn dispatch(&self, request: DispatchRequest) -> Result<Bytes, ApiError> {
        let DispatchRequest {
            method,
            url,
            token,
            body,
            timeout,
        } = request;

        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Raw(bytes) => builder.body(bytes),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.form(&fields),
        };

        tracing::debug!(%method, %url, "dispatching request");

        let transport_error = |source| ApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if status != StatusCode::OK {
            tracing::debug!(%method, %url, %status, "request failed");
            return Err(ApiError::HttpStatus {
                method,
                url,
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body)
    }
}
