use crate::api::client::{ApiError, ApiRequest, Dispatch, DispatchRequest};
use crate::session::Session;

/// An authenticated view of the server: a session plus the dispatcher that
/// carries its requests.
#[derive(Clone, Copy)]
pub struct Remote<'a> {
    session: &'a Session,
    dispatcher: &'a dyn Dispatch,
}

impl<'a> Remote<'a> {
    pub fn new(session: &'a Session, dispatcher: &'a dyn Dispatch) -> Self {
        Self {
            session,
            dispatcher,
        }
    }

    pub fn session(&self) -> &'a Session {
        self.session
    }

    /// Run a typed request with the session's bearer token attached.
    pub async fn call<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let url = self.session.endpoint(&request.path())?;
        let body = self
            .dispatcher
            .dispatch(DispatchRequest {
                method: R::METHOD,
                url: url.clone(),
                token: Some(self.session.token.clone()),
                body: request.body()?,
                timeout: self.session.request_timeout,
            })
            .await?;

        R::parse(&body).map_err(|source| ApiError::Decode { url, source })
    }
}
