use std::error::Error;

use freezer::api::client::{ApiClient, ApiError};
use freezer::{AppState, Credentials, Remote, Session, SessionError};

use crate::cli::args::Args;

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("no {0} configured; pass --{0} or set it in the config file")]
    MissingSetting(&'static str),
    #[error("failed to create API client: {0}")]
    Client(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

pub struct OpContext {
    /// HTTP client every request goes through
    pub client: ApiClient,
    /// Authenticated session, fixed for the whole invocation
    pub session: Session,
    /// Account the session belongs to
    pub user: String,
    /// Loaded configuration
    pub state: AppState,
}

impl OpContext {
    /// Merge flags over the config file, build the client and log in.
    pub async fn connect(args: &Args, state: AppState) -> Result<Self, ConnectError> {
        let config = &state.config;

        let host = args
            .host
            .clone()
            .or_else(|| config.host.clone())
            .ok_or(ConnectError::MissingSetting("host"))?;
        let user = args
            .user
            .clone()
            .or_else(|| config.user.clone())
            .ok_or(ConnectError::MissingSetting("user"))?;
        let password = args
            .password
            .clone()
            .ok_or(ConnectError::MissingSetting("password"))?;
        let crypto_pass = args
            .crypto_pass
            .clone()
            .ok_or(ConnectError::MissingSetting("crypto-pass"))?;

        let mut tls_config = config.clone();
        if args.tls_cert.is_some() {
            tls_config.tls_cert = args.tls_cert.clone();
        }
        if args.tls_key.is_some() {
            tls_config.tls_key = args.tls_key.clone();
        }
        let tls = tls_config.tls_identity();

        let request_timeout = args
            .timeout_secs
            .map(std::time::Duration::from_secs)
            .or_else(|| config.request_timeout());

        let client = ApiClient::new(tls.as_ref())?;
        let credentials = Credentials {
            user: user.clone(),
            password,
            crypto_pass,
        };
        let session = Session::login(&client, host, &credentials, tls, request_timeout).await?;

        Ok(Self {
            client,
            session,
            user,
            state,
        })
    }

    pub fn remote(&self) -> Remote<'_> {
        Remote::new(&self.session, &self.client)
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
