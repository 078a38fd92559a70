use clap::Args;

use freezer::StateError;

#[derive(Args, Debug, Clone)]
pub struct Login {
    /// Store host, user and TLS paths in the config file for later runs
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("failed to save config: {0}")]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Login {
    type Error = LoginError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let session = &ctx.session;
        let mut lines = vec![
            format!("Authenticated as {} on {}", ctx.user, session.host),
            format!("  chunk size: {} bytes", session.capabilities.chunk_size),
        ];

        if self.save {
            let mut state = ctx.state.clone();
            state.config.host = Some(session.host.clone());
            state.config.user = Some(ctx.user.clone());
            if let Some(tls) = &session.tls {
                state.config.tls_cert = Some(tls.cert_path.clone());
                state.config.tls_key = Some(tls.key_path.clone());
            }
            state.config.request_timeout_secs = session.request_timeout.map(|t| t.as_secs());
            state.save()?;
            lines.push(format!("Saved config to {}", state.config_path.display()));
        }

        Ok(lines.join("\n"))
    }
}
