use clap::{Args, Subcommand};

pub mod missing_chunks;
pub mod rm;
pub mod rm_versions;
pub mod versions;

use crate::cli::op::Op;

crate::command_enum! {
    (Rm, rm::Rm),
    (Versions, versions::Versions),
    (RmVersions, rm_versions::RmVersions),
    (MissingChunks, missing_chunks::MissingChunks),
}

pub type FileCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct File {
    #[command(subcommand)]
    pub command: FileCommand,
}

#[async_trait::async_trait]
impl Op for File {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
