use clap::Args;

use freezer::api::v0::file::FileId;
use freezer::{FileOps, FileOpsError};

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// Plaintext name of the file to remove
    #[arg(long, group = "file_identifier")]
    pub name: Option<String>,

    /// Remove every file whose name matches this regular expression
    #[arg(long, group = "file_identifier")]
    pub regex: Option<String>,

    /// Remove by numeric file id
    #[arg(long, group = "file_identifier")]
    pub id: Option<FileId>,

    /// Report what would be removed without removing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RmError {
    #[error("must specify one of --name, --regex or --id")]
    NoFileIdentifier,
    #[error(transparent)]
    FileOps(#[from] FileOpsError),
    #[error("{report}\n{failed} of {total} removals failed")]
    Partial {
        report: String,
        failed: usize,
        total: usize,
    },
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Rm {
    type Error = RmError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let ops = FileOps::new(ctx.remote());

        if let Some(name) = &self.name {
            let file = ops.rm_file(name, self.dry_run).await?;
            return Ok(if self.dry_run {
                format!("Would remove file: {} (id {})", name, file.file_id)
            } else {
                format!("Removed file: {}", name)
            });
        }

        if let Some(id) = self.id {
            if self.dry_run {
                return Ok(format!("Would remove file with id {}", id));
            }
            ops.rm_file_by_id(id).await?;
            return Ok(format!("Removed file with id {}", id));
        }

        let pattern = self.regex.as_deref().ok_or(RmError::NoFileIdentifier)?;
        let outcomes = ops.rm_matching(pattern, self.dry_run).await?;
        if outcomes.is_empty() {
            return Ok(format!("No files match {}", pattern));
        }

        let mut failed = 0;
        let lines: Vec<String> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(()) if self.dry_run => format!("Would remove file: {}", outcome.name),
                Ok(()) => format!("Removed file: {}", outcome.name),
                Err(e) => {
                    failed += 1;
                    format!("Failed to remove {}: {}", outcome.name, e)
                }
            })
            .collect();

        let report = lines.join("\n");
        if failed > 0 {
            return Err(RmError::Partial {
                report,
                failed,
                total: outcomes.len(),
            });
        }
        Ok(report)
    }
}
