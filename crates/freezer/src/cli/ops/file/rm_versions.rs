use clap::Args;

use freezer::{MaxVersion, PruneError, VersionPruner};

#[derive(Args, Debug, Clone)]
pub struct RmVersions {
    /// Plaintext name of the file to prune
    #[arg(long, group = "file_identifier")]
    pub name: Option<String>,

    /// Prune every file whose name matches this regular expression
    #[arg(long, group = "file_identifier")]
    pub regex: Option<String>,

    /// Lowest version number to delete
    #[arg(long, default_value_t = 0)]
    pub min: u64,

    /// Highest version number to delete, or H~ for the one before the latest
    #[arg(long)]
    pub max: String,

    /// Report what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RmVersionsError {
    #[error("must specify one of --name or --regex")]
    NoFileIdentifier,
    #[error(transparent)]
    Prune(#[from] PruneError),
    #[error("{report}\n{failed} of {total} files failed")]
    Partial {
        report: String,
        failed: usize,
        total: usize,
    },
}

#[async_trait::async_trait]
impl crate::cli::op::Op for RmVersions {
    type Error = RmVersionsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let max: MaxVersion = self.max.parse()?;
        let pruner = VersionPruner::new(ctx.remote());
        let verb = if self.dry_run { "would remove" } else { "removed" };

        if let Some(name) = &self.name {
            let (_, max) = pruner
                .prune_by_name(name, self.min, max, self.dry_run)
                .await?;
            return Ok(format!("{} -- {} versions {} to {}", name, verb, self.min, max));
        }

        let pattern = self.regex.as_deref().ok_or(RmVersionsError::NoFileIdentifier)?;
        let outcomes = pruner
            .prune_matching(pattern, self.min, max, self.dry_run)
            .await?;
        if outcomes.is_empty() {
            return Ok(format!("Nothing to prune for files matching {}", pattern));
        }

        let mut failed = 0;
        let lines: Vec<String> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(()) => format!(
                    "{} -- {} versions {} to {}",
                    outcome.name, verb, outcome.min_version, outcome.max_version
                ),
                Err(e) => {
                    failed += 1;
                    format!("{} -- failed to remove versions: {}", outcome.name, e)
                }
            })
            .collect();

        let report = lines.join("\n");
        if failed > 0 {
            return Err(RmVersionsError::Partial {
                report,
                failed,
                total: outcomes.len(),
            });
        }
        Ok(report)
    }
}
