use clap::Args;

use freezer::{FileOps, FileOpsError};

#[derive(Args, Debug, Clone)]
pub struct Versions {
    /// Plaintext name of the file
    #[arg(long)]
    pub name: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Versions {
    type Error = FileOpsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let versions = FileOps::new(ctx.remote()).file_versions(&self.name).await?;

        if versions.is_empty() {
            return Ok(format!("No versions stored for {}", self.name));
        }

        let mut output = format!("Versions of {}:\n", self.name);
        for version in versions {
            let chunks = version
                .chunk_count
                .map(|count| format!(", {} chunks", count))
                .unwrap_or_default();
            output.push_str(&format!(
                "  v{}  (id {}, mode {:o}, modified {}{})\n",
                version.version_number,
                version.version_id,
                version.permissions,
                version.last_mod,
                chunks
            ));
        }
        Ok(output)
    }
}
