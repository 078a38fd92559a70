use std::path::PathBuf;

use clap::Args;

use freezer::api::v0::file::FileId;
use freezer::{FileOps, FileOpsError};

#[derive(Args, Debug, Clone)]
pub struct MissingChunks {
    /// Numeric file id
    #[arg(long)]
    pub id: FileId,

    /// Local copy of the file; lists the pending chunks with their sizes and hashes
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Chunk size in bytes (defaults to the size the server announced at login)
    #[arg(long)]
    pub chunk_size: Option<u64>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for MissingChunks {
    type Error = FileOpsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let ops = FileOps::new(ctx.remote());

        let Some(path) = &self.path else {
            let missing = ops.missing_chunks(self.id).await?;
            if missing.is_empty() {
                return Ok(format!("File {} has no missing chunks", self.id));
            }
            let list: Vec<String> = missing.iter().map(u64::to_string).collect();
            return Ok(format!(
                "File {} is missing {} chunks: {}",
                self.id,
                missing.len(),
                list.join(", ")
            ));
        };

        let chunk_size = self
            .chunk_size
            .unwrap_or(ctx.session.capabilities.chunk_size);
        let pending = ops.pending_chunks(self.id, path, chunk_size).await?;
        if pending.is_empty() {
            return Ok(format!("File {} has no missing chunks", self.id));
        }

        let mut output = format!("File {} is missing {} chunks:\n", self.id, pending.len());
        for chunk in pending {
            output.push_str(&format!(
                "  chunk {}: {} bytes, blake3 {}\n",
                chunk.number, chunk.len, chunk.hash
            ));
        }
        Ok(output)
    }
}
