//! Chunked reading of local files
//!
//! The server tracks every file as a table of fixed-size chunks indexed from zero.
//! Uploading (or verifying) a file means walking the local copy in the same
//! geometry. `ChunkStream` describes that walk; each pass opens the file afresh,
//! so a stream can be replayed as many times as needed.
//!
//! Reads are strict: every chunk except the last must come back full. A short
//! read anywhere else means the local file is smaller than the chunk count the
//! caller expects, which is reported as [`ChunkError::Truncated`].

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
    #[error("failed to open the file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read the file {} at byte offset {offset}: {source}", .path.display())]
    Read {
        path: PathBuf,
        offset: u64,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected EOF while reading the file {}: chunk {chunk} of {expected} came up short", .path.display())]
    Truncated {
        path: PathBuf,
        chunk: u64,
        expected: u64,
    },
}

/// One piece of a file, identified by its zero-based index within that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub number: u64,
    pub bytes: Vec<u8>,
}

/// Hex-encoded BLAKE3 digest of a chunk's bytes
pub fn chunk_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// A replayable description of how to split a local file into chunks.
#[derive(Debug, Clone)]
pub struct ChunkStream {
    path: PathBuf,
    chunk_size: usize,
    chunk_count: u64,
}

impl ChunkStream {
    /// Stream `chunk_count` chunks of `chunk_size` bytes from `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        chunk_size: usize,
        chunk_count: u64,
    ) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidChunkSize);
        }
        Ok(Self {
            path: path.into(),
            chunk_size,
            chunk_count,
        })
    }

    /// Stream the whole file, deriving the chunk count from its current length.
    pub fn for_file(path: impl Into<PathBuf>, chunk_size: usize) -> Result<Self, ChunkError> {
        let path = path.into();
        if chunk_size == 0 {
            return Err(ChunkError::InvalidChunkSize);
        }
        let len = std::fs::metadata(&path)
            .map_err(|source| ChunkError::Open {
                path: path.clone(),
                source,
            })?
            .len();
        let chunk_count = len.div_ceil(chunk_size as u64);
        Self::new(path, chunk_size, chunk_count)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_count(&self) -> u64 {
        self.chunk_count
    }

    /// Open the file and return a reader positioned at chunk 0.
    pub fn open(&self) -> Result<ChunkReader, ChunkError> {
        let file = File::open(&self.path).map_err(|source| ChunkError::Open {
            path: self.path.clone(),
            source,
        })?;

        Ok(ChunkReader {
            file,
            path: self.path.clone(),
            buffer: vec![0; self.chunk_size],
            next: 0,
            count: self.chunk_count,
            offset: 0,
            done: false,
        })
    }

    /// Hand every chunk to `visitor` in index order.
    ///
    /// Returning `ControlFlow::Break` from the visitor ends the walk early without
    /// error. A visitor error aborts the walk and is returned as-is. The chunk
    /// buffer is reused between calls, so the visitor must copy what it keeps.
    pub fn for_each<F, E>(&self, mut visitor: F) -> Result<(), E>
    where
        F: FnMut(u64, &[u8]) -> Result<ControlFlow<()>, E>,
        E: From<ChunkError>,
    {
        let mut reader = self.open()?;
        while let Some((number, bytes)) = reader.next_chunk()? {
            if visitor(number, bytes)?.is_break() {
                tracing::debug!(path = %self.path.display(), chunk = number, "chunk walk stopped early");
                break;
            }
        }
        Ok(())
    }
}

/// An open pass over a [`ChunkStream`]. The file handle is released on drop.
#[derive(Debug)]
pub struct ChunkReader {
    file: File,
    path: PathBuf,
    buffer: Vec<u8>,
    next: u64,
    count: u64,
    offset: u64,
    done: bool,
}

impl ChunkReader {
    /// Read the next chunk into the internal buffer.
    ///
    /// Returns `Ok(None)` once every expected chunk has been produced, and keeps
    /// returning `Ok(None)` after the first error.
    pub fn next_chunk(&mut self) -> Result<Option<(u64, &[u8])>, ChunkError> {
        if self.done || self.next >= self.count {
            self.done = true;
            return Ok(None);
        }

        let number = self.next;
        let filled = match self.fill_buffer() {
            Ok(filled) => filled,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        let is_last = number + 1 == self.count;
        if filled == 0 || (filled < self.buffer.len() && !is_last) {
            self.done = true;
            return Err(ChunkError::Truncated {
                path: self.path.clone(),
                chunk: number,
                expected: self.count,
            });
        }

        self.next += 1;
        self.offset += filled as u64;
        Ok(Some((number, &self.buffer[..filled])))
    }

    /// Fill the buffer until it is full or the file hits EOF.
    fn fill_buffer(&mut self) -> Result<usize, ChunkError> {
        let mut filled = 0;
        while filled < self.buffer.len() {
            match self.file.read(&mut self.buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(ChunkError::Read {
                        path: self.path.clone(),
                        offset: self.offset + filled as u64,
                        source,
                    })
                }
            }
        }
        Ok(filled)
    }
}

impl Iterator for ChunkReader {
    type Item = Result<Chunk, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_chunk() {
            Ok(Some((number, bytes))) => Some(Ok(Chunk {
                number,
                bytes: bytes.to_vec(),
            })),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl std::iter::FusedIterator for ChunkReader {}
