//! Content digests for single files
//!
//! Files are hashed with SHA-256 in fixed 4 KiB chunks, so memory use stays
//! constant no matter how large the file is. The chunk size is not part of
//! the digest: identical bytes always produce identical digests.
//!
//! ```rust,no_run
//! use treemirror::hasher::digest_file;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let digest = digest_file(Path::new("notes.txt"))?;
//! println!("{}", digest);
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SyncError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::trace;

/// Read size used while streaming a file into the hasher
pub const CHUNK_SIZE: usize = 4096;

/// SHA-256 content fingerprint of a file
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    fn from_output(output: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(output);
        Digest(bytes)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering (64 characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| SyncError::internal(format!("invalid digest {:?}: {}", s, e)))?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SyncError::internal(format!("digest {:?} is not 32 bytes", s)))?;
        Ok(Digest(array))
    }

    /// First eight hex characters, for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash a file's content using SHA-256
///
/// # Errors
///
/// - [`SyncError::IoAt`] if the file cannot be opened or a read fails mid-stream
pub fn digest_file(path: &Path) -> Result<Digest> {
    let mut file = File::open(path).map_err(|e| SyncError::io_at(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| SyncError::io_at(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let digest = Digest::from_output(&hasher.finalize());
    trace!("Hashed {:?}: {}", path, digest.short());
    Ok(digest)
}

/// Hash in-memory data using SHA-256
pub fn digest_bytes(data: &[u8]) -> Digest {
    Digest::from_output(&Sha256::digest(data))
}
