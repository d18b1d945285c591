//! On-disk persistence of analysis contents.
//!
//! A store file is a 4-byte little-endian header length, a bincode header
//! (magic bytes, format version, producing kiln version, payload checksum)
//! and the bincode-encoded [`AnalysisContents`] payload.

use std::io::Write;
use std::path::{Path, PathBuf};

use kiln_common::ContentHash;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::CompileAnalysis;
use crate::error::AnalysisError;
use crate::setup::{AnalysisContents, PreviousResult, Setup};

/// Magic bytes identifying a kiln analysis store.
const STORE_MAGIC: [u8; 4] = *b"KILN";

/// Current store format version. Increment on breaking changes to the
/// header or payload format.
const STORE_FORMAT_VERSION: u32 = 1;

/// Header prepended to every store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreHeader {
    magic: [u8; 4],
    format_version: u32,
    kiln_version: String,
    checksum: ContentHash,
}

#[derive(Serialize)]
struct ContentsRef<'a> {
    analysis: &'a CompileAnalysis,
    setup: &'a Setup,
}

/// The persisted analysis of one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisStore {
    path: PathBuf,
}

impl AnalysisStore {
    /// A store backed by the file at `path`. Nothing is read until
    /// [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the store file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the previous result.
    ///
    /// A missing file is an empty result. A file that exists but cannot be
    /// decoded is reported as [`AnalysisError::CorruptStore`] rather than
    /// silently treated as empty.
    pub fn load(&self) -> Result<PreviousResult, AnalysisError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(store = %self.path.display(), "no previous analysis");
                return Ok(PreviousResult::empty());
            }
            Err(e) => {
                return Err(AnalysisError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        let contents = decode(&raw).map_err(|reason| AnalysisError::CorruptStore {
            path: self.path.clone(),
            reason,
        })?;
        debug!(
            store = %self.path.display(),
            sources = contents.analysis.sources().len(),
            "loaded previous analysis"
        );
        Ok(PreviousResult::new(contents))
    }

    /// Replaces the stored contents with `analysis` and `setup`.
    ///
    /// Readers observe either the previous file or the complete new one.
    pub fn commit(&self, analysis: &CompileAnalysis, setup: &Setup) -> Result<(), AnalysisError> {
        let staged = self.stage(analysis, setup)?;
        staged.persist(&self.path).map_err(|e| AnalysisError::Io {
            path: self.path.clone(),
            source: e.error,
        })?;
        debug!(store = %self.path.display(), "committed analysis");
        Ok(())
    }

    /// Writes the encoded contents to a synced temporary file next to the
    /// store without replacing it.
    pub(crate) fn stage(
        &self,
        analysis: &CompileAnalysis,
        setup: &Setup,
    ) -> Result<tempfile::NamedTempFile, AnalysisError> {
        let bytes = encode(&ContentsRef { analysis, setup })?;
        let io_err = |e| AnalysisError::Io {
            path: self.path.clone(),
            source: e,
        };
        let mut staged = kiln_common::fs::stage_in_parent(&self.path).map_err(io_err)?;
        staged.write_all(&bytes).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        Ok(staged)
    }
}

fn encode(contents: &ContentsRef<'_>) -> Result<Vec<u8>, AnalysisError> {
    let serialization = |e: bincode::error::EncodeError| AnalysisError::Serialization {
        reason: e.to_string(),
    };
    let payload = bincode::serde::encode_to_vec(contents, bincode::config::standard())
        .map_err(serialization)?;
    let header = StoreHeader {
        magic: STORE_MAGIC,
        format_version: STORE_FORMAT_VERSION,
        kiln_version: env!("CARGO_PKG_VERSION").to_string(),
        checksum: ContentHash::from_bytes(&payload),
    };
    let header_bytes =
        bincode::serde::encode_to_vec(&header, bincode::config::standard()).map_err(serialization)?;

    let header_len = header_bytes.len() as u32;
    let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    output.extend_from_slice(&header_len.to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(&payload);
    Ok(output)
}

fn decode(raw: &[u8]) -> Result<AnalysisContents, String> {
    let Some((len_bytes, rest)) = raw.split_first_chunk::<4>() else {
        return Err(format!("file is {} bytes, too short for a header", raw.len()));
    };
    let header_len = u32::from_le_bytes(*len_bytes) as usize;
    if rest.len() < header_len {
        return Err("truncated header".to_string());
    }
    let (header_bytes, payload) = rest.split_at(header_len);

    let (header, _): (StoreHeader, usize) =
        bincode::serde::decode_from_slice(header_bytes, bincode::config::standard())
            .map_err(|e| format!("unreadable header: {e}"))?;
    if header.magic != STORE_MAGIC {
        return Err("bad magic bytes".to_string());
    }
    if header.format_version != STORE_FORMAT_VERSION {
        return Err(format!(
            "format version {} written by kiln {}, expected {STORE_FORMAT_VERSION}",
            header.format_version, header.kiln_version
        ));
    }
    let actual = ContentHash::from_bytes(payload);
    if actual != header.checksum {
        return Err(format!(
            "checksum mismatch: expected {}, got {actual}",
            header.checksum
        ));
    }

    let (contents, _): (AnalysisContents, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| format!("unreadable payload: {e}"))?;
    Ok(contents)
}
