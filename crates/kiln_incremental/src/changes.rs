//! Source hashing and change detection against the previous analysis.

use std::collections::BTreeMap;
use std::path::PathBuf;

use kiln_analysis::CompileAnalysis;
use kiln_common::ContentHash;
use rayon::prelude::*;

use crate::error::EngineError;

/// How the current sources differ from the ones an analysis recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Sources the analysis has never seen.
    pub new_files: Vec<PathBuf>,
    /// Sources whose content hash differs from the analysis.
    pub modified_files: Vec<PathBuf>,
    /// Sources in the analysis that are no longer part of the module.
    pub deleted_files: Vec<PathBuf>,
    /// Sources whose content hash matches the analysis.
    pub unchanged_files: Vec<PathBuf>,
}

impl ChangeSet {
    /// Compares `hashes` against `analysis`. Every list is sorted.
    pub fn detect(hashes: &BTreeMap<PathBuf, ContentHash>, analysis: &CompileAnalysis) -> Self {
        let mut changes = ChangeSet::default();
        for (path, hash) in hashes {
            match analysis.source(path) {
                Some(info) if info.hash == *hash => changes.unchanged_files.push(path.clone()),
                Some(_) => changes.modified_files.push(path.clone()),
                None => changes.new_files.push(path.clone()),
            }
        }
        changes.deleted_files = analysis
            .sources()
            .keys()
            .filter(|p| !hashes.contains_key(*p))
            .cloned()
            .collect();
        changes
    }

    /// Returns `true` if nothing was added, modified or deleted.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// New and modified sources.
    pub fn dirty(&self) -> impl Iterator<Item = &PathBuf> {
        self.new_files.iter().chain(&self.modified_files)
    }
}

/// Hashes every source in parallel.
///
/// Unlike a build cache, a source that cannot be read is an error: the
/// compiler would fail on it anyway.
pub fn hash_sources(sources: &[PathBuf]) -> Result<BTreeMap<PathBuf, ContentHash>, EngineError> {
    sources
        .par_iter()
        .map(|path| {
            ContentHash::from_file(path)
                .map(|hash| (path.clone(), hash))
                .map_err(|e| EngineError::Io {
                    path: path.clone(),
                    source: e,
                })
        })
        .collect()
}
