//! The per-module compile analysis.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use kiln_common::ContentHash;
use serde::{Deserialize, Serialize};

/// What one source file contributed to the last compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Content hash of the source when it was compiled.
    pub hash: ContentHash,
    /// Binary names of the classes it produced.
    pub classes: BTreeSet<String>,
    /// Other sources of the same module it referenced.
    pub source_deps: BTreeSet<PathBuf>,
    /// Classes from the classpath it referenced, with the API fingerprint
    /// each had at compile time.
    pub binary_deps: BTreeMap<String, ContentHash>,
}

impl SourceInfo {
    /// A source with the given hash and no recorded outputs or dependencies.
    pub fn new(hash: ContentHash) -> Self {
        Self {
            hash,
            classes: BTreeSet::new(),
            source_deps: BTreeSet::new(),
            binary_deps: BTreeMap::new(),
        }
    }
}

/// One class produced by the module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// The source that defines it.
    pub source: PathBuf,
    /// Class file path relative to the output directory.
    pub class_file: PathBuf,
    /// Fingerprint of the class's public API.
    pub api_hash: ContentHash,
}

/// The dependency graph and source/class mapping of one output directory.
///
/// Both maps are ordered so that two analyses with the same content compare
/// equal and encode to the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileAnalysis {
    sources: BTreeMap<PathBuf, SourceInfo>,
    classes: BTreeMap<String, ClassInfo>,
}

impl CompileAnalysis {
    /// An analysis with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no source has been recorded.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Every recorded source.
    pub fn sources(&self) -> &BTreeMap<PathBuf, SourceInfo> {
        &self.sources
    }

    /// Every recorded class.
    pub fn classes(&self) -> &BTreeMap<String, ClassInfo> {
        &self.classes
    }

    /// The record for `path`.
    pub fn source(&self, path: &Path) -> Option<&SourceInfo> {
        self.sources.get(path)
    }

    /// The record for binary class `name`.
    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    /// API fingerprint of class `name`, if this module defines it.
    pub fn api_of(&self, name: &str) -> Option<ContentHash> {
        self.classes.get(name).map(|c| c.api_hash)
    }

    /// Records a source and the classes it produced, replacing any earlier
    /// record of the same source.
    ///
    /// `source.classes` is overwritten with the names in `classes`.
    pub fn record(
        &mut self,
        path: PathBuf,
        mut source: SourceInfo,
        classes: Vec<(String, ClassInfo)>,
    ) {
        self.remove_source(&path);
        source.classes = classes.iter().map(|(name, _)| name.clone()).collect();
        for (name, info) in classes {
            self.classes.insert(name, info);
        }
        self.sources.insert(path, source);
    }

    /// Removes a source and every class it produced.
    pub fn remove_source(&mut self, path: &Path) -> Option<SourceInfo> {
        let removed = self.sources.remove(path)?;
        for class in &removed.classes {
            if self.classes.get(class).is_some_and(|c| c.source == path) {
                self.classes.remove(class);
            }
        }
        Some(removed)
    }

    /// Sources that reference `path` directly.
    pub fn dependents_of(&self, path: &Path) -> BTreeSet<PathBuf> {
        self.sources
            .iter()
            .filter(|(_, info)| info.source_deps.contains(path))
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Class files of `path`, relative to the output directory.
    pub fn class_files(&self, path: &Path) -> Vec<PathBuf> {
        let Some(source) = self.sources.get(path) else {
            return Vec::new();
        };
        source
            .classes
            .iter()
            .filter_map(|name| self.classes.get(name))
            .map(|c| c.class_file.clone())
            .collect()
    }
}
