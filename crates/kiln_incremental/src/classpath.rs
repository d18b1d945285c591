//! Resolution of class fingerprints against the external classpath.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use kiln_analysis::{CompileAnalysis, CrossModuleAnalysisLookup, DefinesClass};
use kiln_common::ContentHash;

struct Entry {
    analysis: Option<Arc<CompileAnalysis>>,
    probe: DefinesClass,
}

/// Finds which classpath entry supplies a class, and its fingerprint.
///
/// Entries are searched in classpath order. For each entry the upstream
/// module's analysis is consulted first (its API fingerprint), then the
/// entry's class files (their content hash). Results are memoised.
pub struct ClasspathIndex {
    entries: Vec<(PathBuf, Entry)>,
    resolved: HashMap<String, Option<ContentHash>>,
}

impl ClasspathIndex {
    /// Indexes `classpath` through `lookup`.
    pub fn new<'a>(
        lookup: &CrossModuleAnalysisLookup,
        classpath: impl IntoIterator<Item = &'a PathBuf>,
    ) -> Self {
        let entries = classpath
            .into_iter()
            .map(|path| {
                let entry = Entry {
                    analysis: lookup.analysis_for(path),
                    probe: lookup.defines_class(path),
                };
                (path.clone(), entry)
            })
            .collect();
        Self {
            entries,
            resolved: HashMap::new(),
        }
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the classpath is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fingerprint of binary class `name`, or `None` if no entry supplies it.
    pub fn fingerprint(&mut self, name: &str) -> Option<ContentHash> {
        if let Some(cached) = self.resolved.get(name) {
            return *cached;
        }
        let found = self.entries.iter().find_map(|(_, entry)| {
            if let Some(api) = entry.analysis.as_ref().and_then(|a| a.api_of(name)) {
                return Some(api);
            }
            entry.probe.fingerprint(name)
        });
        self.resolved.insert(name.to_string(), found);
        found
    }
}
