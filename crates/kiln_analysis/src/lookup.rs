//! Cross-module access to other modules' analyses and class files.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_common::ContentHash;
use parking_lot::Mutex;
use tracing::debug;

use crate::analysis::CompileAnalysis;
use crate::layout::AnalysisLayout;
use crate::store::AnalysisStore;

/// What a classpath entry is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// A directory of class files.
    Directory,
    /// A `.jar` or `.zip` archive.
    Archive,
    /// Absent, or a file that is not an archive.
    Missing,
}

/// Answers whether one classpath entry defines a given binary class.
#[derive(Debug, Clone)]
pub enum DefinesClass {
    /// Class files laid out under a directory.
    Directory(PathBuf),
    /// Class files inside an archive, indexed by entry name.
    Archive {
        /// The archive.
        path: PathBuf,
        /// Its entry names.
        entries: HashSet<String>,
    },
    /// An entry that defines nothing.
    Nothing,
}

impl DefinesClass {
    /// Returns `true` if the entry has a class file for `name`.
    pub fn defines(&self, name: &str) -> bool {
        let file = class_file_name(name);
        match self {
            DefinesClass::Directory(root) => root.join(&file).is_file(),
            DefinesClass::Archive { entries, .. } => entries.contains(&file),
            DefinesClass::Nothing => false,
        }
    }

    /// Hash of the class file for `name`, or `None` if the entry does not
    /// define it or it cannot be read.
    pub fn fingerprint(&self, name: &str) -> Option<ContentHash> {
        let file = class_file_name(name);
        match self {
            DefinesClass::Directory(root) => ContentHash::from_file(&root.join(&file)).ok(),
            DefinesClass::Archive { path, entries } => {
                if !entries.contains(&file) {
                    return None;
                }
                let mut zip = zip::ZipArchive::new(File::open(path).ok()?).ok()?;
                let mut entry = zip.by_name(&file).ok()?;
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes).ok()?;
                Some(ContentHash::from_bytes(&bytes))
            }
            DefinesClass::Nothing => None,
        }
    }
}

/// Relative class-file path of binary class `name` (`a.b.C$` -> `a/b/C$.class`).
pub fn class_file_name(name: &str) -> String {
    format!("{}.class", name.replace('.', "/"))
}

/// Resolves classpath entries to the analyses of the modules that produced
/// them.
///
/// Only directories named in the [`AnalysisLayout`] have an analysis. Every
/// failure to read one is treated as "no analysis" and never surfaces as an
/// error. Each store is read at most once per lookup.
#[derive(Debug, Default)]
pub struct CrossModuleAnalysisLookup {
    layout: AnalysisLayout,
    loaded: Mutex<HashMap<PathBuf, Option<Arc<CompileAnalysis>>>>,
}

impl CrossModuleAnalysisLookup {
    /// A lookup using `layout` to find stores.
    pub fn new(layout: AnalysisLayout) -> Self {
        Self {
            layout,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// The layout in use.
    pub fn layout(&self) -> &AnalysisLayout {
        &self.layout
    }

    /// Returns the analysis that describes `entry`, if one can be read.
    pub fn analysis_for(&self, entry: &Path) -> Option<Arc<CompileAnalysis>> {
        if let Some(cached) = self.loaded.lock().get(entry) {
            return cached.clone();
        }
        let analysis = self.read_analysis(entry).map(Arc::new);
        self.loaded
            .lock()
            .insert(entry.to_path_buf(), analysis.clone());
        analysis
    }

    fn read_analysis(&self, entry: &Path) -> Option<CompileAnalysis> {
        if !entry.is_dir() {
            return None;
        }
        let store_path = self.layout.store_path(entry)?;
        match AnalysisStore::new(&store_path).load() {
            Ok(previous) => previous.into_contents().map(|c| c.analysis),
            Err(err) => {
                debug!(entry = %entry.display(), %err, "ignoring unreadable analysis");
                None
            }
        }
    }

    /// Classifies `entry`.
    pub fn class_kind_of(&self, entry: &Path) -> ClassKind {
        if entry.is_dir() {
            ClassKind::Directory
        } else if entry.is_file() && is_archive(entry) {
            ClassKind::Archive
        } else {
            ClassKind::Missing
        }
    }

    /// A probe for the classes `entry` defines.
    pub fn defines_class(&self, entry: &Path) -> DefinesClass {
        match self.class_kind_of(entry) {
            ClassKind::Directory => DefinesClass::Directory(entry.to_path_buf()),
            ClassKind::Archive => match archive_entries(entry) {
                Some(entries) => DefinesClass::Archive {
                    path: entry.to_path_buf(),
                    entries,
                },
                None => {
                    debug!(entry = %entry.display(), "unreadable archive on classpath");
                    DefinesClass::Nothing
                }
            },
            ClassKind::Missing => DefinesClass::Nothing,
        }
    }
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jar") || e.eq_ignore_ascii_case("zip"))
}

fn archive_entries(path: &Path) -> Option<HashSet<String>> {
    let zip = zip::ZipArchive::new(File::open(path).ok()?).ok()?;
    Some(zip.file_names().map(str::to_string).collect())
}
