//! Where each output directory keeps its analysis store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the directory, next to the output directories, that holds
/// analysis stores.
pub const ANALYSIS_DIR: &str = "analysis";

/// Maps an output directory's own name to the name of its analysis store.
///
/// With the default layout, `target/classes` is described by
/// `target/analysis/compile` and `target/test-classes` by
/// `target/analysis/test-compile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisLayout {
    stores: BTreeMap<String, String>,
}

impl AnalysisLayout {
    /// A layout with exactly the given `dir name -> store name` entries.
    pub fn new(stores: BTreeMap<String, String>) -> Self {
        Self { stores }
    }

    /// The store name for an output directory called `dir_name`.
    pub fn store_name(&self, dir_name: &str) -> Option<&str> {
        self.stores.get(dir_name).map(String::as_str)
    }

    /// The store describing `output_dir`, if its name is in the layout.
    pub fn store_path(&self, output_dir: &Path) -> Option<PathBuf> {
        let dir_name = output_dir.file_name()?.to_str()?;
        let store = self.store_name(dir_name)?;
        let parent = output_dir.parent()?;
        Some(parent.join(ANALYSIS_DIR).join(store))
    }

    /// The store a compile into `output_dir` writes: the mapped store if the
    /// layout names the directory, otherwise one named after the directory.
    pub fn store_path_for_output(&self, output_dir: &Path) -> PathBuf {
        if let Some(path) = self.store_path(output_dir) {
            return path;
        }
        let parent = output_dir.parent().unwrap_or_else(|| Path::new("."));
        let own_name = output_dir
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "classes".into());
        parent.join(ANALYSIS_DIR).join(own_name)
    }

    /// Every entry of the layout.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stores.iter().map(|(d, s)| (d.as_str(), s.as_str()))
    }
}

impl Default for AnalysisLayout {
    fn default() -> Self {
        Self::new(BTreeMap::from([
            ("classes".to_string(), "compile".to_string()),
            ("test-classes".to_string(), "test-compile".to_string()),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_paths() {
        let layout = AnalysisLayout::default();
        assert_eq!(
            layout.store_path(Path::new("/m/target/classes")),
            Some(PathBuf::from("/m/target/analysis/compile"))
        );
        assert_eq!(
            layout.store_path(Path::new("/m/target/test-classes")),
            Some(PathBuf::from("/m/target/analysis/test-compile"))
        );
        assert_eq!(layout.store_path(Path::new("/m/target/out")), None);
        assert_eq!(layout.entries().count(), 2);
    }

    #[test]
    fn custom_layout_replaces_defaults() {
        let layout = AnalysisLayout::new(BTreeMap::from([("out".to_string(), "main".to_string())]));
        assert_eq!(
            layout.store_path(Path::new("/m/build/out")),
            Some(PathBuf::from("/m/build/analysis/main"))
        );
        assert_eq!(layout.store_path(Path::new("/m/target/classes")), None);
    }

    #[test]
    fn output_store_falls_back_to_own_name() {
        let layout = AnalysisLayout::default();
        assert_eq!(
            layout.store_path_for_output(Path::new("/m/target/classes")),
            PathBuf::from("/m/target/analysis/compile")
        );
        assert_eq!(
            layout.store_path_for_output(Path::new("/m/build/out")),
            PathBuf::from("/m/build/analysis/out")
        );
    }
}
