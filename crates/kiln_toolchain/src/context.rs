//! Class-resolution contexts built from toolchain artifacts.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::ToolchainError;
use crate::identity::ToolchainIdentity;

/// An immutable index of every class defined by a toolchain's artifacts.
///
/// Built once per [`ToolchainIdentity`] by reading each jar's central
/// directory (or walking each class directory). When several artifacts
/// define the same class, the earliest artifact in loader order wins.
#[derive(Debug)]
pub struct LoadingContext {
    identity: ToolchainIdentity,
    classes: HashMap<String, usize>,
}

impl LoadingContext {
    /// Indexes every artifact of `identity`.
    ///
    /// Fails with [`ToolchainError::ResourceNotFound`] if any artifact is
    /// missing, before any archive is opened.
    pub fn build(identity: ToolchainIdentity) -> Result<Self, ToolchainError> {
        for artifact in identity.artifacts() {
            if !artifact.exists() {
                return Err(ToolchainError::ResourceNotFound {
                    path: artifact.clone(),
                });
            }
        }

        let per_artifact: Vec<Vec<String>> = identity
            .artifacts()
            .par_iter()
            .map(|artifact| index_artifact(artifact))
            .collect::<Result<_, _>>()?;

        let mut classes = HashMap::new();
        for (index, names) in per_artifact.into_iter().enumerate() {
            for name in names {
                classes.entry(name).or_insert(index);
            }
        }

        Ok(Self { identity, classes })
    }

    /// The identity this context was built from.
    pub fn identity(&self) -> &ToolchainIdentity {
        &self.identity
    }

    /// Returns `true` if some artifact defines the binary class `name`
    /// (e.g. `scala.Predef$`).
    pub fn defines(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Returns the artifact that supplies the binary class `name`.
    pub fn locate(&self, name: &str) -> Option<&Path> {
        let index = *self.classes.get(name)?;
        self.identity.artifacts().get(index).map(PathBuf::as_path)
    }

    /// Number of distinct classes indexed.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

/// Lists the binary class names defined by one artifact.
fn index_artifact(artifact: &Path) -> Result<Vec<String>, ToolchainError> {
    if artifact.is_dir() {
        let files = kiln_common::fs::list_directory(artifact, |p| {
            p.is_file() && p.extension().is_some_and(|e| e == "class")
        })
        .map_err(|e| ToolchainError::Archive {
            path: artifact.to_path_buf(),
            reason: e.to_string(),
        })?;
        return Ok(files
            .iter()
            .filter_map(|f| kiln_common::fs::relative_entry_name(artifact, f))
            .filter_map(|entry| class_name_of_entry(&entry))
            .collect());
    }

    let archive_err = |reason: String| ToolchainError::Archive {
        path: artifact.to_path_buf(),
        reason,
    };
    let file = File::open(artifact).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            ToolchainError::ResourceNotFound {
                path: artifact.to_path_buf(),
            }
        }
        _ => archive_err(e.to_string()),
    })?;
    let archive = zip::ZipArchive::new(file).map_err(|e| archive_err(e.to_string()))?;
    Ok(archive.file_names().filter_map(class_name_of_entry).collect())
}

/// Converts an archive entry such as `scala/Option$.class` into the binary
/// class name `scala.Option$`.
pub fn class_name_of_entry(entry: &str) -> Option<String> {
    let stem = entry.strip_suffix(".class")?;
    if stem.is_empty() || stem.ends_with('/') {
        return None;
    }
    Some(stem.replace('/', "."))
}
