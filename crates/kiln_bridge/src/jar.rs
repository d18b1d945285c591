//! Reading and writing jar archives.
//!
//! Jars written here are reproducible: the manifest comes first, every
//! other entry follows in sorted path order, and all entries carry the same
//! fixed timestamp, so packaging identical directories yields identical bytes.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::BridgeError;

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// The main section of a jar manifest, as ordered `name: value` attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    /// A manifest holding only `Manifest-Version: 1.0`.
    pub fn new() -> Self {
        Self {
            attributes: vec![("Manifest-Version".to_string(), "1.0".to_string())],
        }
    }

    /// The manifest stamped into compiled bridge jars.
    pub fn for_bridge(version: &str) -> Self {
        Self::new()
            .with("Specification-Vendor", "org.scala-sbt")
            .with("Specification-Title", "Compiler Bridge")
            .with("Specification-Version", version)
    }

    /// Appends an attribute.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Returns the value of attribute `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses the main section of a manifest file.
    pub fn parse(text: &str) -> Self {
        let attributes = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .take_while(|line| !line.is_empty())
            .filter_map(|line| line.split_once(": "))
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        Self { attributes }
    }

    /// Renders the manifest with CRLF line endings and a trailing blank line.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        for (name, value) in &self.attributes {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out.into_bytes()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts every entry of `archive` below `dest`, returning the number of
/// files written. Entries whose names would escape `dest` are skipped.
pub fn unzip(archive: &Path, dest: &Path) -> Result<usize, BridgeError> {
    let packaging = |reason: String| BridgeError::Packaging {
        path: archive.to_path_buf(),
        reason,
    };
    let file = File::open(archive).map_err(|e| io_error(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| packaging(e.to_string()))?;

    let mut written = 0;
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| packaging(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let target = dest.join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| io_error(&target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        let mut out = File::create(&target).map_err(|e| io_error(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| io_error(&target, e))?;
        written += 1;
    }
    Ok(written)
}

/// Packages the contents of `classes_dir` into a jar at `dest`.
///
/// The jar is assembled in a temporary file next to `dest` and renamed into
/// place, so a concurrent reader never sees a partial archive. A
/// `META-INF/MANIFEST.MF` already present in `classes_dir` is replaced by
/// `manifest`.
pub fn package(classes_dir: &Path, manifest: &Manifest, dest: &Path) -> Result<(), BridgeError> {
    let packaging = |reason: String| BridgeError::Packaging {
        path: dest.to_path_buf(),
        reason,
    };

    let entries = kiln_common::fs::list_directory(classes_dir, |_| true)
        .map_err(|e| io_error(classes_dir, e))?;
    let staged = kiln_common::fs::stage_in_parent(dest).map_err(|e| io_error(dest, e))?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut jar = ZipWriter::new(staged);

    jar.start_file(MANIFEST_PATH, options)
        .map_err(|e| packaging(e.to_string()))?;
    jar.write_all(&manifest.to_bytes())
        .map_err(|e| io_error(dest, e))?;

    for path in &entries {
        let Some(name) = kiln_common::fs::relative_entry_name(classes_dir, path) else {
            continue;
        };
        if name == MANIFEST_PATH {
            continue;
        }
        if path.is_dir() {
            jar.add_directory(format!("{name}/"), options)
                .map_err(|e| packaging(e.to_string()))?;
        } else {
            let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
            jar.start_file(name, options)
                .map_err(|e| packaging(e.to_string()))?;
            jar.write_all(&bytes).map_err(|e| io_error(dest, e))?;
        }
    }

    let staged = jar.finish().map_err(|e| packaging(e.to_string()))?;
    staged.as_file().sync_all().map_err(|e| io_error(dest, e))?;
    staged.persist(dest).map_err(|e| io_error(dest, e.error))?;
    Ok(())
}

/// Reads the manifest of the jar at `path`, if it has one.
pub fn read_manifest(path: &Path) -> Result<Option<Manifest>, BridgeError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| BridgeError::Packaging {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut entry = match zip.by_name(MANIFEST_PATH) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(BridgeError::Packaging {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };
    let mut text = String::new();
    io::Read::read_to_string(&mut entry, &mut text).map_err(|e| io_error(path, e))?;
    Ok(Some(Manifest::parse(&text)))
}

fn io_error(path: &Path, source: io::Error) -> BridgeError {
    BridgeError::Io {
        path: path.to_path_buf(),
        source,
    }
}
