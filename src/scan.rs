//! Diagram discovery and metadata merge.
//!
//! Stage 1 of the index pipeline. Lists the diagram sources in the configured
//! directory, resolves each against the curated [`Catalog`], probes for
//! generated assets and produces [`DiagramRecord`]s sorted by id.
//!
//! ## Directory Structure
//!
//! ```text
//! project/
//! ├── 40-resources/diagrams/              # Source directory (not recursive)
//! │   ├── 01-complete-system-architecture.drawio
//! │   ├── 07-network-topology.drawio      # Not in catalog → fallback metadata
//! │   └── README.md                       # Ignored (wrong extension)
//! └── diagrams/assets/
//!     ├── png/01-complete-system-architecture.png
//!     └── png/01-complete-system-architecture_thumb.png
//! ```
//!
//! A missing source directory is not an error: the scan reports it and
//! returns no diagrams, so the rest of the pipeline writes empty data files.

use crate::assets;
use crate::config::{Catalog, PathsConfig};
use crate::naming;
use crate::types::DiagramRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to list diagram sources: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A diagram source file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Filename stem.
    pub id: String,
    /// Filename including extension; the catalog key.
    pub file_name: String,
    /// Absolute or root-joined path to the file.
    pub path: PathBuf,
}

/// Result of the scan stage.
#[derive(Debug)]
pub struct Scan {
    /// The directory that was scanned.
    pub source_dir: PathBuf,
    /// True when the source directory does not exist.
    pub source_missing: bool,
    /// Records sorted by id.
    pub diagrams: Vec<DiagramRecord>,
}

/// List diagram sources directly inside `dir`, sorted by id.
///
/// Returns `Ok(None)` when `dir` does not exist. Symlinks count when they
/// resolve to a file; dangling links are skipped.
pub fn discover(dir: &Path, extension: &str) -> Result<Option<Vec<SourceFile>>, ScanError> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let Some(id) = naming::diagram_id(&file_name, extension) else {
            continue;
        };
        let is_file = if entry.path_is_symlink() {
            entry.path().is_file()
        } else {
            entry.file_type().is_file()
        };
        if is_file {
            sources.push(SourceFile {
                id,
                file_name,
                path: entry.into_path(),
            });
        }
    }

    sources.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(Some(sources))
}

/// Scan the project at `root` into diagram records.
pub fn scan(root: &Path, paths: &PathsConfig, catalog: &Catalog) -> Result<Scan, ScanError> {
    let source_dir = root.join(&paths.source_dir);
    let Some(sources) = discover(&source_dir, &paths.extension)? else {
        return Ok(Scan {
            source_dir,
            source_missing: true,
            diagrams: Vec::new(),
        });
    };

    let diagrams = sources
        .iter()
        .map(|source| build_record(root, paths, catalog, source))
        .collect();

    Ok(Scan {
        source_dir,
        source_missing: false,
        diagrams,
    })
}

fn build_record(
    root: &Path,
    paths: &PathsConfig,
    catalog: &Catalog,
    source: &SourceFile,
) -> DiagramRecord {
    let info = catalog.resolve(&source.file_name, &source.id);
    let assets = assets::probe(root, &paths.assets_dir, &source.id, &paths.placeholder);
    let source_file = format!(
        "{}/{}",
        paths.source_dir.trim_end_matches('/'),
        source.file_name
    );

    DiagramRecord {
        id: source.id.clone(),
        title: info.title,
        description: info.description,
        category: info.category,
        complexity: info.complexity,
        tags: info.tags,
        url: naming::permalink(&source.id),
        drawio: format!("/{}", source_file.trim_start_matches('/')),
        source_file,
        png: assets.png,
        svg: assets.svg,
        thumbnail: assets.thumbnail,
    }
}
