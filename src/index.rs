//! The diagram index pipeline.
//!
//! ```text
//! 1. Scan       source_dir  →  Vec<DiagramRecord>   (discovery + catalog + asset probe)
//! 2. Pages      records     →  pages_dir/{id}.md
//! 3. Data       records     →  data_dir/diagrams.yml, diagram_categories.yml
//! ```
//!
//! Everything is recomputed from scratch on each run. Write failures abort
//! the run; a missing source directory does not.

use crate::config::SiteConfig;
use crate::data::{self, DataError, DataFiles};
use crate::page::{self, PageError};
use crate::scan::{self, ScanError};
use crate::types::{CategoryGroup, DiagramRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Page generation failed: {0}")]
    Page(#[from] PageError),
    #[error("Data file write failed: {0}")]
    Data(#[from] DataError),
}

/// What one index run produced.
#[derive(Debug)]
pub struct IndexSummary {
    pub source_dir: PathBuf,
    pub source_missing: bool,
    /// Configured asset directory, relative to the root.
    pub assets_dir: String,
    pub diagrams: Vec<DiagramRecord>,
    pub categories: Vec<CategoryGroup>,
    pub data_files: DataFiles,
    pub pages_dir: PathBuf,
    pub pages: Vec<PathBuf>,
}

/// Run the full index pipeline for the project at `root`.
pub fn build_index(root: &Path, config: &SiteConfig) -> Result<IndexSummary, IndexError> {
    let scanned = scan::scan(root, &config.paths, &config.catalog)?;

    let pages_dir = root.join(&config.paths.pages_dir);
    let pages = page::write_pages(&scanned.diagrams, &pages_dir)?;

    let categories = data::group_by_category(&scanned.diagrams);
    let data_files = data::write_data_files(
        &root.join(&config.paths.data_dir),
        &scanned.diagrams,
        &categories,
    )?;

    Ok(IndexSummary {
        source_dir: scanned.source_dir,
        source_missing: scanned.source_missing,
        assets_dir: config.paths.assets_dir.clone(),
        diagrams: scanned.diagrams,
        categories,
        data_files,
        pages_dir,
        pages,
    })
}
