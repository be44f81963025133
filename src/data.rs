//! Site generator data files.
//!
//! Stage 3 of the index pipeline: serializes the record list and the derived
//! category groups into the site generator's data directory.
//!
//! ```text
//! _data/
//! ├── diagrams.yml             # Vec<DiagramRecord>, sorted by id
//! └── diagram_categories.yml   # Vec<CategoryGroup>, first-seen order
//! ```

use crate::types::{CategoryGroup, DiagramRecord};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DIAGRAMS_FILE: &str = "diagrams.yml";
pub const CATEGORIES_FILE: &str = "diagram_categories.yml";

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Group record ids by category.
///
/// Groups appear in the order their category is first seen, and ids keep
/// record order within a group.
pub fn group_by_category(records: &[DiagramRecord]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.name() == record.category) {
            Some(group) => group.push(&record.id),
            None => {
                let mut group = CategoryGroup::new(&record.category);
                group.push(&record.id);
                groups.push(group);
            }
        }
    }
    groups
}

/// Paths of the files written by [`write_data_files`].
#[derive(Debug, Clone)]
pub struct DataFiles {
    pub diagrams: PathBuf,
    pub categories: PathBuf,
}

/// Write both data files into `data_dir`, creating it if needed.
pub fn write_data_files(
    data_dir: &Path,
    records: &[DiagramRecord],
    groups: &[CategoryGroup],
) -> Result<DataFiles, DataError> {
    fs::create_dir_all(data_dir)?;

    let diagrams = data_dir.join(DIAGRAMS_FILE);
    fs::write(&diagrams, serde_yaml::to_string(records)?)?;

    let categories = data_dir.join(CATEGORIES_FILE);
    fs::write(&categories, serde_yaml::to_string(groups)?)?;

    Ok(DataFiles {
        diagrams,
        categories,
    })
}
