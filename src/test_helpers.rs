//! Shared test utilities.
//!
//! Provides fixture setup and lookup helpers over scan-phase data.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let result = scan(tmp.path(), &PathsConfig::default(), &Catalog::default()).unwrap();
//! let record = find_record(&result.diagrams, "03-cicd-pipeline");
//! assert_eq!(record.category, "DevOps");
//! ```
//!
//! The fixture project holds three diagrams covering every asset branch:
//! `01-complete-system-architecture` (PNG, thumbnail, SVG),
//! `03-cicd-pipeline` (PNG only) and `07-network-topology` (nothing
//! generated, not in the catalog).

use std::path::Path;
use tempfile::TempDir;

use crate::types::DiagramRecord;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/project/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/project");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// A record with every field filled, for renderer tests.
pub fn sample_record() -> DiagramRecord {
    DiagramRecord {
        id: "02-security-architecture".to_string(),
        title: "Security Architecture".to_string(),
        description: "Multi-layered security with WAF and Shield.".to_string(),
        category: "Security".to_string(),
        complexity: "High".to_string(),
        tags: vec!["Security".to_string(), "WAF".to_string()],
        source_file: "40-resources/diagrams/02-security-architecture.drawio".to_string(),
        url: "/diagrams/02-security-architecture/".to_string(),
        drawio: "/40-resources/diagrams/02-security-architecture.drawio".to_string(),
        png: Some("/diagrams/assets/png/02-security-architecture.png".to_string()),
        svg: Some("/diagrams/assets/svg/02-security-architecture.svg".to_string()),
        thumbnail: "/diagrams/assets/png/02-security-architecture_thumb.png".to_string(),
    }
}

// =========================================================================
// Record lookups (panic with the available ids on miss)
// =========================================================================

/// Find a record by id. Panics if not found.
pub fn find_record<'a>(records: &'a [DiagramRecord], id: &str) -> &'a DiagramRecord {
    records.iter().find(|r| r.id == id).unwrap_or_else(|| {
        let ids = record_ids(records);
        panic!("diagram '{id}' not found. Available: {ids:?}")
    })
}

/// All record ids in order.
pub fn record_ids(records: &[DiagramRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}
