//! CLI output formatting for all commands.
//!
//! # Information-First Display
//!
//! Every diagram is shown by its positional index and title first, with the
//! source file and asset state as indented context lines. Paths are printed
//! relative to the project root so output reads the same on any machine.
//!
//! # Output Format
//!
//! ## Index
//!
//! ```text
//! Diagrams
//! 001 01 Complete System Architecture
//!     Source: 40-resources/diagrams/01-complete-system-architecture.drawio
//!     Category: System Architecture
//!     Assets: png, svg, thumbnail
//! 002 07 Network Topology
//!     Source: 40-resources/diagrams/07-network-topology.drawio
//!     Category: General
//!     Assets: none (placeholder thumbnail)
//!
//! Categories
//! 001 System Architecture (1 diagram)
//! 002 General (1 diagram)
//!
//! Generated index for 2 diagrams
//! Created 2 categories
//! Data files written to _data/
//! Individual pages written to diagrams/pages/
//! ```
//!
//! A missing source directory leads with `Warning: <dir> does not exist`.
//!
//! ## Convert
//!
//! ```text
//! Converting 2 diagrams with drawio
//! 001 01-complete-system-architecture
//!     Source: 01-complete-system-architecture.drawio
//!     rendered (drawio, png + svg)
//! 002 07-network-topology
//!     Source: 07-network-topology.drawio
//!     placeholder: Renderer unavailable: draw.io CLI not found
//!
//! 2/2 diagrams processed
//! Cache: 1 rendered
//! ```
//!
//! ## Check
//!
//! The JSON report goes to stdout; this summary goes to stderr.
//!
//! ```text
//! Site live: https://example.org/docs/
//!     ok   200 https://example.org/docs/
//!     FAIL 404 https://example.org/docs/missing/
//! 1/2 paths ok
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes the lines. Format
//! functions are pure: no I/O, no side effects.

use crate::assets::AssetLayout;
use crate::check::{CheckReport, PathCheck};
use crate::convert::{ConvertEvent, ConvertResult, DiagramStatus};
use crate::index::IndexSummary;
use crate::types::DiagramRecord;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `path` relative to `root` when possible, `/`-separated.
fn display_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

fn plural(n: usize, singular: &str) -> String {
    match singular.strip_suffix('y') {
        _ if n == 1 => format!("{} {}", n, singular),
        Some(stem) => format!("{} {}ies", n, stem),
        None => format!("{} {}s", n, singular),
    }
}

/// Which generated assets a record points at.
fn asset_line(record: &DiagramRecord, assets_dir: &str) -> String {
    let thumbnail = AssetLayout::for_id(assets_dir, &record.id).thumbnail;
    let mut present = Vec::new();
    if record.png.is_some() {
        present.push("png");
    }
    if record.svg.is_some() {
        present.push("svg");
    }
    if record.thumbnail.trim_start_matches('/') == thumbnail {
        present.push("thumbnail");
    }
    if present.is_empty() {
        "Assets: none (placeholder thumbnail)".to_string()
    } else {
        format!("Assets: {}", present.join(", "))
    }
}

// ============================================================================
// Index output
// ============================================================================

/// Format the result of an index run.
pub fn format_index_summary(summary: &IndexSummary, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    if summary.source_missing {
        lines.push(format!(
            "Warning: {} does not exist",
            display_path(&summary.source_dir, root)
        ));
    }

    if !summary.diagrams.is_empty() {
        lines.push("Diagrams".to_string());
        for (i, record) in summary.diagrams.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), record.title));
            lines.push(format!("    Source: {}", record.source_file));
            lines.push(format!("    Category: {}", record.category));
            lines.push(format!("    {}", asset_line(record, &summary.assets_dir)));
        }

        lines.push(String::new());
        lines.push("Categories".to_string());
        for (i, group) in summary.categories.iter().enumerate() {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                group.name(),
                plural(group.count(), "diagram")
            ));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Generated index for {}",
        plural(summary.diagrams.len(), "diagram")
    ));
    lines.push(format!(
        "Created {}",
        plural(summary.categories.len(), "category")
    ));
    if let Some(data_dir) = summary.data_files.diagrams.parent() {
        lines.push(format!(
            "Data files written to {}/",
            display_path(data_dir, root)
        ));
    }
    lines.push(format!(
        "Individual pages written to {}/",
        display_path(&summary.pages_dir, root)
    ));

    lines
}

pub fn print_index_summary(summary: &IndexSummary, root: &Path) {
    for line in format_index_summary(summary, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Convert output
// ============================================================================

/// Format a single convert progress event as display lines.
pub fn format_convert_event(event: &ConvertEvent) -> Vec<String> {
    match event {
        ConvertEvent::Started {
            total,
            renderer: Some(name),
        } => vec![format!("Converting {} with {}", plural(*total, "diagram"), name)],
        ConvertEvent::Started {
            total,
            renderer: None,
        } => vec![format!(
            "Converting {} (draw.io CLI not found, using placeholders)",
            plural(*total, "diagram")
        )],
        ConvertEvent::Converted { index, result, .. } => {
            let status = match &result.status {
                DiagramStatus::Rendered {
                    renderer,
                    svg: true,
                } => format!("rendered ({}, png + svg)", renderer),
                DiagramStatus::Rendered {
                    renderer,
                    svg: false,
                } => format!("rendered ({}, png)", renderer),
                DiagramStatus::Cached => "cached".to_string(),
                DiagramStatus::Placeholder { reason } => format!("placeholder: {}", reason),
                DiagramStatus::Failed { reason } => format!("FAILED: {}", reason),
            };
            vec![
                format!("{} {}", format_index(*index), result.id),
                format!("    Source: {}", result.file_name),
                format!("    {}", status),
            ]
        }
    }
}

/// Format the closing summary of a convert run.
pub fn format_convert_summary(result: &ConvertResult) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "{}/{} diagrams processed",
            result.succeeded(),
            result.total()
        ),
        format!("Cache: {}", result.cache_stats),
    ]
}

pub fn print_convert_summary(result: &ConvertResult) {
    for line in format_convert_summary(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

fn check_line(check: &PathCheck) -> Vec<String> {
    let mut lines = Vec::new();
    let label = if check.ok { "ok  " } else { "FAIL" };
    match (check.status, &check.error) {
        (Some(status), _) => lines.push(format!("    {} {} {}", label, status, check.url)),
        (None, Some(error)) => lines.push(format!("    {} {} ({})", label, check.url, error)),
        (None, None) => lines.push(format!("    {} {}", label, check.url)),
    }
    if let Some(markers) = &check.has_markers {
        let missing: Vec<&str> = markers
            .iter()
            .filter(|(_, found)| !**found)
            .map(|(m, _)| m.as_str())
            .collect();
        if !missing.is_empty() {
            lines.push(format!("        missing markers: {}", missing.join(", ")));
        }
    }
    lines
}

/// Format the human-readable site check summary.
pub fn format_check_summary(report: &CheckReport) -> Vec<String> {
    if let Some(error) = &report.error {
        return vec![format!("{}: {}", error, report.base_url)];
    }

    let mut lines = vec![format!("Site live: {}", report.base_url)];
    for check in &report.checks {
        lines.extend(check_line(check));
    }
    let passed = report.checks.len() - report.failed();
    lines.push(format!("{}/{} paths ok", passed, report.checks.len()));
    lines
}

/// Print the site check summary to stderr (stdout carries the JSON report).
pub fn print_check_summary(report: &CheckReport) {
    for line in format_check_summary(report) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::convert::DiagramResult;
    use crate::data::DataFiles;
    use crate::test_helpers::*;
    use crate::types::CategoryGroup;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn summary(diagrams: Vec<DiagramRecord>, source_missing: bool) -> IndexSummary {
        let root = PathBuf::from("/site");
        let mut group = CategoryGroup::new("Security");
        for d in &diagrams {
            group.push(d.id.clone());
        }
        let categories = if diagrams.is_empty() {
            vec![]
        } else {
            vec![group]
        };
        IndexSummary {
            source_dir: root.join("40-resources/diagrams"),
            source_missing,
            assets_dir: "diagrams/assets".to_string(),
            diagrams,
            categories,
            data_files: DataFiles {
                diagrams: root.join("_data/diagrams.yml"),
                categories: root.join("_data/diagram_categories.yml"),
            },
            pages_dir: root.join("diagrams/pages"),
            pages: vec![],
        }
    }

    fn converted(id: &str, status: DiagramStatus) -> ConvertEvent {
        ConvertEvent::Converted {
            index: 2,
            total: 3,
            result: DiagramResult {
                id: id.to_string(),
                file_name: format!("{}.drawio", id),
                status,
            },
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "diagram"), "1 diagram");
        assert_eq!(plural(0, "diagram"), "0 diagrams");
        assert_eq!(plural(2, "category"), "2 categories");
    }

    #[test]
    fn index_summary_lists_diagrams_and_totals() {
        let lines = format_index_summary(&summary(vec![sample_record()], false), Path::new("/site"));

        assert_eq!(lines[0], "Diagrams");
        assert_eq!(lines[1], "001 Security Architecture");
        assert_eq!(
            lines[2],
            "    Source: 40-resources/diagrams/02-security-architecture.drawio"
        );
        assert_eq!(lines[3], "    Category: Security");
        assert_eq!(lines[4], "    Assets: png, svg, thumbnail");
        assert!(lines.contains(&"001 Security (1 diagram)".to_string()));
        assert!(lines.contains(&"Generated index for 1 diagram".to_string()));
        assert!(lines.contains(&"Created 1 category".to_string()));
        assert!(lines.contains(&"Data files written to _data/".to_string()));
        assert!(lines.contains(&"Individual pages written to diagrams/pages/".to_string()));
    }

    #[test]
    fn index_summary_warns_on_missing_source() {
        let lines = format_index_summary(&summary(vec![], true), Path::new("/site"));
        assert_eq!(lines[0], "Warning: 40-resources/diagrams does not exist");
        assert!(lines.contains(&"Generated index for 0 diagrams".to_string()));
        assert!(lines.contains(&"Created 0 categories".to_string()));
        assert!(!lines.contains(&"Diagrams".to_string()));
    }

    #[test]
    fn asset_line_variants() {
        let assets = "diagrams/assets";
        let mut record = sample_record();
        assert_eq!(asset_line(&record, assets), "Assets: png, svg, thumbnail");

        record.svg = None;
        record.thumbnail = record.png.clone().unwrap();
        assert_eq!(asset_line(&record, assets), "Assets: png");

        record.png = None;
        record.thumbnail = "/assets/img/diagram-placeholder.png".to_string();
        assert_eq!(
            asset_line(&record, assets),
            "Assets: none (placeholder thumbnail)"
        );
    }

    #[test]
    fn asset_line_png_fallback_for_thumb_suffixed_id() {
        let mut record = sample_record();
        record.id = "05-cover_thumb".to_string();
        record.png = Some("/diagrams/assets/png/05-cover_thumb.png".to_string());
        record.svg = None;
        record.thumbnail = record.png.clone().unwrap();

        assert_eq!(asset_line(&record, "diagrams/assets"), "Assets: png");

        record.thumbnail = "/diagrams/assets/png/05-cover_thumb_thumb.png".to_string();
        assert_eq!(
            asset_line(&record, "diagrams/assets"),
            "Assets: png, thumbnail"
        );
    }

    #[test]
    fn convert_started_lines() {
        let with_tool = ConvertEvent::Started {
            total: 3,
            renderer: Some("drawio"),
        };
        assert_eq!(
            format_convert_event(&with_tool),
            vec!["Converting 3 diagrams with drawio"]
        );

        let without = ConvertEvent::Started {
            total: 1,
            renderer: None,
        };
        assert_eq!(
            format_convert_event(&without),
            vec!["Converting 1 diagram (draw.io CLI not found, using placeholders)"]
        );
    }

    #[test]
    fn convert_event_statuses() {
        let lines = format_convert_event(&converted(
            "03-cicd-pipeline",
            DiagramStatus::Rendered {
                renderer: "drawio",
                svg: true,
            },
        ));
        assert_eq!(
            lines,
            vec![
                "002 03-cicd-pipeline",
                "    Source: 03-cicd-pipeline.drawio",
                "    rendered (drawio, png + svg)",
            ]
        );

        let lines = format_convert_event(&converted(
            "a",
            DiagramStatus::Placeholder {
                reason: "tool missing".into(),
            },
        ));
        assert_eq!(lines[2], "    placeholder: tool missing");

        let lines = format_convert_event(&converted("a", DiagramStatus::Cached));
        assert_eq!(lines[2], "    cached");

        let lines = format_convert_event(&converted(
            "a",
            DiagramStatus::Failed {
                reason: "disk full".into(),
            },
        ));
        assert_eq!(lines[2], "    FAILED: disk full");
    }

    #[test]
    fn convert_summary_counts_successes() {
        let result = ConvertResult {
            source_dir: PathBuf::from("src"),
            assets_dir: PathBuf::from("assets"),
            results: vec![
                DiagramResult {
                    id: "a".into(),
                    file_name: "a.drawio".into(),
                    status: DiagramStatus::Cached,
                },
                DiagramResult {
                    id: "b".into(),
                    file_name: "b.drawio".into(),
                    status: DiagramStatus::Failed {
                        reason: "x".into(),
                    },
                },
            ],
            cache_stats: CacheStats { hits: 1, misses: 1 },
        };
        let lines = format_convert_summary(&result);
        assert_eq!(lines[1], "1/2 diagrams processed");
        assert_eq!(lines[2], "Cache: 1 cached, 1 rendered (2 total)");
    }

    #[test]
    fn check_summary_lines() {
        let mut markers = BTreeMap::new();
        markers.insert("just-the-docs".to_string(), true);
        markers.insert("site-nav".to_string(), false);
        let report = CheckReport {
            error: None,
            base_url: "https://x.test/".into(),
            checks: vec![
                PathCheck {
                    url: "https://x.test/".into(),
                    status: Some(200),
                    ok: true,
                    has_markers: Some(markers),
                    error: None,
                },
                PathCheck {
                    url: "https://x.test/gone/".into(),
                    status: None,
                    ok: false,
                    has_markers: None,
                    error: Some("timed out".into()),
                },
            ],
        };

        let lines = format_check_summary(&report);
        assert_eq!(
            lines,
            vec![
                "Site live: https://x.test/",
                "    ok   200 https://x.test/",
                "        missing markers: site-nav",
                "    FAIL https://x.test/gone/ (timed out)",
                "1/2 paths ok",
            ]
        );
    }

    #[test]
    fn check_summary_site_down() {
        let report = CheckReport {
            error: Some("Site not live yet".into()),
            base_url: "https://x.test/".into(),
            checks: vec![],
        };
        assert_eq!(
            format_check_summary(&report),
            vec!["Site not live yet: https://x.test/"]
        );
    }
}
