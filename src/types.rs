//! Shared types written to the site generator's data directory.
//!
//! Field order in these structs is the key order of the emitted YAML, so it
//! is part of the output format.

use serde::{Deserialize, Serialize};

/// Curated metadata for one diagram, keyed by filename in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagramInfo {
    pub title: String,
    pub description: String,
    pub category: String,
    /// `Low`, `Medium` or `High` by convention; not validated.
    pub complexity: String,
    pub tags: Vec<String>,
}

impl DiagramInfo {
    /// Metadata for a diagram the catalog does not know about.
    pub fn fallback(id: &str) -> Self {
        Self {
            title: crate::naming::humanize_title(id),
            description: format!("Architecture diagram: {id}"),
            category: "General".to_string(),
            complexity: "Medium".to_string(),
            tags: vec!["Architecture".to_string()],
        }
    }
}

/// One discovered diagram source file with its metadata and assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramRecord {
    /// Filename stem, unique across the record set.
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub complexity: String,
    pub tags: Vec<String>,
    /// Project-relative path of the `.drawio` source.
    pub source_file: String,
    /// Permalink of the generated page.
    pub url: String,
    /// Download path of the source file.
    pub drawio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    /// Dedicated thumbnail, else the PNG, else the shared placeholder.
    pub thumbnail: String,
}

/// Diagram ids sharing a category label.
///
/// Members can only be added through [`CategoryGroup::push`], which keeps
/// `count` equal to the number of ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    name: String,
    diagrams: Vec<String>,
    count: usize,
}

impl CategoryGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diagrams: Vec::new(),
            count: 0,
        }
    }

    pub fn push(&mut self, id: impl Into<String>) {
        self.diagrams.push(id.into());
        self.count = self.diagrams.len();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn diagrams(&self) -> &[String] {
        &self.diagrams
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
