//! Project configuration.
//!
//! Handles loading, validating and merging `diagram-docs.toml`. The file
//! lives at the project root (the directory holding the diagram sources and
//! the site) and is optional: stock defaults describe the conventional
//! layout, and a user file only overrides the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! [paths]
//! source_dir = "40-resources/diagrams"   # Where .drawio files live
//! extension = "drawio"                   # Source file extension
//! assets_dir = "diagrams/assets"         # png/ and svg/ live below this
//! pages_dir = "diagrams/pages"           # Generated {id}.md pages
//! data_dir = "_data"                     # diagrams.yml, diagram_categories.yml
//! placeholder = "/assets/img/diagram-placeholder.png"
//!
//! [convert]
//! drawio_command = "drawio"   # External renderer, tried first
//! width = 1200                # Placeholder canvas size
//! height = 900
//! thumbnail = [400, 300]      # Thumbnail width, height
//!
//! [processing]
//! max_processes = 4           # Parallel conversions (omit for auto = CPU cores)
//!
//! [site_check]
//! base_url = "https://example.github.io/docs/"
//! paths = ["", "learning-path/"]
//! markers = ["just-the-docs", "site-nav"]
//! timeout_secs = 10
//! retries = 5
//! retry_delay_secs = 3
//!
//! [catalog."01-complete-system-architecture.drawio"]
//! title = "Complete System Architecture"
//! description = "..."
//! category = "System Architecture"
//! complexity = "High"
//! tags = ["AWS", "Infrastructure"]
//! ```
//!
//! ## Catalog Merging
//!
//! The built-in catalog carries the curated entries for the standard diagram
//! set. User `[catalog."<file>"]` tables merge key-by-key onto it: a new
//! filename needs every field, an existing one can override just `title`.
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::DiagramInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config filename looked up in the project root.
pub const CONFIG_FILE: &str = "diagram-docs.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Input and output locations, relative to the project root.
    pub paths: PathsConfig,
    /// Diagram conversion settings.
    pub convert: ConvertConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Deployed-site smoke check settings.
    pub site_check: SiteCheckConfig,
    /// Curated metadata keyed by source filename.
    pub catalog: Catalog,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.extension.is_empty() || self.paths.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "paths.extension must be non-empty and given without a leading dot".into(),
            ));
        }
        if self.paths.placeholder.is_empty() {
            return Err(ConfigError::Validation(
                "paths.placeholder must not be empty".into(),
            ));
        }
        if self.convert.width == 0 || self.convert.height == 0 {
            return Err(ConfigError::Validation(
                "convert.width and convert.height must be non-zero".into(),
            ));
        }
        if self.convert.thumbnail[0] == 0 || self.convert.thumbnail[1] == 0 {
            return Err(ConfigError::Validation(
                "convert.thumbnail values must be non-zero".into(),
            ));
        }
        if self.site_check.retries == 0 {
            return Err(ConfigError::Validation(
                "site_check.retries must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Filesystem layout of the documentation project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory scanned for diagram sources.
    pub source_dir: String,
    /// Source file extension, without the dot.
    pub extension: String,
    /// Generated asset root; holds `png/` and `svg/`.
    pub assets_dir: String,
    /// Directory for generated per-diagram pages.
    pub pages_dir: String,
    /// Site generator data directory.
    pub data_dir: String,
    /// Site-relative image used when a diagram has no PNG or thumbnail.
    pub placeholder: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: "40-resources/diagrams".to_string(),
            extension: "drawio".to_string(),
            assets_dir: "diagrams/assets".to_string(),
            pages_dir: "diagrams/pages".to_string(),
            data_dir: "_data".to_string(),
            placeholder: "/assets/img/diagram-placeholder.png".to_string(),
        }
    }
}

/// Diagram conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// draw.io desktop binary used for real exports. Empty disables it.
    pub drawio_command: String,
    /// Placeholder canvas width in pixels.
    pub width: u32,
    /// Placeholder canvas height in pixels.
    pub height: u32,
    /// Thumbnail size as `[width, height]`.
    pub thumbnail: [u32; 2],
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            drawio_command: "drawio".to_string(),
            width: 1200,
            height: 900,
            thumbnail: [400, 300],
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel conversions.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Deployed-site smoke check settings.
///
/// `base_url`, `timeout_secs`, `retries` and `retry_delay_secs` can also be
/// set through the `BASE_URL`, `TIMEOUT`, `RETRIES` and `RETRY_DELAY`
/// environment variables, which take precedence over this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteCheckConfig {
    pub base_url: String,
    /// Paths relative to `base_url`; `""` is the homepage.
    pub paths: Vec<String>,
    /// Substrings expected in every successful page body (case-insensitive).
    pub markers: Vec<String>,
    pub timeout_secs: u64,
    /// Liveness attempts before giving up on the site.
    pub retries: u32,
    pub retry_delay_secs: u64,
}

impl Default for SiteCheckConfig {
    fn default() -> Self {
        Self {
            base_url:
                "https://cloudshare360.github.io/aws-devops-gitlab-cicd-spring-boot-angular-fargate/"
                    .to_string(),
            paths: [
                "",
                "learning-path/",
                "learning-path/foundations/",
                "learning-path/security/",
                "learning-path/security/aws-waf-deep-dive/",
                "learning-path/foundations/spring-boot-containerization/",
                "learning-path/cicd/",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            markers: vec!["just-the-docs".to_string(), "site-nav".to_string()],
            timeout_secs: 10,
            retries: 5,
            retry_delay_secs: 3,
        }
    }
}

/// Curated metadata table: source filename → [`DiagramInfo`].
///
/// Loaded once with the config and handed to the scanner; never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(BTreeMap<String, DiagramInfo>);

impl Catalog {
    /// An empty catalog: every diagram gets fallback metadata.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, file_name: &str) -> Option<&DiagramInfo> {
        self.0.get(file_name)
    }

    /// Curated entry for `file_name`, or fallback metadata derived from `id`.
    pub fn resolve(&self, file_name: &str, id: &str) -> DiagramInfo {
        self.get(file_name)
            .cloned()
            .unwrap_or_else(|| DiagramInfo::fallback(id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let entry = |title: &str, description: &str, category: &str, complexity: &str, tags: &[&str]| {
            DiagramInfo {
                title: title.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                complexity: complexity.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            }
        };
        let mut entries = BTreeMap::new();
        entries.insert(
            "01-complete-system-architecture.drawio".to_string(),
            entry(
                "Complete System Architecture",
                "End-to-end system architecture showing all AWS services, load balancers, microservices, and data flow from users to databases.",
                "System Architecture",
                "High",
                &["AWS", "Infrastructure", "Overview", "Fargate", "RDS"],
            ),
        );
        entries.insert(
            "02-security-architecture.drawio".to_string(),
            entry(
                "Security Architecture",
                "Multi-layered security implementation with AWS WAF, Shield, VPC security groups, and application-level protection mechanisms.",
                "Security",
                "High",
                &["Security", "WAF", "Shield", "VPC", "Authentication"],
            ),
        );
        entries.insert(
            "03-cicd-pipeline.drawio".to_string(),
            entry(
                "CI/CD Pipeline Architecture",
                "Complete GitLab CI/CD pipeline showing 7 stages from code commit to production deployment with approval gates and rollback strategies.",
                "DevOps",
                "Medium",
                &["GitLab", "CI/CD", "Pipeline", "Deployment", "Automation"],
            ),
        );
        entries.insert(
            "04-microservices-deployment.drawio".to_string(),
            entry(
                "Microservices Deployment",
                "Detailed microservices architecture on AWS Fargate showing service communication, load balancing, and container orchestration.",
                "Architecture",
                "High",
                &["Microservices", "Fargate", "Spring Boot", "Angular", "Communication"],
            ),
        );
        entries.insert(
            "05-data-flow-architecture.drawio".to_string(),
            entry(
                "Data Flow Architecture",
                "Request processing flow and event-driven communication patterns showing user journeys, API gateway routing, and database operations.",
                "Data Flow",
                "Medium",
                &["Data Flow", "Events", "API Gateway", "Processing", "Observability"],
            ),
        );
        Self(entries)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Parse a config string and resolve it against the stock defaults.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Load the project config.
///
/// With an explicit path the file must exist. Otherwise `diagram-docs.toml`
/// in `root` is used when present and stock defaults when not.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let path = match explicit {
        Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => root.join(CONFIG_FILE),
    };
    if !path.exists() {
        return resolve_config(stock_defaults_value(), None);
    }
    let content = fs::read_to_string(&path)?;
    parse_config(&content)
}

/// Returns a commented stock `diagram-docs.toml`.
///
/// Used by the `gen-config` CLI command. The built-in catalog is not
/// repeated here; add `[catalog."<file>"]` tables to extend or override it.
pub fn stock_config_toml() -> &'static str {
    r##"# diagram-docs configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Project layout (relative to the project root)
# ---------------------------------------------------------------------------
[paths]
# Directory scanned for diagram sources (not recursive).
source_dir = "40-resources/diagrams"

# Source file extension, without the dot.
extension = "drawio"

# Generated assets: {assets_dir}/png/{id}.png, {id}_thumb.png, svg/{id}.svg
assets_dir = "diagrams/assets"

# Generated per-diagram pages: {pages_dir}/{id}.md
pages_dir = "diagrams/pages"

# Site generator data files: diagrams.yml, diagram_categories.yml
data_dir = "_data"

# Site-relative image used when a diagram has neither thumbnail nor PNG.
placeholder = "/assets/img/diagram-placeholder.png"

# ---------------------------------------------------------------------------
# Conversion
# ---------------------------------------------------------------------------
[convert]
# draw.io desktop binary used for real exports. When it is missing or fails,
# an inert placeholder PNG is written instead. Set to "" to always use
# placeholders.
drawio_command = "drawio"

# Placeholder canvas size in pixels.
width = 1200
height = 900

# Thumbnail size as [width, height].
thumbnail = [400, 300]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel conversions.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Site smoke check (env: BASE_URL, TIMEOUT, RETRIES, RETRY_DELAY)
# ---------------------------------------------------------------------------
[site_check]
base_url = "https://cloudshare360.github.io/aws-devops-gitlab-cicd-spring-boot-angular-fargate/"
paths = [
    "",
    "learning-path/",
    "learning-path/foundations/",
    "learning-path/security/",
    "learning-path/security/aws-waf-deep-dive/",
    "learning-path/foundations/spring-boot-containerization/",
    "learning-path/cicd/",
]
markers = ["just-the-docs", "site-nav"]
timeout_secs = 10
retries = 5
retry_delay_secs = 3

# ---------------------------------------------------------------------------
# Catalog entries (extend or override the built-in ones)
# ---------------------------------------------------------------------------
# [catalog."06-network-topology.drawio"]
# title = "Network Topology"
# description = "VPC layout with public and private subnets."
# category = "Infrastructure"
# complexity = "Medium"
# tags = ["VPC", "Networking"]
"##
}
