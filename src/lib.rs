//! # Diagram Docs
//!
//! Turns a directory of draw.io diagram sources into a browsable section of a
//! Jekyll documentation site: rendered assets, one page per diagram, and the
//! data files the site's catalog pages iterate over.
//!
//! # Architecture: Three Commands
//!
//! ```text
//! convert      source_dir  →  assets_dir/{png,svg}/        (draw.io CLI or placeholder)
//! index        source_dir  →  pages_dir/*.md, data_dir/*.yml
//! check-site   base_url    →  JSON report + exit code
//! ```
//!
//! `build` runs `convert` then `index`. Indexing only probes for the assets
//! `convert` wrote; it never renders anything itself, so it runs in CI
//! without the draw.io desktop app.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Discovers diagram sources and builds one [`types::DiagramRecord`] each |
//! | [`index`] | Index pipeline: scan → pages → data files |
//! | [`page`] | Per-diagram Markdown page: YAML front matter + Maud viewer block |
//! | [`data`] | Category grouping and the two YAML data files |
//! | [`assets`] | Asset layout and the thumbnail fallback chain |
//! | [`convert`] | Parallel rendering of sources into PNG/SVG/thumbnail |
//! | [`render`] | Renderer trait, draw.io CLI, placeholder, thumbnail |
//! | [`cache`] | Content-hash render cache for incremental conversion |
//! | [`check`] | Deployed-site smoke check with retries |
//! | [`config`] | `diagram-docs.toml` loading, merging, validation, built-in catalog |
//! | [`types`] | Serialized records shared across modules |
//! | [`naming`] | Id, title and permalink derivation from filenames |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Filenames Are Identity
//!
//! A diagram's id is its source filename minus the extension, and everything
//! else (page path, permalink, asset names) is derived from it. Renaming a
//! source file renames the diagram everywhere on the next run.
//!
//! ## Curated Metadata Is Optional
//!
//! The catalog in the config supplies titles, descriptions and categories for
//! known diagrams. Anything not in the catalog still gets a complete record
//! with a title derived from its id, so dropping a new file into the source
//! directory is enough to publish it.
//!
//! ## Degrade, Don't Fail
//!
//! When the draw.io CLI is missing or an export fails, conversion writes a
//! placeholder PNG and says so. When no PNG exists at all, the index points
//! thumbnails at the site-wide placeholder image. Only write failures abort.

pub mod assets;
pub mod cache;
pub mod check;
pub mod config;
pub mod convert;
pub mod data;
pub mod index;
pub mod naming;
pub mod output;
pub mod page;
pub mod render;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
