//! Generated-asset layout and presence probing.
//!
//! Converted images live under the configured asset directory:
//!
//! ```text
//! diagrams/assets/
//! ├── png/
//! │   ├── 01-complete-system-architecture.png
//! │   └── 01-complete-system-architecture_thumb.png
//! └── svg/
//!     └── 01-complete-system-architecture.svg
//! ```
//!
//! The probe is a plain existence check per run; the result is a snapshot of
//! what was on disk when the index was built.

use std::path::{Path, PathBuf};

/// Asset paths for one diagram id, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    pub png: String,
    pub svg: String,
    pub thumbnail: String,
}

impl AssetLayout {
    pub fn for_id(assets_dir: &str, id: &str) -> Self {
        let dir = assets_dir.trim_matches('/');
        Self {
            png: format!("{dir}/png/{id}.png"),
            svg: format!("{dir}/svg/{id}.svg"),
            thumbnail: format!("{dir}/png/{id}_thumb.png"),
        }
    }

    pub fn png_path(&self, root: &Path) -> PathBuf {
        root.join(&self.png)
    }

    pub fn svg_path(&self, root: &Path) -> PathBuf {
        root.join(&self.svg)
    }

    pub fn thumbnail_path(&self, root: &Path) -> PathBuf {
        root.join(&self.thumbnail)
    }
}

/// Which generated assets exist, as site-relative URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedAssets {
    pub png: Option<String>,
    pub svg: Option<String>,
    /// Never empty: thumbnail, else PNG, else the placeholder.
    pub thumbnail: String,
}

/// Check which assets exist for `id` under `root`.
pub fn probe(root: &Path, assets_dir: &str, id: &str, placeholder: &str) -> ProbedAssets {
    let layout = AssetLayout::for_id(assets_dir, id);
    let site_path = |rel: &str| format!("/{rel}");

    let png = layout.png_path(root).is_file().then(|| site_path(&layout.png));
    let svg = layout.svg_path(root).is_file().then(|| site_path(&layout.svg));
    let thumbnail = if layout.thumbnail_path(root).is_file() {
        site_path(&layout.thumbnail)
    } else {
        png.clone().unwrap_or_else(|| placeholder.to_string())
    };

    ProbedAssets {
        png,
        svg,
        thumbnail,
    }
}
