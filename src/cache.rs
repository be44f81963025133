//! Render cache for incremental conversions.
//!
//! Spawning the draw.io desktop export for every diagram is slow (it boots
//! an Electron app per file). This module lets the convert stage skip a
//! diagram when neither its source nor the conversion parameters changed
//! since the last successful render.
//!
//! ## Cache keys
//!
//! Entries are keyed by diagram id and store:
//!
//! - **`source_hash`**: SHA-256 of the `.drawio` file contents. Content-based
//!   rather than mtime-based so it survives `git checkout`.
//! - **`params_hash`**: SHA-256 of the thumbnail size. Changing it
//!   re-renders every diagram.
//! - **`renderer`**: which renderer produced the output, for reporting.
//!
//! A hit requires matching hashes **and** both the PNG and its thumbnail
//! still on disk. Placeholder output is never recorded, so once the external
//! tool becomes available every placeholder is replaced by a real render.
//!
//! ## Storage
//!
//! JSON at `<assets_dir>/.render-cache.json`, next to the images it
//! describes. `--no-cache` starts from an empty cache.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache file within the assets directory.
const CACHE_FILENAME: &str = ".render-cache.json";

/// Bump to invalidate all existing caches when the format changes.
const CACHE_VERSION: u32 = 1;

/// A cached render for one diagram.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
    pub renderer: String,
}

/// On-disk render cache keyed by diagram id.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RenderCache {
    pub version: u32,
    pub entries: BTreeMap<String, CacheEntry>,
}

impl RenderCache {
    /// Create an empty cache (used for `--no-cache` or the first run).
    pub fn empty() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the assets directory. Returns an empty cache if the file
    /// doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(assets_dir: &Path) -> Self {
        let content = match std::fs::read_to_string(cache_path(assets_dir)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(cache) if cache.version == CACHE_VERSION => cache,
            _ => Self::empty(),
        }
    }

    /// Save to the assets directory.
    pub fn save(&self, assets_dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(assets_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(cache_path(assets_dir), json)
    }

    /// The cached entry for `id` if it matches both hashes and every listed
    /// output file still exists.
    pub fn find_fresh(
        &self,
        id: &str,
        source_hash: &str,
        params_hash: &str,
        outputs: &[&Path],
    ) -> Option<&CacheEntry> {
        let entry = self.entries.get(id)?;
        let fresh = entry.source_hash == source_hash
            && entry.params_hash == params_hash
            && outputs.iter().all(|p| p.is_file());
        fresh.then_some(entry)
    }

    pub fn insert(&mut self, id: String, entry: CacheEntry) {
        self.entries.insert(id, entry);
    }

    pub fn remove(&mut self, id: &str) {
        self.entries.remove(id);
    }

    /// Drop entries for diagrams not in `ids`.
    pub fn retain_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let keep: BTreeSet<&str> = ids.into_iter().collect();
        self.entries.retain(|id, _| keep.contains(id.as_str()));
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// SHA-256 hash of the conversion parameters that shape the output.
pub fn hash_params(thumbnail: [u32; 2]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"thumbnail\0");
    hasher.update(thumbnail[0].to_le_bytes());
    hasher.update(thumbnail[1].to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Resolve the cache file path for an assets directory.
pub fn cache_path(assets_dir: &Path) -> PathBuf {
    assets_dir.join(CACHE_FILENAME)
}

/// Summary of cache behaviour for one convert run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} rendered ({} total)",
                self.hits,
                self.misses,
                self.hits + self.misses
            )
        } else {
            write!(f, "{} rendered", self.misses)
        }
    }
}
