//! Renderer trait and shared types.
//!
//! A [`Renderer`] turns one diagram source into a PNG (and optionally an
//! SVG) at the paths given by a [`RenderJob`]. The convert stage tries the
//! external renderer first and falls back to the placeholder on any error,
//! so implementations report failure instead of writing partial output.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Renderer unavailable: {0}")]
    ToolUnavailable(String),
    #[error("Rendering failed: {0}")]
    Failed(String),
}

/// Everything a renderer needs to know about one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub id: String,
    pub source: PathBuf,
    pub png: PathBuf,
    pub svg: PathBuf,
}

/// What a successful render wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutput {
    /// Whether an SVG was written in addition to the PNG.
    pub svg: bool,
}

/// Trait for diagram renderers.
///
/// `Sync` so one renderer can be shared across rayon workers.
pub trait Renderer: Sync {
    /// Short name used in progress output and the render cache.
    fn name(&self) -> &'static str;

    /// Render `job.source` to `job.png` (and `job.svg` if supported).
    fn render(&self, job: &RenderJob) -> Result<RenderOutput, RenderError>;
}
