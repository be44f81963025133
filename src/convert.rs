//! Diagram conversion: source files → PNG, SVG and thumbnail assets.
//!
//! For every diagram discovered in the source directory:
//!
//! ```text
//! 1. cache lookup       source hash + params hash, outputs still on disk → Cached
//! 2. primary renderer   draw.io CLI export                              → Rendered
//! 3. fallback           built-in placeholder PNG                        → Placeholder
//! 4. thumbnail          resize_to_fill from whichever PNG was written
//! ```
//!
//! Any primary failure degrades to the placeholder rather than failing the
//! diagram; a diagram only fails when even the placeholder or thumbnail
//! cannot be written. The run succeeds when at least one diagram made it
//! through. A missing source directory is an error here (unlike indexing).
//! Whenever a diagram ends up without a fresh SVG, any SVG from an earlier
//! run is deleted so the index never links a stale export.
//!
//! Diagrams are converted in parallel with rayon. Progress events go over an
//! optional `mpsc` channel so a single printer thread owns stdout.

use crate::assets::AssetLayout;
use crate::cache::{self, CacheEntry, CacheStats, RenderCache};
use crate::config::SiteConfig;
use crate::render::{
    DrawioCli, PlaceholderRenderer, RenderError, RenderJob, Renderer, create_thumbnail,
};
use crate::scan::{self, ScanError, SourceFile};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Discovery failed: {0}")]
    Scan(#[from] ScanError),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// How one diagram ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramStatus {
    /// Exported by the primary renderer.
    Rendered { renderer: &'static str, svg: bool },
    /// Skipped; outputs from a previous run are still current.
    Cached,
    /// Primary renderer unavailable or failed; placeholder written instead.
    Placeholder { reason: String },
    /// Nothing usable was written.
    Failed { reason: String },
}

impl DiagramStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, DiagramStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramResult {
    pub id: String,
    pub file_name: String,
    pub status: DiagramStatus,
}

/// Progress event emitted as each diagram finishes.
#[derive(Debug, Clone)]
pub enum ConvertEvent {
    Started {
        total: usize,
        renderer: Option<&'static str>,
    },
    Converted {
        index: usize,
        total: usize,
        result: DiagramResult,
    },
}

#[derive(Debug)]
pub struct ConvertResult {
    pub source_dir: PathBuf,
    pub assets_dir: PathBuf,
    /// Sorted by diagram id.
    pub results: Vec<DiagramResult>,
    pub cache_stats: CacheStats,
}

impl ConvertResult {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_success()).count()
    }

    /// At least one diagram produced usable output.
    pub fn is_success(&self) -> bool {
        self.succeeded() > 0
    }
}

/// Convert every diagram under the configured source directory.
///
/// Probes the draw.io CLI once; when it is missing every diagram gets a
/// placeholder.
pub fn convert(
    root: &Path,
    config: &SiteConfig,
    use_cache: bool,
    progress: Option<Sender<ConvertEvent>>,
) -> Result<ConvertResult, ConvertError> {
    let primary = DrawioCli::detect(&config.convert.drawio_command).ok();
    let fallback = PlaceholderRenderer::new(config.convert.width, config.convert.height);
    convert_with_renderers(
        root,
        config,
        primary.as_ref().map(|r| r as &dyn Renderer),
        &fallback,
        use_cache,
        progress,
    )
}

/// Convert using explicit renderers (allows testing with mocks).
pub fn convert_with_renderers(
    root: &Path,
    config: &SiteConfig,
    primary: Option<&dyn Renderer>,
    fallback: &dyn Renderer,
    use_cache: bool,
    progress: Option<Sender<ConvertEvent>>,
) -> Result<ConvertResult, ConvertError> {
    let paths = &config.paths;
    let source_dir = root.join(&paths.source_dir);
    let sources = scan::discover(&source_dir, &paths.extension)?
        .ok_or_else(|| ConvertError::SourceNotFound(source_dir.clone()))?;

    let assets_dir = root.join(&paths.assets_dir);
    std::fs::create_dir_all(assets_dir.join("png"))?;
    std::fs::create_dir_all(assets_dir.join("svg"))?;

    let mut cache = if use_cache {
        RenderCache::load(&assets_dir)
    } else {
        RenderCache::empty()
    };
    let params_hash = cache::hash_params(config.convert.thumbnail);

    let total = sources.len();
    if let Some(tx) = &progress {
        tx.send(ConvertEvent::Started {
            total,
            renderer: primary.map(|r| r.name()),
        })
        .ok();
    }

    let ctx = Context {
        root,
        config,
        primary,
        fallback,
        cache: &cache,
        params_hash: &params_hash,
    };
    let mut outcomes: Vec<(DiagramResult, Option<CacheEntry>)> = sources
        .par_iter()
        .enumerate()
        .map(|(i, source)| {
            let outcome = ctx.convert_one(source);
            if let Some(tx) = &progress {
                tx.send(ConvertEvent::Converted {
                    index: i + 1,
                    total,
                    result: outcome.0.clone(),
                })
                .ok();
            }
            outcome
        })
        .collect();
    outcomes.sort_by(|a, b| a.0.id.cmp(&b.0.id));

    let mut stats = CacheStats::default();
    let mut results = Vec::with_capacity(outcomes.len());
    for (result, entry) in outcomes {
        match (&result.status, entry) {
            (DiagramStatus::Cached, _) => stats.hits += 1,
            (DiagramStatus::Rendered { .. }, Some(entry)) => {
                stats.misses += 1;
                cache.insert(result.id.clone(), entry);
            }
            _ => {
                stats.misses += 1;
                cache.remove(&result.id);
            }
        }
        results.push(result);
    }
    cache.retain_ids(results.iter().map(|r| r.id.as_str()));
    cache.save(&assets_dir)?;

    Ok(ConvertResult {
        source_dir,
        assets_dir,
        results,
        cache_stats: stats,
    })
}

struct Context<'a> {
    root: &'a Path,
    config: &'a SiteConfig,
    primary: Option<&'a dyn Renderer>,
    fallback: &'a dyn Renderer,
    cache: &'a RenderCache,
    params_hash: &'a str,
}

impl Context<'_> {
    /// Convert one diagram. Returns the cache entry to record on a real render.
    fn convert_one(&self, source: &SourceFile) -> (DiagramResult, Option<CacheEntry>) {
        let (status, entry) = match self.produce(source) {
            Ok(done) => done,
            Err(e) => (
                DiagramStatus::Failed {
                    reason: e.to_string(),
                },
                None,
            ),
        };
        let result = DiagramResult {
            id: source.id.clone(),
            file_name: source.file_name.clone(),
            status,
        };
        (result, entry)
    }

    fn produce(
        &self,
        source: &SourceFile,
    ) -> Result<(DiagramStatus, Option<CacheEntry>), RenderError> {
        let layout = AssetLayout::for_id(&self.config.paths.assets_dir, &source.id);
        let png = layout.png_path(self.root);
        let thumbnail = layout.thumbnail_path(self.root);
        let source_hash = cache::hash_file(&source.path)?;

        // Only real renders are recorded, so a hit never hides a placeholder.
        if self
            .cache
            .find_fresh(&source.id, &source_hash, self.params_hash, &[&png, &thumbnail])
            .is_some()
        {
            return Ok((DiagramStatus::Cached, None));
        }

        let job = RenderJob {
            id: source.id.clone(),
            source: source.path.clone(),
            png: png.clone(),
            svg: layout.svg_path(self.root),
        };

        let primary_result = match self.primary {
            Some(primary) => primary.render(&job).map(|out| (primary.name(), out)),
            None => Err(RenderError::ToolUnavailable("draw.io CLI not found".into())),
        };

        let (status, entry) = match primary_result {
            Ok((renderer, out)) => (
                DiagramStatus::Rendered {
                    renderer,
                    svg: out.svg,
                },
                Some(CacheEntry {
                    source_hash,
                    params_hash: self.params_hash.to_string(),
                    renderer: renderer.to_string(),
                }),
            ),
            Err(e) => {
                self.fallback.render(&job)?;
                (
                    DiagramStatus::Placeholder {
                        reason: e.to_string(),
                    },
                    None,
                )
            }
        };

        let svg_written = matches!(status, DiagramStatus::Rendered { svg: true, .. });
        if !svg_written {
            remove_if_exists(&job.svg)?;
        }

        let [width, height] = self.config.convert.thumbnail;
        create_thumbnail(&png, &thumbnail, width, height)?;
        Ok((status, entry))
    }
}

/// Delete an output left over from an earlier run.
fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::tests::MockRenderer;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    fn small_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.convert.width = 120;
        config.convert.height = 90;
        config.convert.thumbnail = [40, 30];
        config
    }

    fn run(
        root: &Path,
        primary: Option<&dyn Renderer>,
        use_cache: bool,
    ) -> Result<ConvertResult, ConvertError> {
        let config = small_config();
        let fallback = PlaceholderRenderer::new(config.convert.width, config.convert.height);
        convert_with_renderers(root, &config, primary, &fallback, use_cache, None)
    }

    #[test]
    fn working_renderer_renders_every_diagram() {
        let tmp = setup_fixtures();
        let mock = MockRenderer::working();

        let result = run(tmp.path(), Some(&mock), true).unwrap();

        assert_eq!(result.total(), 3);
        assert_eq!(result.succeeded(), 3);
        assert!(result.is_success());
        assert_eq!(
            mock.rendered_ids(),
            vec![
                "01-complete-system-architecture",
                "03-cicd-pipeline",
                "07-network-topology"
            ]
        );
        for r in &result.results {
            assert_eq!(
                r.status,
                DiagramStatus::Rendered {
                    renderer: "mock",
                    svg: true
                }
            );
        }
        let thumb = tmp
            .path()
            .join("diagrams/assets/png/07-network-topology_thumb.png");
        assert_eq!(image::image_dimensions(&thumb).unwrap(), (40, 30));
    }

    #[test]
    fn results_sorted_by_id() {
        let tmp = setup_fixtures();
        let mock = MockRenderer::working();
        let result = run(tmp.path(), Some(&mock), false).unwrap();

        let ids: Vec<&str> = result.results.iter().map(|r| r.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn unavailable_tool_falls_back_to_placeholder() {
        let tmp = setup_fixtures();
        let mock = MockRenderer::unavailable();

        let result = run(tmp.path(), Some(&mock), true).unwrap();

        assert_eq!(result.succeeded(), 3);
        assert!(
            result
                .results
                .iter()
                .all(|r| matches!(r.status, DiagramStatus::Placeholder { .. }))
        );
        let png = tmp.path().join("diagrams/assets/png/03-cicd-pipeline.png");
        assert_eq!(image::image_dimensions(&png).unwrap(), (120, 90));
    }

    #[test]
    fn no_primary_renderer_uses_placeholder() {
        let tmp = setup_fixtures();
        let result = run(tmp.path(), None, true).unwrap();

        match &result.results[0].status {
            DiagramStatus::Placeholder { reason } => assert!(reason.contains("not found")),
            other => panic!("expected placeholder, got {other:?}"),
        }
    }

    #[test]
    fn missing_source_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = run(tmp.path(), None, true);
        assert!(matches!(result, Err(ConvertError::SourceNotFound(_))));
    }

    #[test]
    fn empty_source_dir_is_not_a_success() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("40-resources/diagrams")).unwrap();

        let result = run(tmp.path(), None, true).unwrap();
        assert_eq!(result.total(), 0);
        assert!(!result.is_success());
    }

    #[test]
    fn second_run_hits_cache() {
        let tmp = setup_fixtures();
        let mock = MockRenderer::working();
        run(tmp.path(), Some(&mock), true).unwrap();

        let again = MockRenderer::working();
        let result = run(tmp.path(), Some(&again), true).unwrap();

        assert!(again.rendered_ids().is_empty());
        assert_eq!(result.cache_stats, CacheStats { hits: 3, misses: 0 });
        assert!(
            result
                .results
                .iter()
                .all(|r| r.status == DiagramStatus::Cached)
        );
    }

    #[test]
    fn changed_source_is_rerendered() {
        let tmp = setup_fixtures();
        run(tmp.path(), Some(&MockRenderer::working()), true).unwrap();

        fs::write(
            tmp.path()
                .join("40-resources/diagrams/03-cicd-pipeline.drawio"),
            "<mxfile><diagram id=\"changed\"/></mxfile>",
        )
        .unwrap();
        let again = MockRenderer::working();
        let result = run(tmp.path(), Some(&again), true).unwrap();

        assert_eq!(again.rendered_ids(), vec!["03-cicd-pipeline"]);
        assert_eq!(result.cache_stats, CacheStats { hits: 2, misses: 1 });
    }

    #[test]
    fn no_cache_renders_everything() {
        let tmp = setup_fixtures();
        run(tmp.path(), Some(&MockRenderer::working()), true).unwrap();

        let again = MockRenderer::working();
        run(tmp.path(), Some(&again), false).unwrap();
        assert_eq!(again.rendered_ids().len(), 3);
    }

    #[test]
    fn placeholders_are_not_cached() {
        let tmp = setup_fixtures();
        run(tmp.path(), Some(&MockRenderer::unavailable()), true).unwrap();

        let cache = RenderCache::load(&tmp.path().join("diagrams/assets"));
        assert!(cache.entries.is_empty());

        let working = MockRenderer::working();
        run(tmp.path(), Some(&working), true).unwrap();
        assert_eq!(working.rendered_ids().len(), 3);
    }

    #[test]
    fn placeholder_removes_svg_from_earlier_render() {
        let tmp = setup_fixtures();
        let svg = tmp.path().join("diagrams/assets/svg/03-cicd-pipeline.svg");
        run(tmp.path(), Some(&MockRenderer::working()), true).unwrap();
        assert!(svg.is_file());

        fs::write(
            tmp.path()
                .join("40-resources/diagrams/03-cicd-pipeline.drawio"),
            "<mxfile><diagram id=\"edited\"/></mxfile>",
        )
        .unwrap();
        run(tmp.path(), Some(&MockRenderer::unavailable()), true).unwrap();

        assert!(!svg.exists());
        let summary = crate::index::build_index(tmp.path(), &small_config()).unwrap();
        let record = find_record(&summary.diagrams, "03-cicd-pipeline");
        assert_eq!(record.svg, None);
        assert!(record.png.is_some());
    }

    #[test]
    fn png_only_render_removes_stale_svg() {
        let tmp = setup_fixtures();
        let svg = tmp.path().join("diagrams/assets/svg/07-network-topology.svg");
        run(tmp.path(), Some(&MockRenderer::working()), false).unwrap();
        assert!(svg.is_file());

        let result = run(tmp.path(), Some(&MockRenderer::png_only()), false).unwrap();

        assert!(!svg.exists());
        let png_only = DiagramStatus::Rendered {
            renderer: "mock",
            svg: false,
        };
        assert!(result.results.iter().all(|r| r.status == png_only));
    }

    #[test]
    fn deleted_sources_are_pruned_from_cache() {
        let tmp = setup_fixtures();
        run(tmp.path(), Some(&MockRenderer::working()), true).unwrap();
        fs::remove_file(
            tmp.path()
                .join("40-resources/diagrams/07-network-topology.drawio"),
        )
        .unwrap();

        run(tmp.path(), Some(&MockRenderer::working()), true).unwrap();

        let cache = RenderCache::load(&tmp.path().join("diagrams/assets"));
        let ids: Vec<&str> = cache.entries.keys().map(String::as_str).collect();
        assert_eq!(
            ids,
            vec!["01-complete-system-architecture", "03-cicd-pipeline"]
        );
    }

    #[test]
    fn progress_events_cover_every_diagram() {
        let tmp = setup_fixtures();
        let config = small_config();
        let fallback = PlaceholderRenderer::new(120, 90);
        let (tx, rx) = std::sync::mpsc::channel();

        convert_with_renderers(tmp.path(), &config, None, &fallback, true, Some(tx)).unwrap();

        let events: Vec<ConvertEvent> = rx.iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            ConvertEvent::Started {
                total: 3,
                renderer: None
            }
        ));
        let mut indices: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                ConvertEvent::Converted { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        indices.sort();
        assert_eq!(indices, vec![1, 2, 3]);
    }
}
