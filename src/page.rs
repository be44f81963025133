//! Per-diagram page synthesis.
//!
//! Stage 2 of the index pipeline. Each [`DiagramRecord`] becomes one Markdown
//! document with YAML front matter, written to `{pages_dir}/{id}.md` for the
//! site generator to pick up.
//!
//! ## Page Layout
//!
//! ```text
//! ---
//! layout: diagram
//! title: ...            # front matter, serialized with serde_yaml
//! permalink: /diagrams/{id}/
//! diagram_id: {id}
//! ---
//! # Title
//! Description
//! ## Diagram Details     # category, complexity, tags
//! ## View Options        # HTML viewer: image + download links
//! ## Related Diagrams    # Liquid template, resolved by the site generator
//! <style>...</style>
//! ```
//!
//! ## HTML Generation
//!
//! The viewer block is rendered with [maud](https://maud.lambda.xyz/), so
//! titles and paths are escaped. Download links are only emitted for assets
//! the record actually has; an absent or empty path produces no link.
//!
//! The related-diagrams block is a fixed template string passed through
//! verbatim: this crate never resolves it.

use crate::types::DiagramRecord;
use maud::{Markup, html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Front matter error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Page layout name in the site generator.
pub const LAYOUT: &str = "diagram";

/// Liquid snippet listing up to three other diagrams in the same category.
///
/// Reads `site.data.diagrams`, i.e. the `diagrams.yml` data file, and compares
/// against the page's `diagram_id` front-matter key.
pub const RELATED_DIAGRAMS_TEMPLATE: &str = r#"{% assign related_diagrams = site.data.diagrams | where_exp: "item", "item.category == page.category and item.id != page.diagram_id" %}
{% for related in related_diagrams limit:3 %}
- [{{ related.title }}]({{ related.url }}) - {{ related.description }}
{% endfor %}"#;

const PAGE_CSS: &str = include_str!("../static/diagram-page.css");

#[derive(Serialize)]
struct FrontMatter<'a> {
    layout: &'a str,
    title: &'a str,
    description: &'a str,
    category: &'a str,
    complexity: &'a str,
    tags: &'a [String],
    permalink: &'a str,
    diagram_id: &'a str,
}

/// `Some(path)` only for a usable, non-blank link target.
fn link_target(path: Option<&str>) -> Option<&str> {
    path.filter(|p| !p.trim().is_empty())
}

/// Extension shown on the source download button.
fn source_extension(record: &DiagramRecord) -> &str {
    Path::new(&record.drawio)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("drawio")
}

/// Render the front-matter block, fences included.
pub fn render_front_matter(record: &DiagramRecord) -> Result<String, serde_yaml::Error> {
    let front = FrontMatter {
        layout: LAYOUT,
        title: &record.title,
        description: &record.description,
        category: &record.category,
        complexity: &record.complexity,
        tags: &record.tags,
        permalink: &record.url,
        diagram_id: &record.id,
    };
    let yaml = serde_yaml::to_string(&front)?;
    Ok(format!("---\n{yaml}---\n"))
}

/// Render the image and download panel.
pub fn render_viewer(record: &DiagramRecord) -> Markup {
    let png = link_target(record.png.as_deref());
    let svg = link_target(record.svg.as_deref());
    let source = link_target(Some(record.drawio.as_str()));

    html! {
        div class="diagram-viewer" {
            div class="diagram-image" {
                @if let Some(png) = png {
                    img class="diagram-render" src=(png) alt=(record.title);
                }
            }
            div class="diagram-actions" {
                h3 { "Download Options" }
                div class="download-buttons" {
                    @if let Some(png) = png {
                        a href=(png) download class="btn btn-primary" { "Download PNG" }
                    }
                    @if let Some(svg) = svg {
                        a href=(svg) download class="btn btn-secondary" { "Download SVG" }
                    }
                    @if let Some(source) = source {
                        a href=(source) download class="btn btn-outline" {
                            "Download Source (." (source_extension(record)) ")"
                        }
                    }
                }
                h3 { "How to Edit" }
                ol {
                    li { "Download the ." (source_extension(record)) " source file" }
                    li {
                        "Open with "
                        a href="https://app.diagrams.net/" target="_blank" { "draw.io" }
                        " or VS Code with the draw.io extension"
                    }
                    li { "Edit and save your changes" }
                    li { "Export to your preferred format" }
                }
            }
        }
    }
}

/// Render the complete Markdown page for one diagram.
pub fn render_page(record: &DiagramRecord) -> Result<String, serde_yaml::Error> {
    let front = render_front_matter(record)?;
    let viewer = render_viewer(record).into_string();

    Ok(format!(
        "{front}
# {title}

{description}

## Diagram Details

- **Category**: {category}
- **Complexity**: {complexity}
- **Tags**: {tags}

## View Options

{viewer}

## Related Diagrams

{related}

<style>
{css}</style>
",
        title = record.title,
        description = record.description,
        category = record.category,
        complexity = record.complexity,
        tags = record.tags.join(", "),
        related = RELATED_DIAGRAMS_TEMPLATE,
        css = PAGE_CSS,
    ))
}

/// Page filename for a diagram id.
pub fn page_path(pages_dir: &Path, id: &str) -> PathBuf {
    pages_dir.join(format!("{id}.md"))
}

/// Write one page per record into `pages_dir`, creating it if needed.
///
/// Returns the written paths in record order.
pub fn write_pages(records: &[DiagramRecord], pages_dir: &Path) -> Result<Vec<PathBuf>, PageError> {
    fs::create_dir_all(pages_dir)?;
    let mut written = Vec::with_capacity(records.len());
    for record in records {
        let path = page_path(pages_dir, &record.id);
        fs::write(&path, render_page(record)?)?;
        written.push(path);
    }
    Ok(written)
}
