//! Diagram rendering.
//!
//! | Operation | Implementation |
//! |---|---|
//! | **Export PNG/SVG** | draw.io desktop CLI ([`DrawioCli`]), when installed |
//! | **Placeholder PNG** | `image` crate canvas ([`PlaceholderRenderer`]) |
//! | **Thumbnail** | `resize_to_fill` + Lanczos3 ([`create_thumbnail`]) |
//!
//! The module is split into:
//! - **Backend**: [`Renderer`] trait, [`RenderJob`] and [`RenderError`]
//! - **Renderers**: the external CLI and the built-in placeholder
//! - **Thumbnail**: derived image written next to the PNG

pub mod backend;
pub mod drawio_cli;
pub mod placeholder;
mod thumbnail;

pub use backend::{RenderError, RenderJob, RenderOutput, Renderer};
pub use drawio_cli::DrawioCli;
pub use placeholder::PlaceholderRenderer;
pub use thumbnail::create_thumbnail;
