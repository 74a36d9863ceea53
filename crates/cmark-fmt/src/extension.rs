//! Renderer extensions.
//!
//! An extension registers render functions for node kinds, typically custom
//! kinds produced by a parser extension. Built-in kinds can be overridden
//! too; the last registration for a kind wins.

use cmark_tree::{Document, Kind, NodeId, STRIKETHROUGH, WalkStatus};

use crate::context::RenderContext;
use crate::renderer::Renderer;

/// A set of node renderers installed through
/// [`RenderOption::NodeRenderer`](crate::RenderOption::NodeRenderer).
pub trait NodeRenderer: Send + Sync {
    /// Register render functions on `renderer`.
    fn register_funcs(&self, renderer: &mut Renderer);
}

impl<F> NodeRenderer for F
where
    F: Fn(&mut Renderer) + Send + Sync,
{
    fn register_funcs(&self, renderer: &mut Renderer) {
        self(renderer)
    }
}

/// Renders `~~strikethrough~~` spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strikethrough;

impl NodeRenderer for Strikethrough {
    fn register_funcs(&self, renderer: &mut Renderer) {
        renderer.register(Kind::Custom(STRIKETHROUGH), render_strikethrough);
    }
}

fn render_strikethrough(
    ctx: &mut RenderContext<'_>,
    _doc: &Document,
    _node: NodeId,
    _entering: bool,
) -> WalkStatus {
    ctx.writer().write(b"~~");
    WalkStatus::Continue
}
