//! Node dispatch for the Markdown renderer.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use cmark_tree::{Document, Kind, NodeId, WalkStatus, walk};

use crate::blocks;
use crate::context::RenderContext;
use crate::error::{WriteError, WriteResult};
use crate::extension::NodeRenderer;
use crate::inline;
use crate::options::{Config, HeadingStyle, IndentStyle, ThematicBreakStyle};

/// Function rendering one node kind.
///
/// Called with `entering == true` before the children of the node and with
/// `entering == false` after them.
pub type NodeRenderFn =
    Arc<dyn Fn(&mut RenderContext<'_>, &Document, NodeId, bool) -> WalkStatus + Send + Sync>;

type RenderFnPtr = fn(&mut RenderContext<'_>, &Document, NodeId, bool) -> WalkStatus;

/// Wrap a closure or function as a [`NodeRenderFn`].
pub fn node_fn<F>(f: F) -> NodeRenderFn
where
    F: Fn(&mut RenderContext<'_>, &Document, NodeId, bool) -> WalkStatus + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Compose renderers: forward order when entering, reverse order when
/// exiting. The status of the last one called is returned.
pub fn chain(renderers: Vec<NodeRenderFn>) -> NodeRenderFn {
    node_fn(move |ctx, doc, node, entering| {
        let mut status = WalkStatus::Continue;
        let len = renderers.len();
        for i in 0..len {
            let index = if entering { i } else { len - 1 - i };
            status = renderers[index](ctx, doc, node, entering);
        }
        status
    })
}

fn with_separator(render: NodeRenderFn) -> NodeRenderFn {
    chain(vec![node_fn(blocks::render_block_separator), render])
}

/// Option accepted by [`Renderer::add_options`].
#[derive(Clone)]
pub enum RenderOption {
    /// Set [`Config::indent_style`].
    IndentStyle(IndentStyle),
    /// Set [`Config::heading_style`].
    HeadingStyle(HeadingStyle),
    /// Set [`Config::thematic_break_style`].
    ThematicBreakStyle(ThematicBreakStyle),
    /// Set [`Config::thematic_break_length`].
    ThematicBreakLength(usize),
    /// Set [`Config::nested_list_length`].
    NestedListLength(usize),
    /// Install an extension. Extensions register in ascending priority, so
    /// the highest priority wins when two claim the same kind.
    NodeRenderer {
        /// The extension.
        renderer: Arc<dyn NodeRenderer>,
        /// Registration priority.
        priority: i32,
    },
}

impl RenderOption {
    /// Install `renderer` with the given priority.
    pub fn node_renderer(renderer: impl NodeRenderer + 'static, priority: i32) -> Self {
        RenderOption::NodeRenderer {
            renderer: Arc::new(renderer),
            priority,
        }
    }
}

impl fmt::Debug for RenderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderOption::IndentStyle(style) => f.debug_tuple("IndentStyle").field(style).finish(),
            RenderOption::HeadingStyle(style) => {
                f.debug_tuple("HeadingStyle").field(style).finish()
            }
            RenderOption::ThematicBreakStyle(style) => {
                f.debug_tuple("ThematicBreakStyle").field(style).finish()
            }
            RenderOption::ThematicBreakLength(len) => {
                f.debug_tuple("ThematicBreakLength").field(len).finish()
            }
            RenderOption::NestedListLength(len) => {
                f.debug_tuple("NestedListLength").field(len).finish()
            }
            RenderOption::NodeRenderer { priority, .. } => f
                .debug_struct("NodeRenderer")
                .field("priority", priority)
                .finish_non_exhaustive(),
        }
    }
}

/// Renders a [`Document`] back to Markdown.
///
/// The dispatch table is built when the renderer is created and is read-only
/// while rendering, so one renderer can serve concurrent renders.
pub struct Renderer {
    config: Config,
    funcs: HashMap<Kind, NodeRenderFn>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("kinds", &self.funcs.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Renderer {
    /// Create a renderer with the default node renderers.
    pub fn new(config: Config) -> Self {
        let mut funcs: HashMap<Kind, NodeRenderFn> = HashMap::new();

        // blocks
        funcs.insert(Kind::Document, node_fn(blocks::render_block_separator));
        funcs.insert(Kind::Paragraph, node_fn(blocks::render_block_separator));
        funcs.insert(Kind::TextBlock, node_fn(blocks::render_block_separator));
        let blocks: [(Kind, RenderFnPtr); 9] = [
            (Kind::Heading, blocks::render_heading),
            (Kind::Blockquote, blocks::render_blockquote),
            (Kind::CodeBlock, blocks::render_code_block),
            (Kind::FencedCodeBlock, blocks::render_fenced_code_block),
            (Kind::HtmlBlock, blocks::render_html_block),
            (Kind::List, blocks::render_list),
            (Kind::ListItem, blocks::render_list_item),
            (Kind::ThematicBreak, blocks::render_thematic_break),
            (Kind::Custom(cmark_tree::parse::UNSUPPORTED), blocks::render_unsupported),
        ];
        for (kind, render) in blocks {
            funcs.insert(kind, with_separator(node_fn(render)));
        }

        // inlines
        let inlines: [(Kind, RenderFnPtr); 7] = [
            (Kind::AutoLink, inline::render_auto_link),
            (Kind::CodeSpan, inline::render_code_span),
            (Kind::Emphasis, inline::render_emphasis),
            (Kind::Image, inline::render_image),
            (Kind::Link, inline::render_link),
            (Kind::RawHtml, inline::render_raw_html),
            (Kind::Text, inline::render_text),
        ];
        for (kind, render) in inlines {
            funcs.insert(kind, node_fn(render));
        }

        Self { config, funcs }
    }

    /// Create a renderer and apply `options` to it.
    pub fn with_options(config: Config, options: impl IntoIterator<Item = RenderOption>) -> Self {
        let mut renderer = Self::new(config);
        renderer.add_options(options);
        renderer
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Whether a renderer is registered for `kind`.
    pub fn has_renderer(&self, kind: Kind) -> bool {
        self.funcs.contains_key(&kind)
    }

    /// Render nodes of `kind` with `render`, replacing the current renderer
    /// for that kind. Block kinds keep the blank line and line flushing
    /// behavior shared by all blocks.
    pub fn register<F>(&mut self, kind: Kind, render: F)
    where
        F: Fn(&mut RenderContext<'_>, &Document, NodeId, bool) -> WalkStatus + Send + Sync + 'static,
    {
        let render = node_fn(render);
        let render = if kind.is_block() {
            with_separator(render)
        } else {
            render
        };
        self.funcs.insert(kind, render);
    }

    /// Apply configuration options and install extensions.
    pub fn add_options(&mut self, options: impl IntoIterator<Item = RenderOption>) {
        let mut extensions = Vec::new();
        for option in options {
            match option {
                RenderOption::IndentStyle(style) => self.config.indent_style = style,
                RenderOption::HeadingStyle(style) => self.config.heading_style = style,
                RenderOption::ThematicBreakStyle(style) => self.config.thematic_break_style = style,
                RenderOption::ThematicBreakLength(len) => self.config.thematic_break_length = len,
                RenderOption::NestedListLength(len) => self.config.nested_list_length = len,
                RenderOption::NodeRenderer { renderer, priority } => {
                    extensions.push((priority, renderer))
                }
            }
        }
        extensions.sort_by_key(|(priority, _)| *priority);
        for (_, extension) in extensions {
            extension.register_funcs(self);
        }
    }

    /// Render the whole document to `out`.
    ///
    /// Stops at the first write error and returns it. Lines written before
    /// the error stay in the sink.
    pub fn render(&self, out: &mut dyn Write, source: &[u8], doc: &Document) -> WriteResult<()> {
        self.render_node(out, source, doc, doc.root())
    }

    /// Render the subtree at `node` to `out`.
    pub fn render_node(
        &self,
        out: &mut dyn Write,
        source: &[u8],
        doc: &Document,
        node: NodeId,
    ) -> WriteResult<()> {
        log::debug!(
            "rendering {} node with {} bytes of source",
            doc.kind(node).kind(),
            source.len()
        );
        let mut ctx = RenderContext::new(out, source, &self.config);
        walk(doc, node, &mut |id, entering| {
            let status = self.dispatch(&mut ctx, doc, id, entering);
            ctx.writer().check()?;
            Ok::<_, WriteError>(status)
        })?;
        ctx.writer().flush_line();
        ctx.writer().check()?;
        log::debug!("rendered {} lines", ctx.writer().line());
        Ok(())
    }

    /// Render the whole document into a string.
    pub fn render_to_string(&self, source: &[u8], doc: &Document) -> WriteResult<String> {
        let mut out = Vec::new();
        self.render(&mut out, source, doc)?;
        String::from_utf8(out).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
    }

    fn dispatch(
        &self,
        ctx: &mut RenderContext<'_>,
        doc: &Document,
        node: NodeId,
        entering: bool,
    ) -> WalkStatus {
        let kind = doc.kind(node).kind();
        log::trace!("{} {kind} node", if entering { "entering" } else { "leaving" });
        match self.funcs.get(&kind) {
            Some(render) => render(ctx, doc, node, entering),
            None => {
                if entering {
                    log::warn!("no renderer for {kind} nodes, rendering their children only");
                }
                WalkStatus::Continue
            }
        }
    }
}
