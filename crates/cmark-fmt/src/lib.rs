//! Renders CommonMark document trees back to Markdown.
//!
//! The renderer walks a [`cmark_tree::Document`] and writes every node back
//! as Markdown through a [`LineWriter`], which owns line prefixes such as
//! blockquote markers and list indentation. Style choices come from a
//! [`Config`]; node renderers can be replaced or added through
//! [`RenderOption::NodeRenderer`].
//!
//! ```
//! use cmark_fmt::{Config, HeadingStyle, format};
//!
//! let config = Config::builder()
//!     .heading_style(HeadingStyle::Setext)
//!     .build();
//! let out = format("# Title\n\n* one\n* two\n", &config).unwrap();
//! assert_eq!(out, "Title\n===\n\n* one\n* two\n");
//! ```

mod blocks;
pub mod context;
pub mod error;
pub mod extension;
mod inline;
pub mod options;
pub mod renderer;
pub mod writer;


pub use crate::context::{CodeSpanState, ListFrame, RenderContext};
pub use crate::error::{WriteError, WriteResult};
pub use crate::extension::{NodeRenderer, Strikethrough};
pub use crate::options::{Config, ConfigBuilder, HeadingStyle, IndentStyle, ThematicBreakStyle};
pub use crate::renderer::{NodeRenderFn, RenderOption, Renderer, chain, node_fn};
pub use crate::writer::{LineWriter, PrefixLines};

pub use cmark_tree as tree;

use cmark_tree::ParseOptions;

/// Parse `source` and render it back with `config`.
pub fn format(source: &str, config: &Config) -> WriteResult<String> {
    format_with(source, config, ParseOptions::default())
}

/// Like [`format`], with parser extensions. Enabling strikethrough also
/// installs the [`Strikethrough`] renderer.
pub fn format_with(source: &str, config: &Config, options: ParseOptions) -> WriteResult<String> {
    let doc = cmark_tree::parse_with(source, options);
    let mut renderer = Renderer::new(config.clone());
    if options.strikethrough {
        renderer.add_options([RenderOption::node_renderer(Strikethrough, 0)]);
    }
    renderer.render_to_string(source.as_bytes(), &doc)
}
