//! Renderers for block nodes.

use cmark_tree::{Document, NodeId, NodeKind, Value, WalkStatus};

use crate::context::{ListFrame, RenderContext};
use crate::options::{HeadingStyle, ThematicBreakStyle};
use crate::writer::PrefixLines;

const SETEXT_UNDERLINE_MINIMUM: usize = 3;
const CODE_FENCE_MINIMUM: usize = 3;

/// Blank line before loose blocks, line flush after every block.
pub(crate) fn render_block_separator(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        if doc.previous_sibling(node).is_some() && doc.has_blank_previous_lines(node) {
            ctx.writer().end_line();
        }
    } else {
        // the next block starts on a line of its own
        ctx.writer().flush_line();
    }
    WalkStatus::Continue
}

pub(crate) fn render_unsupported(
    _ctx: &mut RenderContext<'_>,
    _doc: &Document,
    _node: NodeId,
    _entering: bool,
) -> WalkStatus {
    WalkStatus::Continue
}

pub(crate) fn render_blockquote(
    ctx: &mut RenderContext<'_>,
    _doc: &Document,
    _node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        ctx.writer().push_prefix("> ", PrefixLines::All);
    } else {
        ctx.writer().pop_prefix();
    }
    WalkStatus::Continue
}

pub(crate) fn render_heading(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    let NodeKind::Heading { level } = *doc.kind(node) else {
        return WalkStatus::Continue;
    };
    // Empty headings and levels above 2 can only be ATX
    if !doc.has_children(node) || level > 2 {
        return render_atx_heading(ctx, doc, node, level, entering);
    }
    // Multiline headings can only be setext
    if doc.lines(node).len() > 1 {
        return render_setext_heading(ctx, doc, node, level, entering);
    }
    // An underline right below text would take that text into the heading
    if ctx.config().heading_style.is_setext() && !follows_inline_text(doc, node) {
        render_setext_heading(ctx, doc, node, level, entering)
    } else {
        render_atx_heading(ctx, doc, node, level, entering)
    }
}

fn render_atx_heading(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    level: u8,
    entering: bool,
) -> WalkStatus {
    let marks = "#".repeat(usize::from(level));
    if entering {
        ctx.writer().write_str(&marks);
        if doc.has_children(node) {
            ctx.writer().write(b" ");
        }
    } else if ctx.config().heading_style == HeadingStyle::AtxSurround {
        ctx.writer().write(b" ");
        ctx.writer().write_str(&marks);
    }
    WalkStatus::Continue
}

fn render_setext_heading(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    level: u8,
    entering: bool,
) -> WalkStatus {
    if entering {
        return WalkStatus::Continue;
    }
    let underline = if level == 1 { "=" } else { "-" };
    let mut width = SETEXT_UNDERLINE_MINIMUM;
    if ctx.config().heading_style == HeadingStyle::FullWidthSetext {
        let source = ctx.source();
        for line in doc.lines(node) {
            width = width.max(display_width(line.bytes(source)));
        }
    }
    ctx.writer().write(b"\n");
    ctx.writer().write_str(&underline.repeat(width));
    WalkStatus::Continue
}

/// Whether `node` starts on the line after a paragraph or text block.
fn follows_inline_text(doc: &Document, node: NodeId) -> bool {
    !doc.has_blank_previous_lines(node)
        && doc.previous_sibling(node).is_some_and(|prev| {
            matches!(doc.kind(prev), NodeKind::Paragraph | NodeKind::TextBlock)
        })
}

fn display_width(bytes: &[u8]) -> usize {
    String::from_utf8_lossy(bytes).chars().count()
}

pub(crate) fn render_thematic_break(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        let config = ctx.config();
        let mut style = config.thematic_break_style;
        // dashes below text read as a setext underline
        if style == ThematicBreakStyle::Dashed && follows_inline_text(doc, node) {
            style = ThematicBreakStyle::Starred;
        }
        let rule = style
            .char()
            .to_string()
            .repeat(config.effective_thematic_break_length());
        ctx.writer().write_str(&rule);
    }
    WalkStatus::Continue
}

/// Write every line of a block, ending each one.
fn render_lines(ctx: &mut RenderContext<'_>, lines: &[Value]) {
    for line in lines {
        ctx.write_value(line);
        ctx.writer().flush_line();
    }
}

pub(crate) fn render_code_block(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        let indent = ctx.config().indent_style.as_str();
        ctx.writer().push_prefix(indent, PrefixLines::All);
        render_lines(ctx, doc.lines(node));
    } else {
        ctx.writer().pop_prefix();
    }
    WalkStatus::Continue
}

pub(crate) fn render_fenced_code_block(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    let NodeKind::FencedCodeBlock { info } = doc.kind(node) else {
        return WalkStatus::Continue;
    };
    let source = ctx.source();
    let info = info.as_ref().map(|info| info.bytes(source));
    let fence = code_fence(source, doc.lines(node), info);
    ctx.writer().write_str(&fence);
    if entering {
        if let Some(info) = info {
            ctx.writer().write(info);
        }
        ctx.writer().flush_line();
        render_lines(ctx, doc.lines(node));
    }
    WalkStatus::Continue
}

/// A fence longer than any fence-like run starting a content line. Tildes
/// are used when the info string contains a backtick.
fn code_fence(source: &[u8], lines: &[Value], info: Option<&[u8]>) -> String {
    let fence_char = if info.is_some_and(|info| info.contains(&b'`')) {
        b'~'
    } else {
        b'`'
    };
    let longest = lines
        .iter()
        .map(|line| {
            line.bytes(source)
                .trim_ascii_start()
                .iter()
                .take_while(|&&b| b == fence_char)
                .count()
        })
        .max()
        .unwrap_or(0);
    let len = CODE_FENCE_MINIMUM.max(longest + 1);
    char::from(fence_char).to_string().repeat(len)
}

pub(crate) fn render_html_block(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        render_lines(ctx, doc.lines(node));
    } else if let NodeKind::HtmlBlock {
        closure: Some(closure),
    } = doc.kind(node)
    {
        let closure = closure.bytes(ctx.source());
        ctx.writer().write_line(closure);
    }
    WalkStatus::Continue
}

pub(crate) fn render_list(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        let (marker, ordered, start) = match *doc.kind(node) {
            NodeKind::List {
                marker,
                ordered,
                start,
            } => (marker, ordered, start),
            _ => (b'-', false, 1),
        };
        ctx.push_list(ListFrame {
            marker,
            ordered,
            ordinal: start,
        });
    } else {
        ctx.pop_list();
    }
    WalkStatus::Continue
}

pub(crate) fn render_list_item(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        let mut item_prefix = String::new();
        match ctx.current_list() {
            Some(list) => {
                if list.ordered {
                    item_prefix.push_str(&list.ordinal.to_string());
                    list.ordinal += 1;
                }
                item_prefix.push(char::from(list.marker));
            }
            None => {
                log::warn!("list item outside of a list, using a bullet");
                item_prefix.push('-');
            }
        }
        item_prefix.push(' ');

        // Subsequent lines align under the item content
        let indent = " "
            .repeat(ctx.config().effective_nested_list_length())
            .repeat(item_prefix.len());
        ctx.writer()
            .push_prefix(item_prefix, PrefixLines::Between(0, 0));
        ctx.writer().push_prefix(indent, PrefixLines::From(1));
    } else {
        if !doc.has_children(node) {
            ctx.writer().end_line();
        }
        ctx.writer().pop_prefix();
        ctx.writer().pop_prefix();
    }
    WalkStatus::Continue
}
