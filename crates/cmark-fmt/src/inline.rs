//! Renderers for inline nodes.

use std::borrow::Cow;

use cmark_tree::{Document, NodeId, NodeKind, WalkStatus};

use crate::context::{CodeSpanState, RenderContext};

pub(crate) fn render_text(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    let NodeKind::Text {
        value,
        soft_line_break,
        hard_line_break,
    } = doc.kind(node)
    else {
        return WalkStatus::Continue;
    };
    if !entering {
        return WalkStatus::Continue;
    }
    let text = value.bytes(ctx.source());
    if ctx.code_span().is_some() && text.contains(&b'\n') {
        // A code span cannot hold a line break
        let text: Vec<u8> = text
            .iter()
            .map(|&b| if b == b'\n' { b' ' } else { b })
            .collect();
        ctx.writer().write(&text);
    } else {
        ctx.writer().write(text);
    }
    if *hard_line_break {
        // trailing spaces would be trimmed, so use the backslash form
        ctx.writer().write(b"\\");
        ctx.writer().end_line();
    } else if *soft_line_break {
        ctx.writer().end_line();
    }
    WalkStatus::Continue
}

pub(crate) fn render_emphasis(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    _entering: bool,
) -> WalkStatus {
    if let NodeKind::Emphasis { level } = *doc.kind(node) {
        ctx.writer().write_str(&"*".repeat(usize::from(level)));
    }
    WalkStatus::Continue
}

pub(crate) fn render_code_span(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        let source = ctx.source();
        let mut content = Vec::new();
        for child in doc.children(node) {
            if let NodeKind::Text { value, .. } = doc.kind(child) {
                content.extend_from_slice(value.bytes(source));
            }
        }
        let state = code_span_state(&String::from_utf8_lossy(&content));
        ctx.set_code_span(Some(state));
        ctx.writer().write_str(&"`".repeat(state.backtick_length));
        if state.pad_space {
            ctx.writer().write(b" ");
        }
    } else {
        let state = ctx.code_span().unwrap_or_default();
        if state.pad_space {
            ctx.writer().write(b" ");
        }
        ctx.writer().write_str(&"`".repeat(state.backtick_length));
        ctx.set_code_span(None);
    }
    WalkStatus::Continue
}

/// Fence length and padding for code span content.
///
/// The fence is the shortest backtick run that does not occur inside the
/// content. Padding keeps content that starts or ends with a backtick apart
/// from the fence, and keeps space-surrounded content from being stripped.
pub(crate) fn code_span_state(content: &str) -> CodeSpanState {
    let mut run_lengths = Vec::new();
    let mut run = 0;
    let mut only_space = true;
    for c in content.chars() {
        if !c.is_whitespace() && c != '\n' {
            only_space = false;
        }
        if c == '`' {
            run += 1;
        } else if run > 0 {
            run_lengths.push(run);
            run = 0;
        }
    }
    if run > 0 {
        run_lengths.push(run);
    }
    let backtick_length = (1..)
        .find(|len| !run_lengths.contains(len))
        .unwrap_or(1);

    let is_space = |c: Option<char>| c.is_some_and(|c| c.is_whitespace() || c == '\n');
    let (first, last) = (content.chars().next(), content.chars().next_back());
    let begins_with_space = is_space(first);
    let ends_with_space = is_space(last);
    let pad_space = (begins_with_space && ends_with_space && !only_space)
        || first == Some('`')
        || last == Some('`');

    CodeSpanState {
        backtick_length,
        pad_space,
    }
}

pub(crate) fn render_link(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if let NodeKind::Link { destination, title } = doc.kind(node) {
        render_link_common(ctx, destination, title, entering);
    }
    WalkStatus::Continue
}

pub(crate) fn render_image(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if let NodeKind::Image { destination, title } = doc.kind(node) {
        if entering {
            ctx.writer().write(b"!");
        }
        render_link_common(ctx, destination, title, entering);
    }
    WalkStatus::Continue
}

fn render_link_common(ctx: &mut RenderContext<'_>, destination: &str, title: &str, entering: bool) {
    let writer = ctx.writer();
    if entering {
        writer.write(b"[");
        return;
    }
    writer.write(b"](");
    writer.write_str(&link_destination(destination));
    if !title.is_empty() {
        writer.write(b" \"");
        writer.write_str(&title.replace('"', "\\\""));
        writer.write(b"\"");
    }
    writer.write(b")");
}

/// Destinations with spaces go in angle brackets; unbalanced parentheses
/// are escaped.
fn link_destination(destination: &str) -> Cow<'_, str> {
    if destination
        .chars()
        .any(|c| c.is_ascii_whitespace() || c.is_ascii_control())
    {
        let escaped = destination.replace('<', "\\<").replace('>', "\\>");
        return Cow::Owned(format!("<{escaped}>"));
    }
    let mut depth = 0i32;
    let balanced = destination.chars().all(|c| {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        depth >= 0
    }) && depth == 0;
    if balanced {
        Cow::Borrowed(destination)
    } else {
        Cow::Owned(destination.replace('(', "\\(").replace(')', "\\)"))
    }
}

pub(crate) fn render_auto_link(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        ctx.writer().write(b"<");
        if let NodeKind::AutoLink { url } = doc.kind(node) {
            ctx.write_value(url);
        }
    } else {
        ctx.writer().write(b">");
    }
    WalkStatus::Continue
}

pub(crate) fn render_raw_html(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    node: NodeId,
    entering: bool,
) -> WalkStatus {
    if entering {
        if let NodeKind::RawHtml { segments } = doc.kind(node) {
            for segment in segments {
                ctx.write_value(segment);
            }
        }
    }
    WalkStatus::Continue
}
