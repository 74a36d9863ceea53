//! Build a [`Document`] from CommonMark source with `pulldown-cmark`.
//!
//! Text is kept as segments of the source so that escapes and entity
//! references survive a render unchanged. Code content is normalized by the
//! parser and stored as owned values.

use std::ops::Range;

use ecow::EcoString;
use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};

use crate::document::{Document, NodeId};
use crate::node::{CustomKind, Kind, NodeKind, STRIKETHROUGH, Segment, Value};

/// Kind given to constructs the builder does not model.
pub const UNSUPPORTED: CustomKind = CustomKind::block("Unsupported");

/// Syntax extensions enabled while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Parse `~~text~~` into [`STRIKETHROUGH`] nodes.
    pub strikethrough: bool,
}

impl ParseOptions {
    fn to_pulldown(self) -> Options {
        let mut options = Options::empty();
        if self.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        options
    }
}

/// Parse CommonMark source.
pub fn parse(source: &str) -> Document {
    parse_with(source, ParseOptions::default())
}

/// Parse source with the given extensions.
pub fn parse_with(source: &str, options: ParseOptions) -> Document {
    let mut builder = Builder::new(source);
    for (event, range) in Parser::new_ext(source, options.to_pulldown()).into_offset_iter() {
        builder.event(event, range);
    }
    let doc = builder.finish();
    log::debug!("parsed {} bytes into {} nodes", source.len(), doc.len());
    doc
}

struct Builder<'s> {
    source: &'s [u8],
    doc: Document,
    /// Open nodes, the root at the bottom.
    stack: Vec<NodeId>,
    /// Furthest source offset of content inside each node, by node index.
    content_end: Vec<usize>,
    /// Text node that the next text event extends.
    pending_text: Option<NodeId>,
    code: Option<String>,
    html: Vec<Value>,
}

impl<'s> Builder<'s> {
    fn new(source: &'s str) -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            source: source.as_bytes(),
            doc,
            stack: vec![root],
            content_end: vec![0],
            pending_text: None,
            code: None,
            html: Vec::new(),
        }
    }

    fn finish(self) -> Document {
        self.doc
    }

    fn top(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        if !matches!(event, Event::Text(_)) {
            self.pending_text = None;
        }
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(end) => self.end(end, range),
            Event::Text(text) => self.text(&text, range),
            Event::Code(code) => self.code_span(&code, range),
            Event::Html(html) => self.html(&html, range),
            Event::InlineHtml(html) => self.inline_html(&html, range),
            Event::SoftBreak => self.line_break(false, range),
            Event::HardBreak => self.line_break(true, range),
            Event::Rule => self.rule(range),
            other => log::debug!("ignoring unsupported event {other:?}"),
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        match tag {
            Tag::Paragraph => self.open_block(NodeKind::Paragraph, range),
            Tag::Heading { level, .. } => self.open_block(
                NodeKind::Heading {
                    level: level as u8,
                },
                range,
            ),
            Tag::BlockQuote(_) => self.open_block(NodeKind::Blockquote, range),
            Tag::CodeBlock(CodeBlockKind::Indented) => {
                self.code = Some(String::new());
                self.open_block(NodeKind::CodeBlock, range)
            }
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
                self.code = Some(String::new());
                let info = (!info.is_empty()).then(|| Value::Owned(EcoString::from(&*info)));
                self.open_block(NodeKind::FencedCodeBlock { info }, range)
            }
            Tag::HtmlBlock => self.open_block(NodeKind::HtmlBlock { closure: None }, range),
            Tag::List(start) => {
                let marker = list_marker(self.source, range.start, start.is_some());
                let kind = NodeKind::List {
                    marker,
                    ordered: start.is_some(),
                    start: start.unwrap_or(1),
                };
                self.open_block(kind, range)
            }
            Tag::Item => self.open_block(NodeKind::ListItem, range),
            Tag::Emphasis => self.open_inline(NodeKind::Emphasis { level: 1 }, range),
            Tag::Strong => self.open_inline(NodeKind::Emphasis { level: 2 }, range),
            Tag::Strikethrough => self.open_inline(NodeKind::Custom(STRIKETHROUGH), range),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let kind = if matches!(link_type, LinkType::Autolink | LinkType::Email) {
                    let url = Segment::new(range.start + 1, range.end.saturating_sub(1));
                    NodeKind::AutoLink { url: url.into() }
                } else {
                    NodeKind::Link {
                        destination: EcoString::from(&*dest_url),
                        title: EcoString::from(&*title),
                    }
                };
                self.open_inline(kind, range)
            }
            Tag::Image {
                dest_url, title, ..
            } => self.open_inline(
                NodeKind::Image {
                    destination: EcoString::from(&*dest_url),
                    title: EcoString::from(&*title),
                },
                range,
            ),
            other => {
                log::debug!("unsupported tag {other:?}");
                self.open_block(NodeKind::Custom(UNSUPPORTED), range)
            }
        }
    }

    fn end(&mut self, end: TagEnd, range: Range<usize>) {
        self.close_text_block();
        let id = self.top();
        match end {
            TagEnd::CodeBlock => {
                let code = self.code.take().unwrap_or_default();
                let lines = code
                    .split_inclusive('\n')
                    .map(|line| Value::Owned(line.into()))
                    .collect();
                self.doc.set_lines(id, lines);
                if matches!(self.doc.kind(id), NodeKind::FencedCodeBlock { .. }) {
                    self.touch(range.end);
                }
            }
            TagEnd::Heading(_) => {
                let lines = heading_lines(self.source, range.clone());
                self.doc.set_lines(id, lines);
                self.touch(range.end);
            }
            TagEnd::HtmlBlock => {
                let lines = std::mem::take(&mut self.html);
                self.doc.set_lines(id, lines);
            }
            _ => {}
        }
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn text(&mut self, text: &str, range: Range<usize>) {
        if let Some(code) = &mut self.code {
            code.push_str(text);
            self.touch(range.end);
            return;
        }
        if matches!(self.doc.kind(self.top()), NodeKind::AutoLink { .. }) {
            return;
        }
        if let Some(id) = self.pending_text {
            if let NodeKind::Text {
                value: Value::Source(segment),
                ..
            } = self.doc.kind_mut(id)
            {
                segment.stop = range.end;
                self.touch(range.end);
                return;
            }
        }

        // The parser drops the backslash of an escape from the text range.
        let mut start = range.start;
        if start > 0
            && self.source[start - 1] == b'\\'
            && self.source.get(start).is_some_and(u8::is_ascii_punctuation)
        {
            start -= 1;
        }
        let kind = NodeKind::text(Segment::new(start, range.end));
        let id = self.leaf(kind, start..range.end);
        self.touch(range.end);
        self.pending_text = Some(id);
    }

    fn code_span(&mut self, code: &str, range: Range<usize>) {
        let span = self.leaf(NodeKind::CodeSpan, range.clone());
        self.touch(range.end);
        let text = self.alloc(NodeKind::text(code), range);
        self.doc.append_child(span, text);
    }

    fn html(&mut self, html: &str, range: Range<usize>) {
        if matches!(self.doc.kind(self.top()), NodeKind::HtmlBlock { .. }) {
            self.touch(range.end);
            self.html.push(Segment::new(range.start, range.end).into());
        } else {
            self.inline_html(html, range);
        }
    }

    fn inline_html(&mut self, html: &str, range: Range<usize>) {
        let end = range.end;
        // Across lines the parser hands out the tag without container markers.
        let value = if self.source.get(range.clone()) == Some(html.as_bytes()) {
            Value::from(Segment::new(range.start, range.end))
        } else {
            Value::Owned(EcoString::from(html))
        };
        self.leaf(NodeKind::RawHtml { segments: vec![value] }, range);
        self.touch(end);
    }

    fn line_break(&mut self, hard: bool, range: Range<usize>) {
        let container = self.inline_container(range.start);
        if let Some(last) = self.doc.last_child(container) {
            if let NodeKind::Text {
                soft_line_break,
                hard_line_break,
                ..
            } = self.doc.kind_mut(last)
            {
                if !*soft_line_break && !*hard_line_break {
                    *soft_line_break = !hard;
                    *hard_line_break = hard;
                    return;
                }
            }
        }
        let kind = NodeKind::Text {
            value: Value::default(),
            soft_line_break: !hard,
            hard_line_break: hard,
        };
        self.leaf(kind, range);
    }

    fn rule(&mut self, range: Range<usize>) {
        self.open_block(NodeKind::ThematicBreak, range.clone());
        self.touch(range.end);
        self.stack.pop();
    }

    fn alloc(&mut self, kind: NodeKind, range: Range<usize>) -> NodeId {
        let id = self.doc.new_node(kind);
        self.content_end.push(range.start);
        self.doc.set_source_range(id, range);
        id
    }

    fn open_block(&mut self, kind: NodeKind, range: Range<usize>) {
        self.close_text_block();
        let parent = self.top();
        let blank = self.blank_before(parent, range.start, kind.kind());
        let id = self.alloc(kind, range);
        self.doc.set_blank_previous_lines(id, blank);
        self.doc.append_child(parent, id);
        self.stack.push(id);
    }

    fn open_inline(&mut self, kind: NodeKind, range: Range<usize>) {
        let parent = self.inline_container(range.start);
        let id = self.alloc(kind, range);
        self.doc.append_child(parent, id);
        self.stack.push(id);
    }

    fn leaf(&mut self, kind: NodeKind, range: Range<usize>) -> NodeId {
        let parent = self.inline_container(range.start);
        let id = self.alloc(kind, range);
        self.doc.append_child(parent, id);
        id
    }

    /// Inline content directly inside a tight list item goes in a text block.
    fn inline_container(&mut self, start: usize) -> NodeId {
        if matches!(self.doc.kind(self.top()), NodeKind::ListItem) {
            self.open_block(NodeKind::TextBlock, start..start);
        }
        self.top()
    }

    fn close_text_block(&mut self) {
        if self.stack.len() > 1 && matches!(self.doc.kind(self.top()), NodeKind::TextBlock) {
            self.stack.pop();
        }
    }

    fn touch(&mut self, end: usize) {
        for id in &self.stack {
            let slot = &mut self.content_end[id.index()];
            *slot = (*slot).max(end);
        }
    }

    fn blank_before(&self, parent: NodeId, start: usize, kind: Kind) -> bool {
        let Some(prev) = self.doc.last_child(parent) else {
            return false;
        };
        let prev_kind = self.doc.kind(prev).kind();
        // Keep headings apart from paragraphs so that a change of heading
        // style cannot merge them. A blank line would loosen a tight item.
        let tight = kind == Kind::TextBlock || prev_kind == Kind::TextBlock;
        if (kind == Kind::Heading || prev_kind == Kind::Heading) && !tight {
            return true;
        }
        if kind == Kind::ThematicBreak && prev_kind == Kind::Paragraph {
            return true;
        }
        has_blank_line(self.source, self.content_end[prev.index()], start)
    }
}

/// Whether `source[from..to]` contains a complete line that is blank once
/// block quote markers are removed.
fn has_blank_line(source: &[u8], from: usize, to: usize) -> bool {
    if from >= to || to > source.len() {
        return false;
    }
    let at_line_start = from == 0 || source[from - 1] == b'\n';
    let pieces: Vec<&[u8]> = source[from..to].split(|&b| b == b'\n').collect();
    let last = pieces.len() - 1;
    pieces.iter().enumerate().any(|(i, piece)| {
        let complete = i < last && (i > 0 || at_line_start);
        complete && piece.iter().all(|&b| b.is_ascii_whitespace() || b == b'>')
    })
}

fn list_marker(source: &[u8], start: usize, ordered: bool) -> u8 {
    let rest = source.get(start..).unwrap_or_default();
    let mut bytes = rest
        .iter()
        .copied()
        .skip_while(|b| b.is_ascii_whitespace() || *b == b'>');
    if ordered {
        match bytes.find(|b| !b.is_ascii_digit()) {
            Some(b')') => b')',
            _ => b'.',
        }
    } else {
        match bytes.next() {
            Some(marker @ (b'-' | b'+' | b'*')) => marker,
            _ => b'-',
        }
    }
}

/// Content lines of a heading; more than one line means setext source.
fn heading_lines(source: &[u8], range: Range<usize>) -> Vec<Value> {
    let mut lines = Vec::new();
    let mut offset = range.start;
    for raw in source[range.clone()].split_inclusive(|&b| b == b'\n') {
        let start = offset;
        offset += raw.len();
        let trimmed = raw.trim_ascii_end();
        if !trimmed.is_empty() {
            lines.push(Segment::new(start, start + trimmed.len()));
        }
    }
    let Some(first) = lines.first().copied() else {
        return Vec::new();
    };

    // A setext heading spans its content lines and the underline
    let setext = lines.len() > 1
        && lines
            .last()
            .is_some_and(|line| is_setext_underline(line.value(source)));
    if !setext {
        return atx_content(source, first).into_iter().map(Value::from).collect();
    }
    lines.pop();
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let bytes = line.value(source);
            let skip = bytes
                .iter()
                .take_while(|&&b| b == b' ' || b == b'\t' || (i > 0 && b == b'>'))
                .count();
            Value::from(line.with_start(line.start + skip))
        })
        .collect()
}

fn is_setext_underline(line: &[u8]) -> bool {
    let line = line.trim_ascii();
    let line = line
        .iter()
        .position(|&b| b != b'>' && b != b' ' && b != b'\t')
        .map_or(&b""[..], |pos| &line[pos..]);
    !line.is_empty() && (line.iter().all(|&b| b == b'=') || line.iter().all(|&b| b == b'-'))
}

/// Text of an ATX heading line without its opening and closing sequences.
fn atx_content(source: &[u8], line: Segment) -> Option<Segment> {
    let bytes = line.value(source);
    let mut start = bytes.iter().take_while(|&&b| b == b' ').count();
    start += bytes[start..].iter().take_while(|&&b| b == b'#').count();
    start += bytes[start..]
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();
    let mut end = bytes.len();
    let hashes = bytes[start..end].iter().rev().take_while(|&&b| b == b'#').count();
    if hashes == end - start || matches!(bytes[end - hashes - 1], b' ' | b'\t') {
        end -= hashes;
    }
    end = start + bytes[start..end].trim_ascii_end().len();
    (start < end).then(|| Segment::new(line.start + start, line.start + end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(doc: &Document) -> Vec<Kind> {
        doc.child_kinds(doc.root())
    }

    fn blank_flags(doc: &Document) -> Vec<bool> {
        doc.children(doc.root())
            .map(|id| doc.has_blank_previous_lines(id))
            .collect()
    }

    fn text_of(doc: &Document, source: &str, id: NodeId) -> String {
        match doc.kind(id) {
            NodeKind::Text { value, .. } => {
                String::from_utf8_lossy(value.bytes(source.as_bytes())).into_owned()
            }
            other => panic!("not a text node: {other:?}"),
        }
    }

    #[test]
    fn blank_line_detection() {
        assert!(has_blank_line(b"a\n\nb", 1, 3));
        assert!(!has_blank_line(b"a\nb", 1, 2));
        assert!(has_blank_line(b"> a\n>\n> b", 3, 8));
        assert!(!has_blank_line(b"> a\n> b", 3, 6));
        // The remainder of the previous line is not a line of its own.
        assert!(!has_blank_line(b"a  \nb", 1, 4));
        assert!(has_blank_line(b"```\n\nb", 4, 5));
    }

    #[test]
    fn list_markers_are_read_from_source() {
        assert_eq!(list_marker(b"* a", 0, false), b'*');
        assert_eq!(list_marker(b"  + a", 0, false), b'+');
        assert_eq!(list_marker(b"12) a", 0, true), b')');
        assert_eq!(list_marker(b"> 3. a", 0, true), b'.');
    }

    #[test]
    fn atx_heading_content_strips_sequences() {
        let source = b"## Foo ##";
        assert_eq!(
            atx_content(source, Segment::new(0, source.len())),
            Some(Segment::new(3, 6))
        );
        let source = b"# Foo#";
        assert_eq!(
            atx_content(source, Segment::new(0, source.len())),
            Some(Segment::new(2, 6))
        );
        assert_eq!(atx_content(b"##", Segment::new(0, 2)), None);
    }

    #[test]
    fn paragraphs_keep_blank_separation() {
        let doc = parse("foo\n\nbar\n");
        assert_eq!(blocks(&doc), [Kind::Paragraph, Kind::Paragraph]);
        assert_eq!(blank_flags(&doc), [false, true]);
    }

    #[test]
    fn escapes_stay_in_text_segments() {
        let source = "\\# foo \\*bar\\*";
        let doc = parse(source);
        let para = doc.first_child(doc.root()).unwrap();
        let texts: Vec<_> = doc
            .children(para)
            .map(|id| text_of(&doc, source, id))
            .collect();
        assert_eq!(texts, [source]);
    }

    #[test]
    fn soft_breaks_mark_text() {
        let source = "foo\nbar";
        let doc = parse(source);
        let para = doc.first_child(doc.root()).unwrap();
        let first = doc.first_child(para).unwrap();
        assert!(matches!(
            doc.kind(first),
            NodeKind::Text {
                soft_line_break: true,
                hard_line_break: false,
                ..
            }
        ));
        assert_eq!(text_of(&doc, source, first), "foo");
    }

    #[test]
    fn tight_items_wrap_inline_content() {
        let doc = parse("- a\n- b\n");
        let list = doc.first_child(doc.root()).unwrap();
        assert!(matches!(
            doc.kind(list),
            NodeKind::List {
                marker: b'-',
                ordered: false,
                ..
            }
        ));
        for item in doc.children(list) {
            assert_eq!(doc.child_kinds(item), [Kind::TextBlock]);
        }
    }

    #[test]
    fn loose_items_are_flagged() {
        let doc = parse("- a\n\n- b\n");
        let list = doc.first_child(doc.root()).unwrap();
        let flags: Vec<_> = doc
            .children(list)
            .map(|id| doc.has_blank_previous_lines(id))
            .collect();
        assert_eq!(flags, [false, true]);
    }

    #[test]
    fn ordered_list_start() {
        let doc = parse("3) a\n4) b\n");
        let list = doc.first_child(doc.root()).unwrap();
        assert_eq!(
            doc.kind(list),
            &NodeKind::List {
                marker: b')',
                ordered: true,
                start: 3,
            }
        );
    }

    #[test]
    fn setext_heading_lines() {
        let source = "Foo\nBar\n---\n";
        let doc = parse(source);
        let heading = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.kind(heading), &NodeKind::Heading { level: 2 });
        let lines: Vec<_> = doc
            .lines(heading)
            .iter()
            .map(|line| line.bytes(source.as_bytes()))
            .collect();
        assert_eq!(lines, [&b"Foo"[..], b"Bar"]);
    }

    #[test]
    fn headings_are_separated_from_paragraphs() {
        let doc = parse("## ATX Heading\nSetext Heading\n---\nparagraph\n");
        assert_eq!(blocks(&doc), [Kind::Heading, Kind::Heading, Kind::Paragraph]);
        assert_eq!(blank_flags(&doc), [false, true, true]);
    }

    #[test]
    fn headings_keep_tight_items_tight() {
        let doc = parse("- a\n  # b\n  c\n");
        let list = doc.first_child(doc.root()).unwrap();
        let item = doc.first_child(list).unwrap();
        assert_eq!(
            doc.child_kinds(item),
            [Kind::TextBlock, Kind::Heading, Kind::TextBlock]
        );
        assert!(doc.children(item).all(|id| !doc.has_blank_previous_lines(id)));
    }

    fn raw_html(doc: &Document) -> Vec<Value> {
        let mut values = Vec::new();
        let mut pending = vec![doc.root()];
        while let Some(id) = pending.pop() {
            if let NodeKind::RawHtml { segments } = doc.kind(id) {
                values.extend(segments.iter().cloned());
            }
            pending.extend(doc.children(id));
        }
        values
    }

    #[test]
    fn inline_html_on_one_line_is_a_segment() {
        let source = "a <b>c";
        let doc = parse(source);
        let para = doc.first_child(doc.root()).unwrap();
        let html = doc.children(para).nth(1).unwrap();
        assert_eq!(doc.source_range(html), Some(2..5));
        assert_eq!(raw_html(&doc)[0].segment(), Some(Segment::new(2, 5)));
    }

    #[test]
    fn inline_html_across_lines_drops_container_markers() {
        let source = "> a <span\n> class=\"x\">b\n";
        let doc = parse(source);
        let html = raw_html(&doc);
        assert_eq!(html.len(), 1);
        assert_eq!(html[0].segment(), None);
        assert_eq!(html[0].bytes(source.as_bytes()), b"<span\nclass=\"x\">");
    }

    #[test]
    fn code_block_lines_are_owned() {
        let doc = parse("```rust\nfn main() {}\n\nlet x = 1;\n```\n");
        let code = doc.first_child(doc.root()).unwrap();
        assert_eq!(
            doc.kind(code),
            &NodeKind::FencedCodeBlock {
                info: Some(Value::from("rust"))
            }
        );
        assert_eq!(
            doc.lines(code),
            [
                Value::from("fn main() {}\n"),
                Value::from("\n"),
                Value::from("let x = 1;\n")
            ]
        );
    }

    #[test]
    fn autolinks_keep_url_segment() {
        let source = "<https://example.com>";
        let doc = parse(source);
        let para = doc.first_child(doc.root()).unwrap();
        let link = doc.first_child(para).unwrap();
        match doc.kind(link) {
            NodeKind::AutoLink { url } => {
                assert_eq!(url.bytes(source.as_bytes()), b"https://example.com")
            }
            other => panic!("expected an autolink, got {other:?}"),
        }
        assert!(!doc.has_children(link));
    }

    #[test]
    fn strikethrough_needs_option() {
        let source = "~~gone~~";
        let plain = parse(source);
        let para = plain.first_child(plain.root()).unwrap();
        assert_eq!(plain.child_kinds(para), [Kind::Text]);

        let doc = parse_with(source, ParseOptions { strikethrough: true });
        let para = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.child_kinds(para), [Kind::Custom(STRIKETHROUGH)]);
    }
}
