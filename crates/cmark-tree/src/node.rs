//! Node kinds and the source-backed values they carry.

use std::fmt;

use ecow::EcoString;

/// A half-open byte range into the document source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Segment {
    /// First byte of the segment.
    pub start: usize,
    /// One past the last byte of the segment.
    pub stop: usize,
}

impl Segment {
    /// Create a segment covering `start..stop`.
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Length of the segment in bytes.
    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    /// Whether the segment covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes of the source covered by this segment.
    ///
    /// Out of range segments are clamped to the source length.
    pub fn value<'s>(&self, source: &'s [u8]) -> &'s [u8] {
        let stop = self.stop.min(source.len());
        let start = self.start.min(stop);
        &source[start..stop]
    }

    /// The same segment with a different start.
    pub fn with_start(self, start: usize) -> Self {
        Self { start, ..self }
    }

    /// The same segment with a different stop.
    pub fn with_stop(self, stop: usize) -> Self {
        Self { stop, ..self }
    }
}

/// Content of a node, either borrowed from the source or synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Bytes referenced by offset into the source buffer.
    Source(Segment),
    /// Content that does not exist in the source, e.g. inserted by a transform.
    Owned(EcoString),
}

impl Value {
    /// Resolve the value against the source buffer.
    pub fn bytes<'a>(&'a self, source: &'a [u8]) -> &'a [u8] {
        match self {
            Value::Source(segment) => segment.value(source),
            Value::Owned(text) => text.as_bytes(),
        }
    }

    /// Length of the resolved value in bytes.
    pub fn len(&self, source: &[u8]) -> usize {
        self.bytes(source).len()
    }

    /// Whether the resolved value is empty.
    pub fn is_empty(&self, source: &[u8]) -> bool {
        self.len(source) == 0
    }

    /// The source segment, if this value is source-backed.
    pub fn segment(&self) -> Option<Segment> {
        match self {
            Value::Source(segment) => Some(*segment),
            Value::Owned(_) => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Owned(EcoString::new())
    }
}

impl From<Segment> for Value {
    fn from(segment: Segment) -> Self {
        Value::Source(segment)
    }
}

impl From<EcoString> for Value {
    fn from(text: EcoString) -> Self {
        Value::Owned(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Owned(text.into())
    }
}

/// Identifier of a node kind registered outside of the CommonMark core set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomKind {
    /// Stable name of the kind.
    pub name: &'static str,
    /// Whether nodes of this kind are blocks.
    pub block: bool,
}

impl CustomKind {
    /// Declare a block kind.
    pub const fn block(name: &'static str) -> Self {
        Self { name, block: true }
    }

    /// Declare an inline kind.
    pub const fn inline(name: &'static str) -> Self {
        Self { name, block: false }
    }
}

/// GFM strikethrough, `~~text~~`.
pub const STRIKETHROUGH: CustomKind = CustomKind::inline("Strikethrough");

/// A node kind together with its kind-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of a document.
    Document,
    /// ATX or setext heading.
    Heading {
        /// Level from 1 to 6.
        level: u8,
    },
    /// Paragraph.
    Paragraph,
    /// Inline content of a tight list item, a paragraph without separation.
    TextBlock,
    /// Ordered or bullet list.
    List {
        /// Bullet character (`-`, `+`, `*`) or ordered delimiter (`.`, `)`).
        marker: u8,
        /// Whether the list is ordered.
        ordered: bool,
        /// First ordinal of an ordered list.
        start: u64,
    },
    /// Item of a list.
    ListItem,
    /// Indented code block.
    CodeBlock,
    /// Fenced code block.
    FencedCodeBlock {
        /// Info string after the opening fence.
        info: Option<Value>,
    },
    /// Raw HTML block.
    HtmlBlock {
        /// Line closing the block, written after the block lines.
        closure: Option<Value>,
    },
    /// Block quote.
    Blockquote,
    /// Thematic break.
    ThematicBreak,
    /// Literal text.
    Text {
        /// Text content.
        value: Value,
        /// The text is followed by a soft line break.
        soft_line_break: bool,
        /// The text is followed by a hard line break.
        hard_line_break: bool,
    },
    /// Emphasis of the given strength.
    Emphasis {
        /// 1 for emphasis, 2 for strong, 3 for both.
        level: u8,
    },
    /// Code span, its content is the text children.
    CodeSpan,
    /// Inline link, its content is the children.
    Link {
        /// Link destination.
        destination: EcoString,
        /// Link title, empty if absent.
        title: EcoString,
    },
    /// Image, its alt text is the children.
    Image {
        /// Image source.
        destination: EcoString,
        /// Image title, empty if absent.
        title: EcoString,
    },
    /// Angle-bracket autolink.
    AutoLink {
        /// URL or email address between the brackets.
        url: Value,
    },
    /// Inline raw HTML.
    RawHtml {
        /// Source segments of the HTML.
        segments: Vec<Value>,
    },
    /// Extension node.
    Custom(CustomKind),
}

impl NodeKind {
    /// Plain text with no line break.
    pub fn text(value: impl Into<Value>) -> Self {
        NodeKind::Text {
            value: value.into(),
            soft_line_break: false,
            hard_line_break: false,
        }
    }

    /// The fieldless kind of this node.
    pub fn kind(&self) -> Kind {
        match self {
            NodeKind::Document => Kind::Document,
            NodeKind::Heading { .. } => Kind::Heading,
            NodeKind::Paragraph => Kind::Paragraph,
            NodeKind::TextBlock => Kind::TextBlock,
            NodeKind::List { .. } => Kind::List,
            NodeKind::ListItem => Kind::ListItem,
            NodeKind::CodeBlock => Kind::CodeBlock,
            NodeKind::FencedCodeBlock { .. } => Kind::FencedCodeBlock,
            NodeKind::HtmlBlock { .. } => Kind::HtmlBlock,
            NodeKind::Blockquote => Kind::Blockquote,
            NodeKind::ThematicBreak => Kind::ThematicBreak,
            NodeKind::Text { .. } => Kind::Text,
            NodeKind::Emphasis { .. } => Kind::Emphasis,
            NodeKind::CodeSpan => Kind::CodeSpan,
            NodeKind::Link { .. } => Kind::Link,
            NodeKind::Image { .. } => Kind::Image,
            NodeKind::AutoLink { .. } => Kind::AutoLink,
            NodeKind::RawHtml { .. } => Kind::RawHtml,
            NodeKind::Custom(custom) => Kind::Custom(*custom),
        }
    }
}

/// Identifier of a node kind, used to key renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Kind {
    Document,
    Heading,
    Paragraph,
    TextBlock,
    List,
    ListItem,
    CodeBlock,
    FencedCodeBlock,
    HtmlBlock,
    Blockquote,
    ThematicBreak,
    Text,
    Emphasis,
    CodeSpan,
    Link,
    Image,
    AutoLink,
    RawHtml,
    Custom(CustomKind),
}

impl Kind {
    /// Whether nodes of this kind are blocks.
    pub fn is_block(self) -> bool {
        match self {
            Kind::Document
            | Kind::Heading
            | Kind::Paragraph
            | Kind::TextBlock
            | Kind::List
            | Kind::ListItem
            | Kind::CodeBlock
            | Kind::FencedCodeBlock
            | Kind::HtmlBlock
            | Kind::Blockquote
            | Kind::ThematicBreak => true,
            Kind::Text
            | Kind::Emphasis
            | Kind::CodeSpan
            | Kind::Link
            | Kind::Image
            | Kind::AutoLink
            | Kind::RawHtml => false,
            Kind::Custom(custom) => custom.block,
        }
    }

    /// Name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Document => "Document",
            Kind::Heading => "Heading",
            Kind::Paragraph => "Paragraph",
            Kind::TextBlock => "TextBlock",
            Kind::List => "List",
            Kind::ListItem => "ListItem",
            Kind::CodeBlock => "CodeBlock",
            Kind::FencedCodeBlock => "FencedCodeBlock",
            Kind::HtmlBlock => "HTMLBlock",
            Kind::Blockquote => "Blockquote",
            Kind::ThematicBreak => "ThematicBreak",
            Kind::Text => "Text",
            Kind::Emphasis => "Emphasis",
            Kind::CodeSpan => "CodeSpan",
            Kind::Link => "Link",
            Kind::Image => "Image",
            Kind::AutoLink => "AutoLink",
            Kind::RawHtml => "RawHTML",
            Kind::Custom(custom) => custom.name,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
