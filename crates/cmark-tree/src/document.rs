//! Arena storage for document nodes.

use std::fmt::Write;
use std::ops::Range;

use crate::node::{Kind, NodeKind, Value};

/// Handle of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    blank_previous_lines: bool,
    lines: Vec<Value>,
    range: Option<Range<usize>>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
            blank_previous_lines: false,
            lines: Vec::new(),
            range: None,
        }
    }
}

/// A Markdown document tree.
///
/// Nodes live in an arena owned by the document and are linked as a
/// first-child/next-sibling tree rooted at [`Document::root`]. Node content
/// refers to the source buffer by [`Segment`](crate::Segment), so the source
/// must be supplied again when the tree is rendered.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document has nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].first_child.is_none()
    }

    /// Allocate a detached node.
    pub fn new_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind));
        id
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    /// Kind and attributes of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    /// Mutable kind and attributes of a node.
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.data_mut(id).kind
    }

    /// Replace the kind of a node.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.data_mut(id).kind = kind;
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// First child of a node.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).first_child
    }

    /// Last child of a node.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).last_child
    }

    /// Following sibling of a node.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).next
    }

    /// Preceding sibling of a node.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).prev
    }

    /// Whether a node has at least one child.
    pub fn has_children(&self, id: NodeId) -> bool {
        self.data(id).first_child.is_some()
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Whether the source had a blank line before this node.
    pub fn has_blank_previous_lines(&self, id: NodeId) -> bool {
        self.data(id).blank_previous_lines
    }

    /// Mark a node as preceded by a blank line.
    pub fn set_blank_previous_lines(&mut self, id: NodeId, blank: bool) {
        self.data_mut(id).blank_previous_lines = blank;
    }

    /// Source lines of a block node.
    pub fn lines(&self, id: NodeId) -> &[Value] {
        &self.data(id).lines
    }

    /// Replace the source lines of a block node.
    pub fn set_lines(&mut self, id: NodeId, lines: Vec<Value>) {
        self.data_mut(id).lines = lines;
    }

    /// Byte range of the source this node was built from.
    pub fn source_range(&self, id: NodeId) -> Option<Range<usize>> {
        self.data(id).range.clone()
    }

    /// Record the byte range of the source this node was built from.
    pub fn set_source_range(&mut self, id: NodeId, range: Range<usize>) {
        self.data_mut(id).range = Some(range);
    }

    /// Unlink a node from its parent and siblings. Its children stay attached.
    pub fn detach(&mut self, id: NodeId) {
        let data = self.data(id);
        let (parent, prev, next) = (data.parent, data.prev, data.next);
        if let Some(prev) = prev {
            self.data_mut(prev).next = next;
        } else if let Some(parent) = parent {
            self.data_mut(parent).first_child = next;
        }
        if let Some(next) = next {
            self.data_mut(next).prev = prev;
        } else if let Some(parent) = parent {
            self.data_mut(parent).last_child = prev;
        }
        let data = self.data_mut(id);
        data.parent = None;
        data.prev = None;
        data.next = None;
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.data(parent).last_child;
        {
            let data = self.data_mut(child);
            data.parent = Some(parent);
            data.prev = last;
        }
        match last {
            Some(last) => self.data_mut(last).next = Some(child),
            None => self.data_mut(parent).first_child = Some(child),
        }
        self.data_mut(parent).last_child = Some(child);
    }

    /// Insert `child` right before `before`, which must be a child of
    /// `parent`. Detaches `child` first.
    pub fn insert_before(&mut self, parent: NodeId, before: NodeId, child: NodeId) {
        debug_assert_eq!(self.parent(before), Some(parent));
        self.detach(child);
        let prev = self.data(before).prev;
        {
            let data = self.data_mut(child);
            data.parent = Some(parent);
            data.prev = prev;
            data.next = Some(before);
        }
        self.data_mut(before).prev = Some(child);
        match prev {
            Some(prev) => self.data_mut(prev).next = Some(child),
            None => self.data_mut(parent).first_child = Some(child),
        }
    }

    /// Render the subtree at the root as an indented outline, for debugging.
    pub fn dump(&self, source: &[u8]) -> String {
        let mut out = String::new();
        self.dump_node(self.root(), source, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, source: &[u8], depth: usize, out: &mut String) {
        let kind = self.kind(id);
        let _ = write!(out, "{:indent$}{}", "", kind.kind(), indent = depth * 2);
        match kind {
            NodeKind::Heading { level } => {
                let _ = write!(out, " level={level}");
            }
            NodeKind::List {
                marker,
                ordered,
                start,
            } => {
                let _ = write!(out, " marker={:?}", *marker as char);
                if *ordered {
                    let _ = write!(out, " start={start}");
                }
            }
            NodeKind::FencedCodeBlock { info: Some(info) } => {
                let _ = write!(out, " info={:?}", lossy(info.bytes(source)));
            }
            NodeKind::Text {
                value,
                soft_line_break,
                hard_line_break,
            } => {
                let _ = write!(out, " {:?}", lossy(value.bytes(source)));
                if *soft_line_break {
                    out.push_str(" soft");
                }
                if *hard_line_break {
                    out.push_str(" hard");
                }
            }
            NodeKind::Emphasis { level } => {
                let _ = write!(out, " level={level}");
            }
            NodeKind::Link { destination, title } | NodeKind::Image { destination, title } => {
                let _ = write!(out, " destination={destination:?}");
                if !title.is_empty() {
                    let _ = write!(out, " title={title:?}");
                }
            }
            NodeKind::AutoLink { url } => {
                let _ = write!(out, " url={:?}", lossy(url.bytes(source)));
            }
            _ => {}
        }
        if self.has_blank_previous_lines(id) {
            out.push_str(" blank");
        }
        out.push('\n');
        for line in self.lines(id) {
            let _ = writeln!(
                out,
                "{:indent$}| {:?}",
                "",
                lossy(line.bytes(source)),
                indent = depth * 2 + 2
            );
        }
        for child in self.children(id) {
            self.dump_node(child, source, depth + 1, out);
        }
    }

    /// Kind identifiers of the children of a node, mostly for assertions.
    pub fn child_kinds(&self, id: NodeId) -> Vec<Kind> {
        self.children(id).map(|child| self.kind(child).kind()).collect()
    }
}

fn lossy(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}
