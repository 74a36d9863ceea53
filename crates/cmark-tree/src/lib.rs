//! A CommonMark document tree whose content points back into the source.
//!
//! The tree is what `cmark-fmt` renders: block and inline nodes in an arena,
//! linked as parent/child/sibling, walked depth-first with enter and exit
//! callbacks. [`parse`] builds one from source text; transforms may edit it
//! through the mutation helpers on [`Document`] before it is rendered.

pub mod document;
pub mod node;
pub mod parse;
pub mod walk;

pub use crate::document::{Children, Document, NodeId};
pub use crate::node::{CustomKind, Kind, NodeKind, STRIKETHROUGH, Segment, Value};
pub use crate::parse::{ParseOptions, parse, parse_with};
pub use crate::walk::{WalkStatus, walk};
