//! Depth-first traversal with enter and exit callbacks.

use crate::document::{Document, NodeId};

/// What the walker does after a callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkStatus {
    /// Keep walking.
    #[default]
    Continue,
    /// Do not descend into the children of the node just entered. Its exit
    /// callback still runs.
    SkipChildren,
    /// Abort the walk.
    Stop,
}

/// Walk the subtree at `node` depth-first.
///
/// `visit(node, entering)` is called with `entering == true` before the
/// children of `node` and with `entering == false` after them. Returning
/// [`WalkStatus::Stop`] or an error ends the walk immediately; the error is
/// returned to the caller.
pub fn walk<E, F>(doc: &Document, node: NodeId, visit: &mut F) -> Result<WalkStatus, E>
where
    F: FnMut(NodeId, bool) -> Result<WalkStatus, E>,
{
    let status = visit(node, true)?;
    if status == WalkStatus::Stop {
        return Ok(WalkStatus::Stop);
    }
    if status != WalkStatus::SkipChildren {
        for child in doc.children(node) {
            if walk(doc, child, visit)? == WalkStatus::Stop {
                return Ok(WalkStatus::Stop);
            }
        }
    }
    if visit(node, false)? == WalkStatus::Stop {
        return Ok(WalkStatus::Stop);
    }
    Ok(WalkStatus::Continue)
}
