//! Mutable state of a single render call.

use std::io::Write;

use crate::options::Config;
use crate::writer::LineWriter;

/// The list a list item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFrame {
    /// Bullet character or ordered delimiter.
    pub marker: u8,
    /// Whether items are numbered.
    pub ordered: bool,
    /// Number of the next item of an ordered list.
    pub ordinal: u64,
}

/// Formatting of the code span being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodeSpanState {
    /// Length of the backtick fence.
    pub backtick_length: usize,
    /// Whether the content is padded with a space inside each fence.
    pub pad_space: bool,
}

/// State threaded through every node renderer during one render.
///
/// A context is created by [`Renderer::render`](crate::Renderer::render) and
/// dropped when it returns, so renders never share state.
pub struct RenderContext<'a> {
    writer: LineWriter<&'a mut dyn Write>,
    source: &'a [u8],
    config: &'a Config,
    lists: Vec<ListFrame>,
    code_span: Option<CodeSpanState>,
}

impl<'a> RenderContext<'a> {
    /// Create a context writing to `out`.
    pub fn new(out: &'a mut dyn Write, source: &'a [u8], config: &'a Config) -> Self {
        Self {
            writer: LineWriter::new(out),
            source,
            config,
            lists: Vec::new(),
            code_span: None,
        }
    }

    /// The line writer.
    pub fn writer(&mut self) -> &mut LineWriter<&'a mut dyn Write> {
        &mut self.writer
    }

    /// The source the document refers to.
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// The active configuration.
    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Enter a list.
    pub fn push_list(&mut self, frame: ListFrame) {
        self.lists.push(frame);
    }

    /// Leave the innermost list.
    ///
    /// # Panics
    ///
    /// Panics if no list is open.
    pub fn pop_list(&mut self) -> ListFrame {
        match self.lists.pop() {
            Some(frame) => frame,
            None => panic!("pop_list called outside of a list"),
        }
    }

    /// The innermost open list.
    pub fn current_list(&mut self) -> Option<&mut ListFrame> {
        self.lists.last_mut()
    }

    /// Number of open lists.
    pub fn list_depth(&self) -> usize {
        self.lists.len()
    }

    /// State of the open code span.
    pub fn code_span(&self) -> Option<CodeSpanState> {
        self.code_span
    }

    /// Open or close a code span.
    pub fn set_code_span(&mut self, state: Option<CodeSpanState>) {
        self.code_span = state;
    }

    /// Write a source-backed or owned value.
    pub(crate) fn write_value(&mut self, value: &cmark_tree::Value) -> usize {
        let bytes = value.bytes(self.source);
        self.writer.write(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_nest() {
        let mut out = Vec::new();
        let config = Config::default();
        let mut ctx = RenderContext::new(&mut out, b"", &config);
        assert_eq!(ctx.list_depth(), 0);
        assert!(ctx.current_list().is_none());

        let bullets = ListFrame {
            marker: b'-',
            ordered: false,
            ordinal: 1,
        };
        ctx.push_list(bullets);
        ctx.push_list(ListFrame {
            marker: b'.',
            ordered: true,
            ordinal: 3,
        });
        assert_eq!(ctx.list_depth(), 2);
        if let Some(list) = ctx.current_list() {
            list.ordinal += 1;
        }
        assert_eq!(ctx.pop_list().ordinal, 4);
        assert_eq!(ctx.current_list().copied(), Some(bullets));
        assert_eq!(ctx.pop_list(), bullets);
        assert_eq!(ctx.list_depth(), 0);
    }
}
