//! Line oriented output with nested line prefixes.
//!
//! Block containers such as block quotes and list items decorate every line
//! of their content. [`LineWriter`] buffers output until a line is complete,
//! then writes it with the active prefixes in front and trailing whitespace
//! removed.

use std::io::{self, Write};

use crate::error::{WriteError, WriteResult};

const LINE_DELIM: u8 = b'\n';

/// Output lines a pushed prefix applies to, relative to the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixLines {
    /// The current line and every line after it.
    #[default]
    All,
    /// Lines starting `start` lines after the current one, unbounded.
    From(usize),
    /// Lines starting `start` lines after the current one and ending `end`
    /// lines after that start, inclusive.
    Between(usize, usize),
}

#[derive(Debug, Clone)]
struct LinePrefix {
    start: usize,
    end: Option<usize>,
    bytes: Vec<u8>,
}

impl LinePrefix {
    fn applies_to(&self, line: usize) -> bool {
        self.start <= line && self.end.is_none_or(|end| line <= end)
    }
}

/// Streams Markdown lines to an [`io::Write`] sink.
///
/// Once the sink fails, the writer keeps the error and every later write is
/// a no-op returning zero until [`LineWriter::reset`] is called.
#[derive(Debug)]
pub struct LineWriter<W: Write> {
    out: W,
    buf: Vec<u8>,
    prefixes: Vec<LinePrefix>,
    line: usize,
    error: Option<io::Error>,
    failed: bool,
}

impl<W: Write> LineWriter<W> {
    /// Create a writer over `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::new(),
            prefixes: Vec::new(),
            line: 0,
            error: None,
            failed: false,
        }
    }

    /// Drop all buffered content, prefixes and errors, and write to `out`
    /// from now on. Returns the previous sink.
    pub fn reset(&mut self, out: W) -> W {
        self.buf.clear();
        self.prefixes.clear();
        self.line = 0;
        self.error = None;
        self.failed = false;
        std::mem::replace(&mut self.out, out)
    }

    /// Buffer `data` and emit every line it completes. Returns the number of
    /// bytes accepted, zero once the sink has failed.
    pub fn write(&mut self, data: &[u8]) -> usize {
        if self.failed {
            return 0;
        }
        self.buf.extend_from_slice(data);
        let mut line = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == LINE_DELIM) {
            line.clear();
            for prefix in &self.prefixes {
                if prefix.applies_to(self.line) {
                    line.extend_from_slice(&prefix.bytes);
                }
            }
            line.extend_from_slice(&self.buf[..pos]);
            self.buf.drain(..=pos);
            line.truncate(trimmed_len(&line));
            line.push(LINE_DELIM);

            if let Err(err) = self.out.write_all(&line) {
                self.error = Some(err);
                self.failed = true;
                return 0;
            }
            self.line += 1;
        }
        data.len()
    }

    /// [`LineWriter::write`] for text.
    pub fn write_str(&mut self, data: &str) -> usize {
        self.write(data.as_bytes())
    }

    /// Write `data` and end the line unless it already ended.
    pub fn write_line(&mut self, data: &[u8]) -> usize {
        let n = self.write(data);
        self.flush_line();
        n
    }

    /// End the current line if anything is buffered.
    pub fn flush_line(&mut self) {
        if !self.buf.is_empty() {
            self.end_line();
        }
    }

    /// End the current line, emitting an empty line if nothing is buffered.
    pub fn end_line(&mut self) {
        self.write(&[LINE_DELIM]);
    }

    /// Prefix the given range of lines with `bytes`.
    pub fn push_prefix(&mut self, bytes: impl Into<Vec<u8>>, lines: PrefixLines) {
        let (start, end) = match lines {
            PrefixLines::All => (self.line, None),
            PrefixLines::From(start) => (self.line + start, None),
            PrefixLines::Between(start, end) => {
                let start = self.line + start;
                (start, Some(start + end))
            }
        };
        self.prefixes.push(LinePrefix {
            start,
            end,
            bytes: bytes.into(),
        });
    }

    /// Remove the most recently pushed prefix.
    ///
    /// # Panics
    ///
    /// Panics if no prefix is active; pushes and pops must be balanced.
    pub fn pop_prefix(&mut self) {
        if self.prefixes.pop().is_none() {
            panic!("pop_prefix called without a matching push_prefix");
        }
    }

    /// The error reported by the sink, if any.
    pub fn err(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Whether the sink has failed.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Turn a sink failure into an error, handing out the stored
    /// [`io::Error`] on the first call. The writer stays failed.
    pub fn check(&mut self) -> WriteResult<()> {
        if !self.failed {
            return Ok(());
        }
        let err = self
            .error
            .take()
            .unwrap_or_else(|| io::Error::other("output sink failed earlier"));
        Err(WriteError::Io(err))
    }

    /// Number of lines written so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Number of bytes waiting for the end of the current line.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// The underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the writer, returning the sink. Buffered content is dropped.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Length of `line` without its trailing whitespace.
fn trimmed_len(line: &[u8]) -> usize {
    match std::str::from_utf8(line) {
        Ok(text) => text.trim_end().len(),
        Err(_) => line.trim_ascii_end().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(writer: &LineWriter<Vec<u8>>) -> &str {
        std::str::from_utf8(writer.get_ref()).unwrap()
    }

    #[test]
    fn flush_line_only_ends_partial_lines() {
        let mut writer = LineWriter::new(Vec::new());
        writer.flush_line();
        assert_eq!(output(&writer), "");
        writer.write(b"foobar");
        writer.flush_line();
        assert_eq!(output(&writer), "foobar\n");
    }

    #[test]
    fn end_line_always_ends() {
        let mut writer = LineWriter::new(Vec::new());
        writer.end_line();
        assert_eq!(output(&writer), "\n");
        writer.write(b"A line");
        assert_eq!(output(&writer), "\n");
        assert_eq!(writer.buffered(), 6);
        writer.flush_line();
        assert_eq!(output(&writer), "\nA line\n");
        assert_eq!(writer.line(), 2);
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        let mut writer = LineWriter::new(Vec::new());
        writer.write_line(b"Line with trailing whitespace.\t \t ");
        writer.write_line("wide\u{3000}".as_bytes());
        assert_eq!(output(&writer), "Line with trailing whitespace.\nwide\n");
    }

    #[test]
    fn prefix_current_line() {
        let mut writer = LineWriter::new(Vec::new());
        writer.push_prefix("> ", PrefixLines::All);
        for line in ["You will speak", "an infinite deal", "of nothing"] {
            writer.write_line(line.as_bytes());
        }
        writer.pop_prefix();
        writer.write_line(b"\\- William Shakespeare");
        assert_eq!(
            output(&writer),
            "> You will speak\n> an infinite deal\n> of nothing\n\\- William Shakespeare\n"
        );
    }

    #[test]
    fn prefix_subsequent_lines() {
        let mut writer = LineWriter::new(Vec::new());
        writer.push_prefix("  ", PrefixLines::From(1));
        writer.write(b"- ");
        for line in ["Consider me", "As one who loved poetry", "And persimmons."] {
            writer.write_line(line.as_bytes());
        }
        writer.pop_prefix();
        writer.write_line(b"\\- Masaoaka Shiki");
        assert_eq!(
            output(&writer),
            "- Consider me\n  As one who loved poetry\n  And persimmons.\n\\- Masaoaka Shiki\n"
        );
    }

    #[test]
    fn nested_prefixes() {
        let quotes = [
            ["You will speak", "an infinite deal", "of nothing"],
            ["Consider me", "As one who loved poetry", "And persimmons."],
        ];
        let authors = ["\\- William Shakespeare", "\\- Masaoaka Shiki"];

        let mut writer = LineWriter::new(Vec::new());
        for (quote, author) in quotes.iter().zip(authors) {
            writer.push_prefix("- ", PrefixLines::Between(0, 0));
            writer.push_prefix("  ", PrefixLines::From(1));
            writer.push_prefix("> ", PrefixLines::All);
            for line in quote {
                writer.write_line(line.as_bytes());
            }
            writer.pop_prefix();
            writer.write_line(author.as_bytes());
            writer.pop_prefix();
            writer.pop_prefix();
        }
        assert_eq!(
            output(&writer),
            "\
- > You will speak
  > an infinite deal
  > of nothing
  \\- William Shakespeare
- > Consider me
  > As one who loved poetry
  > And persimmons.
  \\- Masaoaka Shiki
"
        );
    }

    #[test]
    fn into_inner_drops_partial_line() {
        let mut writer = LineWriter::new(Vec::new());
        writer.write(b"done\npartial");
        assert_eq!(writer.into_inner(), b"done\n");
    }

    #[test]
    fn blank_prefixed_lines_keep_visible_prefix() {
        let mut writer = LineWriter::new(Vec::new());
        writer.push_prefix("> ", PrefixLines::All);
        writer.write(b"a\n\nb\n");
        assert_eq!(output(&writer), "> a\n>\n> b\n");
    }

    #[test]
    #[should_panic(expected = "pop_prefix")]
    fn unbalanced_pop_panics() {
        let mut writer = LineWriter::new(Vec::new());
        writer.pop_prefix();
    }

    /// Sink that fails while `fail` is set.
    #[derive(Default)]
    struct Flaky {
        fail: bool,
        written: Vec<u8>,
    }

    impl Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail {
                return Err(io::Error::other("test error"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn errors_are_sticky_until_reset() {
        let data = b"foo\n";
        let mut writer = LineWriter::new(Flaky::default());
        assert_eq!(writer.write(data), data.len());
        assert_eq!(writer.write_line(data), data.len());

        let ok = writer.reset(Flaky {
            fail: true,
            ..Flaky::default()
        });
        assert_eq!(ok.written, b"foo\nfoo\n");

        assert_eq!(writer.write(data), 0);
        assert_eq!(writer.write_line(data), 0);
        assert_eq!(writer.err().map(|err| err.to_string()).as_deref(), Some("test error"));
        assert!(matches!(writer.check(), Err(WriteError::Io(_))));
        assert!(writer.is_failed());
        assert!(writer.check().is_err());

        writer.reset(Flaky::default());
        assert!(writer.err().is_none());
        assert!(writer.check().is_ok());
        assert_eq!(writer.write(data), data.len());
        assert_eq!(writer.write_line(data), data.len());
        assert_eq!(writer.line(), 2);
    }
}
