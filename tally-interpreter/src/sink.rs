//! Output destinations for `print` and `out`.

use std::io::{self, Write};

/// Receives program output exactly as produced, with no separators added
pub trait OutputSink {
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

/// Collects output in memory
impl OutputSink for String {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }
}

/// Adapter writing to any `io::Write`, e.g. stdout
#[derive(Debug)]
pub struct IoSink<W: Write> {
    writer: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for IoSink<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }
}
