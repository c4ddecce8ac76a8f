use std::io::{self, Write};

use repshare_types::Revision;

/// Destination for the scan's progress lines.
///
/// One line per revision and one per changed path considered, emitted
/// before the corresponding work happens. Write failures propagate and
/// abort the run like any other error.
pub trait ProgressSink {
    fn revision_started(&mut self, revision: Revision) -> io::Result<()>;
    fn path_visited(&mut self, revision: Revision, path: &str) -> io::Result<()>;
}

/// Discards all progress. Used for `--quiet`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn revision_started(&mut self, _revision: Revision) -> io::Result<()> {
        Ok(())
    }

    fn path_visited(&mut self, _revision: Revision, _path: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Writes progress lines to any writer, normally stderr.
#[derive(Debug)]
pub struct WriteProgress<W: Write> {
    writer: W,
}

impl<W: Write> WriteProgress<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl WriteProgress<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ProgressSink for WriteProgress<W> {
    fn revision_started(&mut self, revision: Revision) -> io::Result<()> {
        writeln!(self.writer, "processing r{revision}")
    }

    fn path_visited(&mut self, revision: Revision, path: &str) -> io::Result<()> {
        writeln!(self.writer, "processing r{revision}:{path}")
    }
}
