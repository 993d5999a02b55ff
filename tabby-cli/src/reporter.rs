//! Console output for iteration reports

use std::io::Write;
use tabby_engine::{IterationReport, Reporter, RunSummary, TabbyError, TabbyResult};
use tracing::warn;

/// Writes reports to `out` and failure notices to `err`
pub struct ConsoleReporter<O: Write + Send, E: Write + Send> {
    out: O,
    err: E,
}

impl ConsoleReporter<std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write + Send, E: Write + Send> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Print a plain line to the report stream
    pub fn print_line(&mut self, line: &str) -> TabbyResult<()> {
        writeln!(self.out, "{}", line).map_err(TabbyError::output)
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn emit(result: std::io::Result<()>) {
        if let Err(e) = result {
            warn!("Failed to write report: {}", e);
        }
    }
}

impl<O: Write + Send, E: Write + Send> Reporter for ConsoleReporter<O, E> {
    fn report(&mut self, report: &IterationReport) {
        Self::emit(writeln!(self.out, "{}", report).and_then(|_| self.out.flush()));
    }

    fn report_failure(&mut self, index: u64, error: &TabbyError) {
        Self::emit(writeln!(self.err, "Error on request #{}: {}", index, error));
    }

    fn summary(&mut self, summary: &RunSummary) {
        Self::emit(writeln!(self.out, "\n Completed {} requests", summary.requests_sent));
    }
}
