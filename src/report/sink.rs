//! Destinations for rendered report lines.

use std::io::{self, Write};

/// Anything that accepts a line of text
pub trait TextSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl TextSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes each line to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl TextSink for StdoutSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)
    }
}
