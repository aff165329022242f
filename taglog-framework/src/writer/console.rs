use super::{Destination, DestinationId};
use crate::{
    error::Result,
    filter::{FilterSpec, Tester},
};
use std::io::{self, Stdout, Write};

/// writes each admitted message as one newline-terminated line
pub struct ConsoleSink<W: Write = Stdout> {
    id: DestinationId,
    writer: W,
    tester: Tester,
}

impl ConsoleSink<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout(), None)
    }

    pub fn filtered(filter: FilterSpec) -> Self {
        Self::with_writer(io::stdout(), Some(filter))
    }
}

impl Default for ConsoleSink<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(writer: W, filter: Option<FilterSpec>) -> Self {
        Self {
            id: DestinationId::new(),
            writer,
            tester: Tester::compile(filter.as_ref()),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Destination for ConsoleSink<W> {
    fn on_print(&mut self, message: &str) -> Result<()> {
        // single buffer so the line is never split by another writer
        let mut line = String::with_capacity(message.len() + 1);
        line.push_str(message);
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn tester(&self) -> &Tester {
        &self.tester
    }

    fn id(&self) -> DestinationId {
        self.id
    }
}
