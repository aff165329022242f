//! Destinations: sinks that receive rendered messages.
//!
//! A destination implements one primitive, [`Destination::on_print`], and
//! inherits formatting and filtering from the provided methods:
//!
//! ```text
//! print(&[Value]) ──compose──> print_rendered(&str) ──tester──> on_print(&str)
//! ```
//!
//! Variants shipped here: [`ConsoleSink`], [`FileSink`], [`CallbackSink`], the
//! live renderer ([`crate::LiveRenderer`]) and the fan-out coordinator
//! [`ComposeWriter`], which is itself a destination.

mod callback;
mod compose;
mod console;
mod file;

pub use callback::CallbackSink;
pub use compose::{ComposeWriter, compose_writers};
pub use console::ConsoleSink;
pub use file::FileSink;

use crate::{
    error::Result,
    filter::Tester,
    format::{Value, compose},
};
use std::fmt;
use uuid::Uuid;

/// identity of one destination instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DestinationId(Uuid);

impl DestinationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DestinationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait Destination {
    /// write one admitted, fully rendered message
    fn on_print(&mut self, message: &str) -> Result<()>;

    /// admission predicate applied by [`Destination::print_rendered`]
    fn tester(&self) -> &Tester;

    fn id(&self) -> DestinationId;

    /// filter an already rendered message, then write it
    fn print_rendered(&mut self, message: &str) -> Result<()> {
        if self.tester().test(message) {
            self.on_print(message)
        } else {
            Ok(())
        }
    }

    fn print(&mut self, values: &[Value]) -> Result<()> {
        self.print_rendered(&compose(values))
    }
}

impl<D: Destination + ?Sized> Destination for Box<D> {
    fn on_print(&mut self, message: &str) -> Result<()> {
        (**self).on_print(message)
    }

    fn tester(&self) -> &Tester {
        (**self).tester()
    }

    fn id(&self) -> DestinationId {
        (**self).id()
    }

    fn print_rendered(&mut self, message: &str) -> Result<()> {
        (**self).print_rendered(message)
    }
}

/// print to stdout through a throwaway console sink
pub fn print(values: &[Value]) -> Result<()> {
    ConsoleSink::new().print(values)
}
