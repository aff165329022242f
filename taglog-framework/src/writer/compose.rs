use super::{Destination, DestinationId};
use crate::{
    error::{Error, Result},
    filter::Tester,
    format::{Value, compose},
};
use std::ops::{Deref, DerefMut};

/// fan-out coordinator: one primary destination plus secondaries
///
/// Only printing is broadcast. Everything else the primary exposes (spinner
/// control on a [`crate::LiveRenderer`], `close` on a [`crate::FileSink`], ...)
/// is reached through `Deref` and touches the primary alone.
pub struct ComposeWriter<P: Destination> {
    id: DestinationId,
    primary: P,
    secondaries: Vec<Box<dyn Destination>>,
    tester: Tester,
}

/// build a coordinator over `primary` and `secondaries`, in that order
pub fn compose_writers<P: Destination>(
    primary: P,
    secondaries: Vec<Box<dyn Destination>>,
) -> ComposeWriter<P> {
    ComposeWriter {
        id: DestinationId::new(),
        primary,
        secondaries,
        tester: Tester::pass_all(),
    }
}

impl<P: Destination> ComposeWriter<P> {
    pub fn new(primary: P) -> Self {
        compose_writers(primary, Vec::new())
    }

    /// append a secondary destination
    pub fn with(mut self, destination: impl Destination + 'static) -> Self {
        self.secondaries.push(Box::new(destination));
        self
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut P {
        &mut self.primary
    }

    pub fn secondaries_len(&self) -> usize {
        self.secondaries.len()
    }

    /// format once, then deliver to every destination
    pub fn print(&mut self, values: &[Value]) -> Result<()> {
        self.dispatch(&compose(values))
    }

    fn dispatch(&mut self, message: &str) -> Result<()> {
        let mut failures = Vec::new();

        // each destination is isolated: one failure never skips the rest
        let primary_id = self.primary.id();
        if let Err(e) = self.primary.print_rendered(message) {
            log::warn!("Destination {} failed: {}", primary_id, e);
            failures.push(e);
        }
        for destination in &mut self.secondaries {
            if let Err(e) = destination.print_rendered(message) {
                log::warn!("Destination {} failed: {}", destination.id(), e);
                failures.push(e);
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(Error::Delivery(failures)),
        }
    }
}

impl<P: Destination> Destination for ComposeWriter<P> {
    fn on_print(&mut self, message: &str) -> Result<()> {
        self.dispatch(message)
    }

    fn tester(&self) -> &Tester {
        &self.tester
    }

    fn id(&self) -> DestinationId {
        self.id
    }
}

impl<P: Destination> Deref for ComposeWriter<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.primary
    }
}

impl<P: Destination> DerefMut for ComposeWriter<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.primary
    }
}
