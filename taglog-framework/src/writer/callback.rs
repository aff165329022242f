use super::{Destination, DestinationId};
use crate::{
    error::Result,
    filter::{FilterSpec, Tester},
};

type Callback = Box<dyn FnMut(&str) -> anyhow::Result<()>>;

/// custom destination backed by a closure
///
/// ```
/// use taglog_framework::{CallbackSink, Destination, values};
/// use std::{cell::RefCell, rc::Rc};
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink_seen = seen.clone();
/// let mut sink = CallbackSink::new(move |message| {
///     sink_seen.borrow_mut().push(message.to_string());
///     Ok(())
/// });
///
/// sink.print(&values!["hello", 1]).unwrap();
/// assert_eq!(*seen.borrow(), vec!["hello 1".to_string()]);
/// ```
pub struct CallbackSink {
    id: DestinationId,
    callback: Callback,
    tester: Tester,
}

impl CallbackSink {
    pub fn new(callback: impl FnMut(&str) -> anyhow::Result<()> + 'static) -> Self {
        Self::with_filter(callback, None)
    }

    pub fn with_filter(
        callback: impl FnMut(&str) -> anyhow::Result<()> + 'static,
        filter: Option<FilterSpec>,
    ) -> Self {
        Self {
            id: DestinationId::new(),
            callback: Box::new(callback),
            tester: Tester::compile(filter.as_ref()),
        }
    }
}

impl Destination for CallbackSink {
    fn on_print(&mut self, message: &str) -> Result<()> {
        (self.callback)(message)?;
        Ok(())
    }

    fn tester(&self) -> &Tester {
        &self.tester
    }

    fn id(&self) -> DestinationId {
        self.id
    }
}
