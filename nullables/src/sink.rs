//! Nullable event observer — records every emitted event in order.

use ballot_governance::BallotEvent;
use std::sync::{Arc, Mutex};

/// Collects events for later assertions.
///
/// Clones share the same buffer, so keep one handle and subscribe another.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<BallotEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener suitable for `Election::subscribe` that appends to this sink.
    pub fn listener(&self) -> Box<dyn Fn(&BallotEvent) + Send + Sync> {
        let events = Arc::clone(&self.events);
        Box::new(move |event| events.lock().unwrap().push(event.clone()))
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<BallotEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<BallotEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
