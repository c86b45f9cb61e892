/// A published notification together with the mutation batch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<E> {
    pub batch: u64,
    pub payload: E,
}

/// Ordered, single-threaded notification queue.
///
/// Writers `emit` into the current batch; a reaction pass calls `drain` once
/// and sees every notification published since its previous pass, in
/// emission order.
#[derive(Debug)]
pub struct EventBus<E> {
    batch: u64,
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            batch: 0,
            events: Vec::new(),
        }
    }

    /// Starts a new batch; returns its index.
    pub fn begin_batch(&mut self) -> u64 {
        self.batch += 1;
        self.batch
    }

    pub fn emit(&mut self, payload: E) {
        self.events.push(Event {
            batch: self.batch,
            payload,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}
