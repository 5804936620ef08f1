use std::collections::VecDeque;

/// Events carried by an [`EventBus`].
pub trait BusEvent {
    /// Error a handler may raise; `emit` stops at the first one.
    type Error;

    /// Short, static label recorded in the trace.
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

/// Trace record for one dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub sequence: u64,
    pub kind: &'static str,
    pub handlers: usize,
}

pub const DEFAULT_TRACE_CAPACITY: usize = 256;

type Handler<E> = Box<dyn FnMut(&E) -> Result<(), <E as BusEvent>::Error>>;

/// Single-threaded observer dispatch.
///
/// Handlers run synchronously, in subscription order, on the thread that
/// calls [`EventBus::emit`]. The bus keeps a bounded trace of the most recent
/// dispatches for diagnostics.
pub struct EventBus<E: BusEvent> {
    handlers: Vec<(HandlerId, Handler<E>)>,
    next_id: u64,
    sequence: u64,
    trace: VecDeque<TraceEntry>,
    trace_capacity: usize,
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::with_trace_capacity(DEFAULT_TRACE_CAPACITY)
    }
}

impl<E: BusEvent> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .field("sequence", &self.sequence)
            .field("trace", &self.trace)
            .finish()
    }
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_capacity(trace_capacity: usize) -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
            sequence: 0,
            trace: VecDeque::with_capacity(trace_capacity.min(DEFAULT_TRACE_CAPACITY)),
            trace_capacity,
        }
    }

    pub fn subscribe<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&E) -> Result<(), E::Error> + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns `true` if a handler was removed.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Delivers `event` to every handler.
    ///
    /// Stops at, and returns, the first handler error. The event is traced
    /// either way.
    pub fn emit(&mut self, event: E) -> Result<(), E::Error> {
        self.record(&event);
        for (_, handler) in &mut self.handlers {
            handler(&event)?;
        }
        Ok(())
    }

    pub fn trace(&self) -> impl Iterator<Item = &TraceEntry> + '_ {
        self.trace.iter()
    }

    pub fn drain_trace(&mut self) -> Vec<TraceEntry> {
        self.trace.drain(..).collect()
    }

    fn record(&mut self, event: &E) {
        let entry = TraceEntry {
            sequence: self.sequence,
            kind: event.kind(),
            handlers: self.handlers.len(),
        };
        self.sequence += 1;
        if self.trace_capacity == 0 {
            return;
        }
        if self.trace.len() == self.trace_capacity {
            self.trace.pop_front();
        }
        self.trace.push_back(entry);
    }
}
