use tracing::debug;

/// One-shot latch over a fixed set of named startup signals.
///
/// Wiring that depends on several asynchronous preconditions (dataset
/// loaded, base map ready) runs when [`ReadinessGate::signal`] returns
/// `true`, which happens exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessGate {
    pending: Vec<&'static str>,
    open: bool,
}

impl ReadinessGate {
    pub fn new(signals: &[&'static str]) -> Self {
        let mut pending = signals.to_vec();
        pending.sort_unstable();
        pending.dedup();
        Self {
            open: pending.is_empty(),
            pending,
        }
    }

    /// Marks `name` as satisfied.
    ///
    /// Returns `true` only on the call that satisfies the last pending signal.
    /// Unknown and repeated signals are ignored.
    pub fn signal(&mut self, name: &str) -> bool {
        if self.open {
            return false;
        }
        let Some(pos) = self.pending.iter().position(|p| *p == name) else {
            debug!(signal = name, "ignoring unknown or repeated readiness signal");
            return false;
        };
        self.pending.remove(pos);
        if self.pending.is_empty() {
            self.open = true;
            debug!(signal = name, "readiness gate open");
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn pending(&self) -> &[&'static str] {
        &self.pending
    }
}
