/// A single-slot timer driven by `now_ms` ticks.
///
/// Scheduling replaces any pending deadline (and payload). Adapters call [`Debounce::poll`] from
/// their frame/timer tick; the payload is returned once when the deadline passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debounce<T = ()> {
    delay_ms: u64,
    pending: Option<(u64, T)>,
}

impl<T> Debounce<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    /// (Re)arms the timer to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: u64, payload: T) {
        self.pending = Some((now_ms.saturating_add(self.delay_ms), payload));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Returns the payload if the deadline has been reached, disarming the timer.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now_ms >= *deadline => {
                self.pending.take().map(|(_, payload)| payload)
            }
            _ => None,
        }
    }
}
