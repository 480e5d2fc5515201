//! Pull-based event production.

/// Anything the driver can pull events from, one tick at a time.
///
/// `next` is called with the driver's current time and must never block;
/// `None` means "nothing to deliver right now", not end of stream. `drain`
/// ignores time and is called repeatedly at shutdown until it returns `None`.
pub trait EventSource {
    type Event;

    fn next(&mut self, now_ms: u64) -> Option<Self::Event>;

    fn drain(&mut self) -> Option<Self::Event>;

    /// Events currently held inside this source.
    fn pending(&self) -> usize {
        0
    }
}
