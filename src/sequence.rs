use std::sync::atomic::{AtomicU32, Ordering};

/// The session's single source of `Sequence_Id` values.
///
/// The CMPP frame header carries a 32-bit sequence id that the session loop assigns to every
/// request it writes, and uses to correlate the matching response. Only the session loop ever
/// calls [`SequenceCounter::next`]; the fragmenter additionally reads the counter's current
/// value with [`SequenceCounter::current`] to derive the concatenation reference byte, without
/// consuming a sequence id in the process.
#[derive(Debug, Default)]
pub struct SequenceCounter(AtomicU32);

impl SequenceCounter {
    pub fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Returns the value that the next call to [`SequenceCounter::next`] will hand out, without
    /// advancing the counter.
    pub fn current(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    /// Advances the counter and returns the value it held beforehand, wrapping at `u32::MAX`.
    pub fn next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}
