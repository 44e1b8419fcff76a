use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Busy flag for user-initiated submits.
///
/// A view holds one gate per form; while a submit is in flight,
/// [`try_begin`](Self::try_begin) returns `None` and the duplicate submit is
/// ignored. The permit releases the gate when dropped, including on the error
/// path.
#[derive(Debug, Default)]
pub struct SubmitGate {
    busy: AtomicBool,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Option<SubmitPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitPermit { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct SubmitPermit<'a> {
    gate: &'a SubmitGate,
}

impl Drop for SubmitPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

/// Monotonic tokens for discarding stale asynchronous results.
///
/// A view issues a token per fetch; when a newer fetch starts, earlier tokens
/// stop being current and their results must be dropped instead of applied to
/// superseded state.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding all earlier tokens.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }
}
