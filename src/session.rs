use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::Session;

/// Value held by the [`SessionStore`] cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The initial session lookup has not resolved yet.
    Resolving,
    SignedOut,
    SignedIn(Session),
    /// Session resolution failed (e.g. backend unreachable).
    ///
    /// Distinct from `SignedOut`: callers must surface a retry affordance,
    /// never a login redirect.
    Unavailable(String),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

/// Handle returned by [`SessionStore::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&SessionState) + Send + Sync>;

/// Process-wide reactive session cell.
///
/// One owned [`SessionState`] plus a list of subscriber callbacks invoked
/// synchronously on every [`set`](Self::set). Written only by the
/// sign-in/sign-out flow; everything else reads or subscribes.
///
/// Callbacks run outside the internal lock, so a subscriber may read
/// [`current`](Self::current) or re-subscribe without deadlocking.
pub struct SessionStore {
    inner: Mutex<Inner>,
}

struct Inner {
    state: SessionState,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl SessionStore {
    /// Starts in [`SessionState::Resolving`] until the first lookup lands.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: SessionState::Resolving,
                next_id: 0,
                subscribers: Vec::new(),
            }),
        }
    }

    pub fn current(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Replaces the state and notifies every subscriber synchronously.
    pub fn set(&self, state: SessionState) {
        let subscribers = {
            let mut inner = self.lock();
            tracing::debug!(state = ?state, "session state changed");
            inner.state = state.clone();
            inner.subscribers.iter().map(|(_, f)| f.clone()).collect::<Vec<_>>()
        };
        for subscriber in subscribers {
            subscriber(&state);
        }
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&SessionState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned cell is still consistent: state writes are single
        // assignments, so recover the guard instead of propagating.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
