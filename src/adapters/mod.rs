pub mod auth;
pub mod database;

/// Erased [`PoisonError`](std::sync::PoisonError)
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(pub(crate) String);
