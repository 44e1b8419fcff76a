use crate::{
    adapters::ErasedPoisonError,
    domain::{Identity, Role, Session},
    ports::auth::{AuthPort, Error},
    session::{SessionState, SessionStore},
};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, Mutex, PoisonError},
};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

/// In-memory stand-in for the hosted auth backend.
///
/// Holds accounts keyed by email and publishes sign-in/sign-out transitions to
/// the shared [`SessionStore`]. Passwords are compared in the clear; this
/// adapter exists for tests and local development only.
#[derive(Clone)]
pub struct MemoryAuth {
    session_store: Arc<SessionStore>,
    accounts: Arc<Mutex<HashMap<String, Account>>>,
}

#[derive(Clone)]
struct Account {
    identity: Identity,
    password: String,
}

impl MemoryAuth {
    pub fn new(session_store: Arc<SessionStore>) -> Self {
        Self {
            session_store,
            accounts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Resolves the initial session lookup.
    ///
    /// There is no persisted session in memory, so the store moves from
    /// `Resolving` to `SignedOut`.
    pub fn resolve_session(&self) {
        self.session_store.set(SessionState::SignedOut);
    }
}

#[async_trait::async_trait]
impl AuthPort for MemoryAuth {
    async fn sign_up(&self, email: &str, password: &str, role: Role) -> Result<Identity, Error> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::WeakPassword);
        }

        match self.accounts.lock()?.entry(email.to_string()) {
            Entry::Occupied(_) => Err(Error::EmailTaken(email.to_string())),
            Entry::Vacant(entry) => {
                let identity = Identity {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                    role,
                };
                entry.insert(Account {
                    identity: identity.clone(),
                    password: password.to_string(),
                });
                tracing::info!(%identity.id, role = %role, "identity registered");

                Ok(identity)
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
        let account = self
            .accounts
            .lock()?
            .get(email)
            .cloned()
            .ok_or(Error::InvalidCredentials)?;
        if account.password != password {
            return Err(Error::InvalidCredentials);
        }

        let display_name = email.split('@').next().unwrap_or(email).to_string();
        let session = Session {
            user_id: account.identity.id,
            role: account.identity.role,
            display_name,
            avatar_url: None,
        };
        self.session_store
            .set(SessionState::SignedIn(session.clone()));

        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), Error> {
        self.session_store.set(SessionState::SignedOut);

        Ok(())
    }
}

/// We need to create a custom `From` implementation here for an error that's specific to this
/// adapter.
impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speculoos::prelude::*;

    fn auth() -> (MemoryAuth, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::new());
        (MemoryAuth::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in_publishes_session() {
        let (auth, store) = auth();
        auth.resolve_session();

        let identity = auth
            .sign_up("wanjiku@example.com", "hunter22", Role::Rider)
            .await
            .unwrap();
        let res = auth.sign_in("wanjiku@example.com", "hunter22").await;

        assert_that!(res).is_ok().matches(|session| {
            session.user_id == identity.id
                && session.role == Role::Rider
                && session.display_name == "wanjiku"
        });
        assert_that!(store.current())
            .matches(|state| matches!(state, SessionState::SignedIn(_)));
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let (auth, store) = auth();
        auth.resolve_session();
        auth.sign_up("jo@example.com", "secret1", Role::Customer)
            .await
            .unwrap();

        let res = auth.sign_in("jo@example.com", "wrong").await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::InvalidCredentials));
        // A failed sign-in never changes the session.
        assert_that!(store.current()).is_equal_to(SessionState::SignedOut);
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let (auth, _) = auth();
        auth.sign_up("jo@example.com", "secret1", Role::Customer)
            .await
            .unwrap();

        let res = auth.sign_up("jo@example.com", "secret2", Role::Rider).await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::EmailTaken(_)));
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let (auth, _) = auth();

        let res = auth.sign_up("jo@example.com", "12345", Role::Customer).await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::WeakPassword));
    }

    #[tokio::test]
    async fn test_sign_out_publishes_signed_out() {
        let (auth, store) = auth();
        auth.sign_up("jo@example.com", "secret1", Role::Customer)
            .await
            .unwrap();
        auth.sign_in("jo@example.com", "secret1").await.unwrap();

        auth.sign_out().await.unwrap();

        assert_that!(store.current()).is_equal_to(SessionState::SignedOut);
    }
}
