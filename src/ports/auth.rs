use crate::domain::{Identity, Role, Session};

#[mockall::automock]
#[async_trait::async_trait]
pub trait AuthPort {
    /// Registers a new identity with a role claim.
    ///
    /// Returns the identity only; the role-dependent profile is written
    /// separately through the profile port.
    async fn sign_up(&self, email: &str, password: &str, role: Role) -> Result<Identity, Error>;

    /// Authenticates and publishes the resulting session to the session store.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error>;

    async fn sign_out(&self) -> Result<(), Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account already exists for {0}")]
    EmailTaken(String),

    /// The hosted backend rejects passwords shorter than 6 characters.
    #[error("password must be at least 6 characters")]
    WeakPassword,

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
