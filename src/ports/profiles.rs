use uuid::Uuid;

use crate::domain::Profile;

#[mockall::automock]
#[async_trait::async_trait]
pub trait ProfilePort {
    async fn get_profile(&self, profile_id: Uuid) -> Result<Profile, Error>;

    /// Creates or replaces the profile keyed by its identity id.
    async fn upsert_profile(&self, profile: Profile) -> Result<Profile, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Domain-level error when a profile does not exist
    #[error("profile {0} does not exist")]
    ProfileNotFound(Uuid),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
