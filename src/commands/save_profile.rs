use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;

use crate::{
    domain::{Profile, Session},
    ports::{orders::OrderStorePort, profiles::ProfilePort},
};

use super::{DomainLogic, Error};

pub struct SaveProfileRequest {
    pub actor: Session,
    pub profile: Profile,
}

/// Creates or updates the actor's own profile.
///
/// Profiles are keyed by identity id and carry role-dependent fields; a
/// session may only write a profile matching its own id and role.
impl<O, P> Service<SaveProfileRequest> for DomainLogic<O, P>
where
    O: OrderStorePort + 'static,
    P: ProfilePort + 'static,
{
    type Response = Profile;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: SaveProfileRequest) -> Self::Future {
        let profiles = self.profiles.clone();
        Box::pin(async move {
            if req.profile.id != req.actor.user_id {
                return Err(Error::Authorization(
                    "a profile may only be written by its owner".into(),
                ));
            }
            if req.profile.role() != req.actor.role {
                return Err(Error::Authorization(
                    "profile details must match the session role".into(),
                ));
            }
            if req.profile.name.trim().is_empty() {
                return Err(Error::Validation("name is required".into()));
            }

            let profile = profiles.upsert_profile(req.profile).await?;

            Ok(profile)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::database::memory::MemoryStore,
        domain::{ProfileDetails, Role},
    };
    use rstest::*;
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::BoxError;
    use uuid::Uuid;

    #[fixture]
    fn rider() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            role: Role::Rider,
            display_name: "R".to_string(),
            avatar_url: None,
        }
    }

    fn rider_profile(id: Uuid) -> Profile {
        Profile {
            id,
            name: "Wanjiku".to_string(),
            phone: "+254700000000".to_string(),
            details: ProfileDetails::Rider {
                vehicle_type: "motorbike".to_string(),
                vehicle_model: "Boxer 150".to_string(),
                plate_number: "KMFA 123X".to_string(),
            },
        }
    }

    fn domain() -> (DomainLogic<MemoryStore, MemoryStore>, MemoryStore) {
        let store = MemoryStore::default();
        (
            DomainLogic::new(Arc::new(store.clone()), Arc::new(store.clone())),
            store,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn test_save_own_profile(rider: Session) -> Result<(), BoxError> {
        // GIVEN a rider session
        let (mut domain, store) = domain();
        let profile = rider_profile(rider.user_id);

        // WHEN saving their profile
        let res = domain
            .call(SaveProfileRequest {
                actor: rider.clone(),
                profile: profile.clone(),
            })
            .await;

        // THEN it is stored under their identity id
        assert_that!(res).is_ok().is_equal_to(profile.clone());
        assert_that!(store.get_profile(rider.user_id).await)
            .is_ok()
            .is_equal_to(profile);

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_is_owner_only(rider: Session) -> Result<(), BoxError> {
        let (mut domain, _) = domain();

        let res = domain
            .call(SaveProfileRequest {
                actor: rider,
                profile: rider_profile(Uuid::new_v4()),
            })
            .await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::Authorization(_)));

        Ok(())
    }

    /// A customer session cannot write rider vehicle details.
    #[rstest]
    #[tokio::test]
    async fn test_details_must_match_role(rider: Session) -> Result<(), BoxError> {
        let (mut domain, _) = domain();
        let customer = Session {
            role: Role::Customer,
            ..rider
        };

        let res = domain
            .call(SaveProfileRequest {
                actor: customer.clone(),
                profile: rider_profile(customer.user_id),
            })
            .await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::Authorization(_)));

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_name_required(rider: Session) -> Result<(), BoxError> {
        let (mut domain, _) = domain();
        let profile = Profile {
            name: " ".to_string(),
            ..rider_profile(rider.user_id)
        };

        let res = domain
            .call(SaveProfileRequest {
                actor: rider,
                profile,
            })
            .await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::Validation(_)));

        Ok(())
    }
}
