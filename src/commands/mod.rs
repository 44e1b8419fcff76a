use std::{borrow::Cow, sync::Arc};

use uuid::Uuid;

use crate::ports::{orders, profiles};

pub mod cancel_order;
pub mod claim_order;
pub mod complete_order;
pub mod create_order;
pub mod rider_earnings;
pub mod save_profile;

/// Application services over the order and profile ports.
///
/// Each command is a [`tower::Service`] implementation on this struct; see the
/// submodules.
pub struct DomainLogic<O, P> {
    orders: Arc<O>,
    profiles: Arc<P>,
}

impl<O, P> DomainLogic<O, P> {
    pub fn new(orders: Arc<O>, profiles: Arc<P>) -> Self {
        Self { orders, profiles }
    }
}

impl<O, P> Clone for DomainLogic<O, P> {
    fn clone(&self) -> Self {
        Self {
            orders: self.orders.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required field is missing or malformed; resolved at the form boundary.
    #[error("validation failed: {0}")]
    Validation(Cow<'static, str>),

    /// The actor is not permitted to perform this transition.
    #[error("not permitted: {0}")]
    Authorization(Cow<'static, str>),

    /// A transition precondition no longer holds, e.g. the order was claimed
    /// by another rider first. Callers surface this as "order no longer
    /// available" and refresh their list.
    #[error("order no longer available: {0}")]
    Conflict(Cow<'static, str>),

    #[error("record {0} does not exist")]
    NotFound(Uuid),

    /// Order store failures that are not part of the domain model.
    #[error("order store error: {0:?}")]
    Orders(orders::Error),

    /// Profile store failures that are not part of the domain model.
    #[error("profile store error: {0:?}")]
    Profiles(profiles::Error),
}

impl From<orders::Error> for Error {
    fn from(err: orders::Error) -> Self {
        match err {
            orders::Error::OrderNotFound(id) => Self::NotFound(id),
            orders::Error::ConditionFailed { .. } => {
                Self::Conflict("transition precondition lost at write time".into())
            }
            other => Self::Orders(other),
        }
    }
}

impl From<profiles::Error> for Error {
    fn from(err: profiles::Error) -> Self {
        match err {
            profiles::Error::ProfileNotFound(id) => Self::NotFound(id),
            other => Self::Profiles(other),
        }
    }
}
