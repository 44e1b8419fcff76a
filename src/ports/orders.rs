use uuid::Uuid;

use crate::domain::{NewOrder, Order, OrderStatus};

#[mockall::automock]
#[async_trait::async_trait]
pub trait OrderStorePort {
    async fn get_order(&self, order_id: Uuid) -> Result<Order, Error>;

    async fn list_orders(
        &self,
        filter: OrderFilter,
        sort: SortBy,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, Error>;

    /// Inserts a new order; the store assigns id, creation time, and the
    /// initial `Pending`/unclaimed state.
    async fn insert_order(&self, new_order: NewOrder) -> Result<Order, Error>;

    /// Applies a patch, optionally guarded by a condition the store checks
    /// atomically with the write.
    ///
    /// A condition that no longer holds at write time fails the whole update
    /// with [`Error::ConditionFailed`]; this is what makes a claim
    /// at-most-one-winner under concurrent riders.
    async fn update_order(
        &self,
        order_id: Uuid,
        patch: OrderPatch,
        condition: Option<UpdateCondition>,
    ) -> Result<Order, Error>;
}

/// Row filter for [`OrderStorePort::list_orders`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub customer_id: Option<Uuid>,
    pub rider_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub status_in: Option<Vec<OrderStatus>>,
    /// Widens the filter to also include unclaimed pending orders, giving a
    /// rider "my orders plus the open board" in one query.
    pub or_unclaimed_pending: bool,
}

impl OrderFilter {
    pub fn for_customer(customer_id: Uuid) -> Self {
        Self {
            customer_id: Some(customer_id),
            ..Self::default()
        }
    }

    /// All unclaimed orders a rider may pick from.
    pub fn open_board() -> Self {
        Self {
            status: Some(OrderStatus::Pending),
            ..Self::default()
        }
    }

    /// Orders assigned to the rider, plus the unclaimed pending ones.
    pub fn rider_board(rider_id: Uuid) -> Self {
        Self {
            rider_id: Some(rider_id),
            or_unclaimed_pending: true,
            ..Self::default()
        }
    }

    pub fn completed_by_rider(rider_id: Uuid) -> Self {
        Self {
            rider_id: Some(rider_id),
            status: Some(OrderStatus::Completed),
            ..Self::default()
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        let base = self.customer_id.map_or(true, |id| order.customer_id == id)
            && self.rider_id.map_or(true, |id| order.rider_id == Some(id))
            && self.status.map_or(true, |status| order.status == status)
            && self
                .status_in
                .as_ref()
                .map_or(true, |statuses| statuses.contains(&order.status));
        base || (self.or_unclaimed_pending
            && order.rider_id.is_none()
            && order.status == OrderStatus::Pending)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortBy {
    CreatedAtAsc,
    CreatedAtDesc,
}

/// Mutable subset of an order row.
///
/// Immutable fields (amount, customer, creation time) have no patch slot by
/// construction. A rider is only ever assigned, never cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub rider_id: Option<Uuid>,
}

/// Precondition checked atomically with an update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateCondition {
    pub expected_status: Option<OrderStatus>,
    pub expected_rider: Option<Uuid>,
    pub require_unclaimed: bool,
}

impl UpdateCondition {
    /// The claim guard: still pending and not yet taken.
    pub fn unclaimed_pending() -> Self {
        Self {
            expected_status: Some(OrderStatus::Pending),
            require_unclaimed: true,
            ..Self::default()
        }
    }

    /// Still in the given status and assigned to the given rider.
    pub fn assigned(status: OrderStatus, rider_id: Uuid) -> Self {
        Self {
            expected_status: Some(status),
            expected_rider: Some(rider_id),
            require_unclaimed: false,
        }
    }

    /// Still in the given status.
    pub fn status_is(status: OrderStatus) -> Self {
        Self {
            expected_status: Some(status),
            ..Self::default()
        }
    }

    pub fn holds(&self, order: &Order) -> bool {
        self.expected_status.map_or(true, |status| order.status == status)
            && self
                .expected_rider
                .map_or(true, |rider| order.rider_id == Some(rider))
            && (!self.require_unclaimed || order.rider_id.is_none())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Domain-level error when an order does not exist
    #[error("order {0} does not exist")]
    OrderNotFound(Uuid),

    /// The update's precondition no longer held at write time
    ///
    /// Carries the row state actually observed, so the caller can tell a lost
    /// claim race from a finished order.
    #[error("condition failed for order {order_id}: status is {actual_status}")]
    ConditionFailed {
        order_id: Uuid,
        actual_status: OrderStatus,
        actual_rider: Option<Uuid>,
    },

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
