use crate::{
    adapters::ErasedPoisonError,
    domain::{NewOrder, Order, OrderStatus, Profile},
    ports::{
        orders::{self, OrderFilter, OrderPatch, OrderStorePort, SortBy, UpdateCondition},
        profiles::{self, ProfilePort},
    },
};
use chrono::Utc;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use uuid::Uuid;

/// In-memory order and profile store for tests and local development.
///
/// `update_order` evaluates its condition and applies the patch under a single
/// lock acquisition, so the conditional-update semantics match the backing
/// store's atomic write.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    orders: Arc<Mutex<HashMap<Uuid, Order>>>,
    profiles: Arc<Mutex<HashMap<Uuid, Profile>>>,
}

#[async_trait::async_trait]
impl OrderStorePort for MemoryStore {
    async fn get_order(&self, order_id: Uuid) -> Result<Order, orders::Error> {
        self.orders
            .lock()?
            .get(&order_id)
            .cloned()
            .ok_or(orders::Error::OrderNotFound(order_id))
    }

    async fn list_orders(
        &self,
        filter: OrderFilter,
        sort: SortBy,
        limit: Option<usize>,
    ) -> Result<Vec<Order>, orders::Error> {
        let mut rows: Vec<Order> = self
            .orders
            .lock()?
            .values()
            .filter(|order| filter.matches(order))
            .cloned()
            .collect();

        match sort {
            SortBy::CreatedAtAsc => rows.sort_by_key(|order| order.created_at),
            SortBy::CreatedAtDesc => {
                rows.sort_by_key(|order| std::cmp::Reverse(order.created_at))
            }
        }
        if let Some(limit) = limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn insert_order(&self, new_order: NewOrder) -> Result<Order, orders::Error> {
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: new_order.customer_id,
            rider_id: None,
            pickup_location: new_order.pickup_location,
            dropoff_location: new_order.dropoff_location,
            item_description: new_order.item_description,
            estimated_weight: new_order.estimated_weight,
            amount: new_order.amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        self.orders.lock()?.insert(order.id, order.clone());

        Ok(order)
    }

    async fn update_order(
        &self,
        order_id: Uuid,
        patch: OrderPatch,
        condition: Option<UpdateCondition>,
    ) -> Result<Order, orders::Error> {
        let mut orders = self.orders.lock()?;
        let order = orders
            .get_mut(&order_id)
            .ok_or(orders::Error::OrderNotFound(order_id))?;

        if let Some(condition) = condition {
            if !condition.holds(order) {
                tracing::warn!(%order_id, status = %order.status, "conditional update lost");
                return Err(orders::Error::ConditionFailed {
                    order_id,
                    actual_status: order.status,
                    actual_rider: order.rider_id,
                });
            }
        }

        if let Some(status) = patch.status {
            order.status = status;
        }
        if let Some(rider_id) = patch.rider_id {
            order.rider_id = Some(rider_id);
        }

        Ok(order.clone())
    }
}

#[async_trait::async_trait]
impl ProfilePort for MemoryStore {
    async fn get_profile(&self, profile_id: Uuid) -> Result<Profile, profiles::Error> {
        self.profiles
            .lock()?
            .get(&profile_id)
            .cloned()
            .ok_or(profiles::Error::ProfileNotFound(profile_id))
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<Profile, profiles::Error> {
        self.profiles.lock()?.insert(profile.id, profile.clone());

        Ok(profile)
    }
}

/// We need to create a custom `From` implementation here for an error that's specific to this
/// adapter.
impl<T> From<PoisonError<T>> for orders::Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}

impl<T> From<PoisonError<T>> for profiles::Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}
