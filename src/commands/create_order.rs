use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use rust_decimal::Decimal;
use tower::Service;

use crate::{
    domain::{quote_amount, NewOrder, Order, Role, Session},
    ports::{orders::OrderStorePort, profiles::ProfilePort},
};

use super::{DomainLogic, Error};

pub struct CreateOrderRequest {
    pub actor: Session,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub item_description: Option<String>,
    /// Estimated parcel weight in kg; defaults to 1 when omitted.
    pub estimated_weight: Option<Decimal>,
}

impl<O, P> Service<CreateOrderRequest> for DomainLogic<O, P>
where
    O: OrderStorePort + 'static,
    P: ProfilePort + 'static,
{
    type Response = Order;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CreateOrderRequest) -> Self::Future {
        let orders = self.orders.clone();
        Box::pin(async move {
            if req.actor.role != Role::Customer {
                return Err(Error::Authorization("only customers place orders".into()));
            }
            if req.pickup_location.trim().is_empty() {
                return Err(Error::Validation("pickup location is required".into()));
            }
            if req.dropoff_location.trim().is_empty() {
                return Err(Error::Validation("dropoff location is required".into()));
            }
            let estimated_weight = req.estimated_weight.unwrap_or(Decimal::ONE);
            if estimated_weight <= Decimal::ZERO {
                return Err(Error::Validation("estimated weight must be positive".into()));
            }

            // Priced once at creation; never recomputed.
            let amount = quote_amount(estimated_weight);
            let order = orders
                .insert_order(NewOrder {
                    customer_id: req.actor.user_id,
                    pickup_location: req.pickup_location,
                    dropoff_location: req.dropoff_location,
                    item_description: req.item_description,
                    estimated_weight,
                    amount,
                })
                .await?;
            tracing::info!(order_id = %order.id, amount = %order.amount, "order created");

            Ok(order)
        })
    }
}
