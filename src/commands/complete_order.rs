use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;
use uuid::Uuid;

use crate::{
    domain::{Order, OrderStatus, Role, Session},
    ports::{
        orders::{OrderPatch, OrderStorePort, UpdateCondition},
        profiles::ProfilePort,
    },
};

use super::{DomainLogic, Error};

pub struct CompleteOrderRequest {
    pub actor: Session,
    pub order_id: Uuid,
}

/// The assigned rider marks a delivery as done.
///
/// The row is read first to classify failures (wrong rider vs. wrong state),
/// then the write is conditioned on the state just read so a concurrent
/// transition surfaces as [`Error::Conflict`] instead of a silent overwrite.
impl<O, P> Service<CompleteOrderRequest> for DomainLogic<O, P>
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

    fn call(&mut self, req: CompleteOrderRequest) -> Self::Future {
        let orders = self.orders.clone();
        Box::pin(async move {
            if req.actor.role != Role::Rider {
                return Err(Error::Authorization("only riders complete orders".into()));
            }

            let order = orders.get_order(req.order_id).await?;
            if order.rider_id != Some(req.actor.user_id) {
                return Err(Error::Authorization(
                    "only the assigned rider may complete an order".into(),
                ));
            }
            if order.status != OrderStatus::InProgress {
                return Err(Error::Conflict(
                    format!("cannot complete an order that is {}", order.status).into(),
                ));
            }

            let order = orders
                .update_order(
                    req.order_id,
                    OrderPatch {
                        status: Some(OrderStatus::Completed),
                        rider_id: None,
                    },
                    Some(UpdateCondition::assigned(
                        OrderStatus::InProgress,
                        req.actor.user_id,
                    )),
                )
                .await?;
            tracing::info!(order_id = %order.id, rider_id = %req.actor.user_id, "order completed");

            Ok(order)
        })
    }
}
