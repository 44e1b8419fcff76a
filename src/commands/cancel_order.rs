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

pub struct CancelOrderRequest {
    pub actor: Session,
    pub order_id: Uuid,
}

/// The owning customer or the assigned rider calls off an order.
///
/// Allowed while the order is pending or in progress; terminal orders are
/// frozen. The write is conditioned on the status just read so a concurrent
/// completion wins the race cleanly.
impl<O, P> Service<CancelOrderRequest> for DomainLogic<O, P>
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

    fn call(&mut self, req: CancelOrderRequest) -> Self::Future {
        let orders = self.orders.clone();
        Box::pin(async move {
            let order = orders.get_order(req.order_id).await?;

            let is_owner = req.actor.role == Role::Customer
                && order.customer_id == req.actor.user_id;
            let is_assignee =
                req.actor.role == Role::Rider && order.rider_id == Some(req.actor.user_id);
            if !is_owner && !is_assignee {
                return Err(Error::Authorization(
                    "only the owning customer or assigned rider may cancel".into(),
                ));
            }
            if order.status.is_terminal() {
                return Err(Error::Conflict(
                    format!("cannot cancel an order that is {}", order.status).into(),
                ));
            }

            let order = orders
                .update_order(
                    req.order_id,
                    OrderPatch {
                        status: Some(OrderStatus::Cancelled),
                        rider_id: None,
                    },
                    Some(UpdateCondition::status_is(order.status)),
                )
                .await?;
            tracing::info!(order_id = %order.id, actor = %req.actor.user_id, "order cancelled");

            Ok(order)
        })
    }
}
