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

pub struct ClaimOrderRequest {
    pub actor: Session,
    pub order_id: Uuid,
}

/// A rider attaches themselves to a pending order.
///
/// The write is conditioned on the row still being pending and unclaimed, so
/// two concurrent claims resolve to exactly one winner; the loser gets
/// [`Error::Conflict`] and should refresh their board.
impl<O, P> Service<ClaimOrderRequest> for DomainLogic<O, P>
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

    fn call(&mut self, req: ClaimOrderRequest) -> Self::Future {
        let orders = self.orders.clone();
        Box::pin(async move {
            if req.actor.role != Role::Rider {
                return Err(Error::Authorization("only riders claim orders".into()));
            }

            let order = orders
                .update_order(
                    req.order_id,
                    OrderPatch {
                        status: Some(OrderStatus::InProgress),
                        rider_id: Some(req.actor.user_id),
                    },
                    Some(UpdateCondition::unclaimed_pending()),
                )
                .await?;
            tracing::info!(order_id = %order.id, rider_id = %req.actor.user_id, "order claimed");

            Ok(order)
        })
    }
}
