use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use chrono::{DateTime, Utc};
use tower::Service;

use crate::{
    domain::{
        earnings::{summarize, EarningsSummary},
        Order, Role, Session,
    },
    ports::{
        orders::{OrderFilter, OrderStorePort, SortBy},
        profiles::ProfilePort,
    },
};

use super::{DomainLogic, Error};

/// How many completed orders the earnings screen lists.
const RECENT_LIMIT: usize = 10;

pub struct RiderEarningsRequest {
    pub actor: Session,
    pub as_of: DateTime<Utc>,
}

#[derive(Debug, PartialEq)]
pub struct RiderEarningsResponse {
    pub summary: EarningsSummary,
    /// The rider's most recent completed orders, newest first.
    pub recent_orders: Vec<Order>,
}

impl<O, P> Service<RiderEarningsRequest> for DomainLogic<O, P>
where
    O: OrderStorePort + 'static,
    P: ProfilePort + 'static,
{
    type Response = RiderEarningsResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RiderEarningsRequest) -> Self::Future {
        let orders = self.orders.clone();
        Box::pin(async move {
            if req.actor.role != Role::Rider {
                return Err(Error::Authorization("earnings are rider-only".into()));
            }

            let completed = orders
                .list_orders(
                    OrderFilter::completed_by_rider(req.actor.user_id),
                    SortBy::CreatedAtDesc,
                    None,
                )
                .await?;

            let summary = summarize(&completed, req.as_of);
            let recent_orders = completed.into_iter().take(RECENT_LIMIT).collect();

            Ok(RiderEarningsResponse {
                summary,
                recent_orders,
            })
        })
    }
}
