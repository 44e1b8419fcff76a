use chrono::{DateTime, Duration, Months, NaiveTime, Utc};
use rust_decimal::Decimal;

use super::{Order, OrderStatus};

/// Time-bucketed totals over a rider's completed orders.
///
/// Derived on demand, never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EarningsSummary {
    /// Since the start of `as_of`'s calendar day.
    pub today: Decimal,
    /// Rolling window: the last 7 * 24 hours before `as_of`.
    pub this_week: Decimal,
    /// Since the same day-of-month one calendar month before `as_of`,
    /// clamped when the prior month is shorter.
    pub this_month: Decimal,
    pub all_time: Decimal,
}

/// Reduces completed orders into the four earnings buckets.
///
/// Non-completed orders are ignored. An order timestamped at a bucket's lower
/// bound (or at `as_of` itself) counts in that bucket. Returns all zeros for an
/// empty input.
///
/// The week bucket is a rolling window while the month bucket is
/// calendar-relative; the asymmetry is intentional.
pub fn summarize(orders: &[Order], as_of: DateTime<Utc>) -> EarningsSummary {
    let day_start = as_of.date_naive().and_time(NaiveTime::MIN).and_utc();
    let week_start = as_of - Duration::days(7);
    let month_start = as_of
        .checked_sub_months(Months::new(1))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut summary = EarningsSummary::default();
    for order in orders {
        if order.status != OrderStatus::Completed {
            continue;
        }
        summary.all_time += order.amount;
        if order.created_at >= day_start {
            summary.today += order.amount;
        }
        if order.created_at >= week_start {
            summary.this_week += order.amount;
        }
        if order.created_at >= month_start {
            summary.this_month += order.amount;
        }
    }
    summary
}
