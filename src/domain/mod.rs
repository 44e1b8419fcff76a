use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub mod earnings;

/// Base delivery price in KES, multiplied by the weight factor at creation time.
pub const BASE_PRICE: Decimal = dec!(500);

/// Quoted order amount for an estimated parcel weight.
///
/// Weights below 1 kg do not discount below the base price.
pub fn quote_amount(estimated_weight: Decimal) -> Decimal {
    BASE_PRICE * estimated_weight.max(Decimal::ONE)
}

/// Role claim carried by an authenticated identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Places orders
    Customer,
    /// Fulfills orders
    Rider,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Rider => "rider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "rider" => Ok(Role::Rider),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// An authenticated principal, as returned by sign-up before a profile exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// The signed-in session visible to the rest of the application.
///
/// Owned by the session store; read-only everywhere else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Lifecycle status of an order.
///
/// The backing store historically used both `accepted` and `in_progress` for
/// the claimed-but-unfinished state; `in_progress` is the canonical label and
/// `accepted` is parsed as an alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            // Legacy alias from older rows; never emitted.
            "in_progress" | "accepted" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// A label read from the backing store that maps to no known variant.
#[derive(Debug, thiserror::Error)]
#[error("unknown label: {0:?}")]
pub struct UnknownLabel(pub String);

/// A delivery order.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    /// Assigned by the repository on insert.
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Set exactly once, when a rider claims the order.
    ///
    /// `None` iff `status == Pending`.
    pub rider_id: Option<Uuid>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub item_description: Option<String>,
    pub estimated_weight: Decimal,
    /// Computed at creation time, immutable thereafter.
    pub amount: Decimal,
    pub status: OrderStatus,
    /// Set once on insert, immutable.
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new order.
///
/// The repository assigns `id` and `created_at` and starts the order as
/// `Pending` with no rider.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub item_description: Option<String>,
    pub estimated_weight: Decimal,
    pub amount: Decimal,
}

/// Role-dependent profile fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileDetails {
    Customer {
        address: String,
    },
    Rider {
        vehicle_type: String,
        vehicle_model: String,
        plate_number: String,
    },
}

impl ProfileDetails {
    pub fn role(&self) -> Role {
        match self {
            ProfileDetails::Customer { .. } => Role::Customer,
            ProfileDetails::Rider { .. } => Role::Rider,
        }
    }
}

/// Per-identity profile record, keyed by the identity id.
///
/// Mutated only by its owner, never deleted by the application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub details: ProfileDetails,
}

impl Profile {
    pub fn role(&self) -> Role {
        self.details.role()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use speculoos::prelude::*;

    #[rstest]
    #[case(dec!(0.5), dec!(500))]
    #[case(dec!(1), dec!(500))]
    #[case(dec!(2), dec!(1000))]
    #[case(dec!(2.5), dec!(1250))]
    fn test_quote_amount(#[case] weight: Decimal, #[case] expected: Decimal) {
        assert_that!(quote_amount(weight)).is_equal_to(expected);
    }

    #[rstest]
    #[case("pending", OrderStatus::Pending)]
    #[case("in_progress", OrderStatus::InProgress)]
    #[case("accepted", OrderStatus::InProgress)]
    #[case("completed", OrderStatus::Completed)]
    #[case("cancelled", OrderStatus::Cancelled)]
    fn test_status_parse(#[case] label: &str, #[case] expected: OrderStatus) {
        let res: Result<OrderStatus, _> = label.parse();
        assert_that!(res).is_ok().is_equal_to(expected);
    }

    #[test]
    fn test_status_parse_unknown() {
        let res: Result<OrderStatus, _> = "delivered".parse();
        assert_that!(res).is_err();
    }

    /// The legacy alias never round-trips: canonical output only.
    #[test]
    fn test_status_alias_canonicalized() {
        let status: OrderStatus = "accepted".parse().unwrap();
        assert_that!(status.as_str()).is_equal_to("in_progress");
    }

    #[rstest]
    #[case(OrderStatus::Pending, false)]
    #[case(OrderStatus::InProgress, false)]
    #[case(OrderStatus::Completed, true)]
    #[case(OrderStatus::Cancelled, true)]
    fn test_terminal(#[case] status: OrderStatus, #[case] terminal: bool) {
        assert_that!(status.is_terminal()).is_equal_to(terminal);
    }
}
