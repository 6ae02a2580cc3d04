//! The order aggregate and its price snapshots

use crate::error::ValidationError;
use crate::types::{Price, Timestamp};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Shipped,
    #[n(2)]
    Delivered,
    #[n(3)]
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{status}")
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// An order line. `price` is the product price at the moment the order was
/// placed and is never touched again, whatever happens to the catalog.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct OrderItem {
    #[n(0)]
    pub product_id: String,
    #[n(1)]
    pub quantity: u32,
    #[n(2)]
    pub price: Price,
}

/// An order and the lines it owns. The lines are embedded in the record, so
/// they live and die with the order.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Order {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub user_id: String,
    #[n(2)]
    pub total_amount: Price,
    #[n(3)]
    pub status: OrderStatus,
    #[n(4)]
    items: Vec<OrderItem>,
    #[n(5)]
    pub created_at: Timestamp,
    #[n(6)]
    pub updated_at: Timestamp,
}

impl Order {
    /// Create a pending order. The total is fixed here from the line
    /// snapshots and never recomputed afterwards.
    pub fn new(
        id: String,
        user_id: impl Into<String>,
        items: Vec<OrderItem>,
        placed_at: Timestamp,
    ) -> Self {
        let total_amount = total_of(&items);

        Self {
            id,
            user_id: user_id.into(),
            total_amount,
            status: OrderStatus::Pending,
            items,
            created_at: placed_at.clone(),
            updated_at: placed_at,
        }
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Timestamp::now();
    }
}

/// Sum of line totals, rounded to two decimal places.
pub fn total_of(items: &[OrderItem]) -> Price {
    let sum: Decimal = items
        .iter()
        .map(|item| item.price.line_total(item.quantity))
        .sum();

    Price::new(sum.round_dp(2))
}
