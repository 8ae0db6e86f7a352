//! Order lifecycle states.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use thiserror::Error;

/// Status of an order, from checkout to a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Paid,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Statuses this one may transition to.
    #[must_use]
    pub const fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Paid, Self::Cancelled],
            Self::Paid => &[Self::Shipped, Self::Refunded, Self::Cancelled],
            Self::Shipped => &[Self::Delivered, Self::Refunded],
            Self::Delivered | Self::Cancelled | Self::Refunded => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_targets().contains(&target)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }

    /// Whether entering this status hands the order's committed stock back
    /// to the inventory ledger.
    #[must_use]
    pub const fn releases_inventory(self) -> bool {
        matches!(self, Self::Cancelled | Self::Refunded)
    }

    /// Presentation metadata for read-only surfaces.
    #[must_use]
    pub const fn display(self) -> StatusDisplay {
        match self {
            Self::Pending => StatusDisplay {
                label: "Pending",
                color: "orange",
            },
            Self::Paid => StatusDisplay {
                label: "Paid",
                color: "blue",
            },
            Self::Shipped => StatusDisplay {
                label: "Shipped",
                color: "teal",
            },
            Self::Delivered => StatusDisplay {
                label: "Delivered",
                color: "green",
            },
            Self::Cancelled => StatusDisplay {
                label: "Cancelled",
                color: "red",
            },
            Self::Refunded => StatusDisplay {
                label: "Refunded",
                color: "gray",
            },
        }
    }
}

/// Label and badge color for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: &'static str,
    pub color: &'static str,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown order status {0:?}")]
pub struct ParseOrderStatusError(String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}
