//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order lifecycle states.
///
/// `Completed` is terminal and locks the order's items and fees against
/// further edits. All other transitions are admin-driven and unconstrained,
/// including moving backwards (e.g. `Ready` -> `Pending`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Completed orders lock their items and fees.
    pub fn locks_items(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// Accepted payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "transfer" => Ok(PaymentMethod::Transfer),
            _ => Err(()),
        }
    }
}

/// Variant profitability classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitabilityStatus {
    Excellent,
    Good,
    Average,
    Poor,
    Loss,
}

impl ProfitabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfitabilityStatus::Excellent => "excellent",
            ProfitabilityStatus::Good => "good",
            ProfitabilityStatus::Average => "average",
            ProfitabilityStatus::Poor => "poor",
            ProfitabilityStatus::Loss => "loss",
        }
    }
}

/// Profitability thresholds (percentages). Deployments may override the
/// defaults of 30/20/10; anything above zero but at or below `average` is
/// `Poor`, zero or negative is `Loss`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitabilityThresholds {
    pub excellent: Decimal,
    pub good: Decimal,
    pub average: Decimal,
}

impl Default for ProfitabilityThresholds {
    fn default() -> Self {
        Self {
            excellent: Decimal::from(30),
            good: Decimal::from(20),
            average: Decimal::from(10),
        }
    }
}

/// Classify a profit percentage against the threshold ladder.
pub fn classify_profitability(
    profit_percentage: Decimal,
    thresholds: &ProfitabilityThresholds,
) -> ProfitabilityStatus {
    if profit_percentage > thresholds.excellent {
        ProfitabilityStatus::Excellent
    } else if profit_percentage > thresholds.good {
        ProfitabilityStatus::Good
    } else if profit_percentage > thresholds.average {
        ProfitabilityStatus::Average
    } else if profit_percentage > Decimal::ZERO {
        ProfitabilityStatus::Poor
    } else {
        ProfitabilityStatus::Loss
    }
}

/// Aggregation period for analytics chart series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, per_page: u32, total_items: i64) -> Self {
        let total_items = total_items.max(0) as u64;
        let total_pages = if total_items == 0 {
            0
        } else {
            ((total_items + per_page as u64 - 1) / per_page as u64) as u32
        };
        Self {
            page,
            per_page,
            total_items,
            total_pages,
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn ladder_uses_strict_greater_than() {
        let t = ProfitabilityThresholds::default();
        assert_eq!(
            classify_profitability(dec("30"), &t),
            ProfitabilityStatus::Good
        );
        assert_eq!(
            classify_profitability(dec("30.01"), &t),
            ProfitabilityStatus::Excellent
        );
        assert_eq!(
            classify_profitability(dec("10"), &t),
            ProfitabilityStatus::Poor
        );
        assert_eq!(
            classify_profitability(Decimal::ZERO, &t),
            ProfitabilityStatus::Loss
        );
        assert_eq!(
            classify_profitability(dec("-5"), &t),
            ProfitabilityStatus::Loss
        );
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn completed_is_the_only_locking_status() {
        for status in OrderStatus::ALL {
            assert_eq!(status.locks_items(), status == OrderStatus::Completed);
        }
    }
}
