//! Payment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::geo::Coordinate;

// ============================================================================
// Payment status
// ============================================================================

/// State of a payment in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "success" => Ok(PaymentStatus::Success),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(format!(
                "invalid payment status: {s}. must be one of: pending, success, failed"
            )),
        }
    }
}

// ============================================================================
// Core model
// ============================================================================

/// A payment created when a trip completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub trip_id: i64,
    pub amount: f64,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_response: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for `POST /v1/payments`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPaymentRequest {
    pub trip_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// The payment receipt handed back to the rider.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub payment_id: i64,
    pub trip_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_id: Option<i64>,
    pub driver_id: i64,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub status: PaymentStatus,
    pub distance_km: f64,
    pub duration_sec: i64,
    pub pickup: Coordinate,
    pub destination: Coordinate,
    pub timestamp: DateTime<Utc>,
}

/// The simulated payment provider's canonical stub response.
pub fn simulated_provider_response(payment_id: i64) -> serde_json::Value {
    serde_json::json!({
        "provider": "simulated",
        "id": format!("pay_{payment_id}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_the_only_non_terminal_state() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Success.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
    }

    #[test]
    fn status_round_trips_through_str() {
        for s in [PaymentStatus::Pending, PaymentStatus::Success, PaymentStatus::Failed] {
            assert_eq!(s.as_str().parse::<PaymentStatus>().unwrap(), s);
        }
    }

    #[test]
    fn simulated_response_matches_provider_shape() {
        let resp = simulated_provider_response(42);
        assert_eq!(resp["provider"], "simulated");
        assert_eq!(resp["id"], "pay_42");
    }
}
