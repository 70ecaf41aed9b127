//! Assignment domain model — a time-bounded offer of a ride to a driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Assignment status
// ============================================================================

/// State of an assignment (offer) in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Offered,
    Accepted,
    Declined,
    Expired,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Offered => "offered",
            AssignmentStatus::Accepted => "accepted",
            AssignmentStatus::Declined => "declined",
            AssignmentStatus::Expired => "expired",
        }
    }

    /// Only `Offered` is non-terminal; every other state is a dead end.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AssignmentStatus::Offered)
    }

    pub fn can_transition_to(&self, target: AssignmentStatus) -> bool {
        matches!(
            (self, target),
            (AssignmentStatus::Offered, AssignmentStatus::Accepted)
                | (AssignmentStatus::Offered, AssignmentStatus::Declined)
                | (AssignmentStatus::Offered, AssignmentStatus::Expired)
        )
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offered" => Ok(AssignmentStatus::Offered),
            "accepted" => Ok(AssignmentStatus::Accepted),
            "declined" => Ok(AssignmentStatus::Declined),
            "expired" => Ok(AssignmentStatus::Expired),
            _ => Err(format!(
                "invalid assignment status: {s}. must be one of: offered, accepted, declined, expired"
            )),
        }
    }
}

// ============================================================================
// Core model
// ============================================================================

/// A single offer of a ride to a driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub ride_id: i64,
    pub driver_id: i64,
    pub status: AssignmentStatus,
    pub offered_at: DateTime<Utc>,
}

/// Compact assignment view embedded in `RideOut`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub id: i64,
    pub driver_id: i64,
    pub status: AssignmentStatus,
}

impl From<Assignment> for AssignmentSummary {
    fn from(a: Assignment) -> Self {
        Self {
            id: a.id,
            driver_id: a.driver_id,
            status: a.status,
        }
    }
}

/// Request payload shared by `accept` and `decline`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentActionRequest {
    pub assignment_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offered_is_the_only_non_terminal_state() {
        assert!(!AssignmentStatus::Offered.is_terminal());
        assert!(AssignmentStatus::Accepted.is_terminal());
        assert!(AssignmentStatus::Declined.is_terminal());
        assert!(AssignmentStatus::Expired.is_terminal());
    }

    #[test]
    fn offered_can_transition_to_any_terminal_state() {
        assert!(AssignmentStatus::Offered.can_transition_to(AssignmentStatus::Accepted));
        assert!(AssignmentStatus::Offered.can_transition_to(AssignmentStatus::Declined));
        assert!(AssignmentStatus::Offered.can_transition_to(AssignmentStatus::Expired));
    }

    #[test]
    fn terminal_states_have_no_outgoing_transitions() {
        assert!(!AssignmentStatus::Accepted.can_transition_to(AssignmentStatus::Expired));
        assert!(!AssignmentStatus::Expired.can_transition_to(AssignmentStatus::Accepted));
        assert!(!AssignmentStatus::Declined.can_transition_to(AssignmentStatus::Offered));
    }

    #[test]
    fn status_round_trips_through_str() {
        for s in [
            AssignmentStatus::Offered,
            AssignmentStatus::Accepted,
            AssignmentStatus::Declined,
            AssignmentStatus::Expired,
        ] {
            assert_eq!(s.as_str().parse::<AssignmentStatus>().unwrap(), s);
        }
    }
}
