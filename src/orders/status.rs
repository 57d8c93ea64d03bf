//! Order Status

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::orders::OrderError;

/// Where an order is in fulfilment. Orders only ever move forward through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderStatus {
    /// Submitted, not yet picked up
    Pending,

    /// Being packed or out for delivery
    InProgress,

    /// Handed to the customer
    Delivered,
}

impl OrderStatus {
    /// Every status, in fulfilment order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Delivered];

    /// Human readable status label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Delivered => "Delivered",
        }
    }

    /// The status that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::InProgress),
            Self::InProgress => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Whether an order in this status may be moved to `to`.
    ///
    /// Moving forward, including skipping a step, is allowed. Staying put is allowed.
    pub fn can_transition_to(self, to: Self) -> bool {
        to >= self
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalised.as_str() {
            "pending" => Ok(Self::Pending),
            "inprogress" => Ok(Self::InProgress),
            "delivered" => Ok(Self::Delivered),
            _ => Err(OrderError::UnknownStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn statuses_advance_in_order() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::InProgress));
        assert_eq!(OrderStatus::InProgress.next(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.next(), None);
    }

    #[test]
    fn only_forward_transitions_are_allowed() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    to >= from,
                    "transition {from} -> {to}"
                );
            }
        }

        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn labels_parse_back() -> TestResult {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        Ok(())
    }

    #[test]
    fn parsing_ignores_case_and_separators() -> TestResult {
        assert_eq!("in-progress".parse::<OrderStatus>()?, OrderStatus::InProgress);
        assert_eq!("InProgress".parse::<OrderStatus>()?, OrderStatus::InProgress);
        assert_eq!(" DELIVERED ".parse::<OrderStatus>()?, OrderStatus::Delivered);

        Ok(())
    }

    #[test]
    fn unknown_labels_fail_to_parse() {
        let result = "Cancelled".parse::<OrderStatus>();

        assert!(
            matches!(result, Err(OrderError::UnknownStatus(ref label)) if label == "Cancelled"),
            "expected UnknownStatus, got {result:?}"
        );
    }
}
