use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

use crate::errors::ServiceError;

/// Repair workflow states.
///
/// The graph is `INTAKE → TO_REPAIR → IN_REPAIR → {REPAIRED | UNREPAIRABLE}
/// → DELIVERED`, with one back-edge `TO_REPAIR → INTAKE` for manual
/// correction. `DELIVERED` is terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairStatus {
    Intake,
    ToRepair,
    InRepair,
    Repaired,
    Unrepairable,
    Delivered,
}

impl RepairStatus {
    /// Statuses this one may legally move to.
    pub fn allowed_next(self) -> &'static [RepairStatus] {
        use RepairStatus::*;
        match self {
            Intake => &[ToRepair],
            ToRepair => &[InRepair, Intake],
            InRepair => &[Repaired, Unrepairable],
            Repaired => &[Delivered],
            Unrepairable => &[Delivered],
            Delivered => &[],
        }
    }

    pub fn can_transition(self, next: RepairStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Parses a caller-supplied status string, surfacing `InvalidStatus` for
    /// anything outside the six known values.
    pub fn parse(value: &str) -> Result<Self, ServiceError> {
        Self::from_str(value).map_err(|_| ServiceError::InvalidStatus(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::RepairStatus::{self, *};
    use assert_matches::assert_matches;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use crate::errors::ServiceError;

    #[rstest]
    #[case(Intake, ToRepair)]
    #[case(ToRepair, InRepair)]
    #[case(ToRepair, Intake)]
    #[case(InRepair, Repaired)]
    #[case(InRepair, Unrepairable)]
    #[case(Repaired, Delivered)]
    #[case(Unrepairable, Delivered)]
    fn legal_edges_are_accepted(#[case] from: RepairStatus, #[case] to: RepairStatus) {
        assert!(from.can_transition(to), "{from} -> {to} should be legal");
    }

    #[test]
    fn table_contains_exactly_seven_edges() {
        let edge_count: usize = RepairStatus::iter().map(|s| s.allowed_next().len()).sum();
        assert_eq!(edge_count, 7);
    }

    #[test]
    fn delivered_is_terminal() {
        assert!(Delivered.is_terminal());
        for to in RepairStatus::iter() {
            assert!(!Delivered.can_transition(to));
        }
    }

    #[test]
    fn no_status_transitions_to_itself() {
        for status in RepairStatus::iter() {
            assert!(!status.can_transition(status));
        }
    }

    #[test]
    fn skipping_stages_is_rejected() {
        assert!(!Intake.can_transition(InRepair));
        assert!(!Intake.can_transition(Delivered));
        assert!(!ToRepair.can_transition(Repaired));
        assert!(!InRepair.can_transition(Delivered));
        assert!(!Repaired.can_transition(Intake));
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(ToRepair.to_string(), "TO_REPAIR");
        assert_eq!(Unrepairable.to_string(), "UNREPAIRABLE");
    }

    #[test]
    fn parse_round_trips_every_status() {
        for status in RepairStatus::iter() {
            assert_eq!(RepairStatus::parse(&status.to_string()).unwrap(), status);
        }
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_matches!(
            RepairStatus::parse("SHIPPED"),
            Err(ServiceError::InvalidStatus(s)) if s == "SHIPPED"
        );
        assert_matches!(
            RepairStatus::parse("to_repair"),
            Err(ServiceError::InvalidStatus(_))
        );
    }
}
