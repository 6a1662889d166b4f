//! World State
//!
//! The single shared record of global metrics. Every metric is clamped to
//! [0, 100] on mutation; out-of-range deltas are normal and never an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound for every world metric.
pub const METRIC_MIN: i32 = 0;
/// Upper bound for every world metric.
pub const METRIC_MAX: i32 = 100;

/// Names one of the global metric fields, for table-driven deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    TimelineStability,
    GovernmentControl,
    FactionInfluence,
    NationalSecurity,
    ExposureRisk,
    HostBodyIntegrity,
}

impl MetricKind {
    /// All metric kinds, in declaration order.
    pub const ALL: [MetricKind; 6] = [
        MetricKind::TimelineStability,
        MetricKind::GovernmentControl,
        MetricKind::FactionInfluence,
        MetricKind::NationalSecurity,
        MetricKind::ExposureRisk,
        MetricKind::HostBodyIntegrity,
    ];
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricKind::TimelineStability => "timeline_stability",
            MetricKind::GovernmentControl => "government_control",
            MetricKind::FactionInfluence => "faction_influence",
            MetricKind::NationalSecurity => "national_security",
            MetricKind::ExposureRisk => "exposure_risk",
            MetricKind::HostBodyIntegrity => "host_body_integrity",
        };
        write!(f, "{}", name)
    }
}

/// Global world state shared by every system.
///
/// Mutation discipline: metric fields are written only through the
/// consequence scheduler; the emergency detector owns its cooldown table and
/// only reads from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// How intact the protected timeline currently is.
    pub timeline_stability: i32,
    /// The Director's grip on government institutions.
    pub government_control: i32,
    /// Reach of the rogue Faction.
    pub faction_influence: i32,
    /// Overall stability of national institutions.
    pub national_security: i32,
    /// How close operations are to public discovery.
    pub exposure_risk: i32,
    /// Aggregate host-body health of the active team.
    pub host_body_integrity: i32,
    /// Monotonically increasing turn counter.
    pub turn_number: u64,
}

impl WorldState {
    /// Creates the opening world state.
    pub fn new() -> Self {
        Self {
            timeline_stability: 80,
            government_control: 80,
            faction_influence: 20,
            national_security: 70,
            exposure_risk: 20,
            host_body_integrity: 90,
            turn_number: 0,
        }
    }

    /// Reads a metric by kind.
    pub fn metric(&self, kind: MetricKind) -> i32 {
        match kind {
            MetricKind::TimelineStability => self.timeline_stability,
            MetricKind::GovernmentControl => self.government_control,
            MetricKind::FactionInfluence => self.faction_influence,
            MetricKind::NationalSecurity => self.national_security,
            MetricKind::ExposureRisk => self.exposure_risk,
            MetricKind::HostBodyIntegrity => self.host_body_integrity,
        }
    }

    /// Sets a metric by kind, clamping into [0, 100].
    pub fn set_metric(&mut self, kind: MetricKind, value: i32) {
        let clamped = value.clamp(METRIC_MIN, METRIC_MAX);
        match kind {
            MetricKind::TimelineStability => self.timeline_stability = clamped,
            MetricKind::GovernmentControl => self.government_control = clamped,
            MetricKind::FactionInfluence => self.faction_influence = clamped,
            MetricKind::NationalSecurity => self.national_security = clamped,
            MetricKind::ExposureRisk => self.exposure_risk = clamped,
            MetricKind::HostBodyIntegrity => self.host_body_integrity = clamped,
        }
    }

    /// Applies a delta to a metric, clamping into [0, 100].
    ///
    /// Returns the value after clamping.
    pub fn apply_delta(&mut self, kind: MetricKind, amount: i32) -> i32 {
        self.set_metric(kind, self.metric(kind) + amount);
        self.metric(kind)
    }

    /// True if every metric lies within [0, 100].
    pub fn in_bounds(&self) -> bool {
        MetricKind::ALL
            .iter()
            .all(|&k| (METRIC_MIN..=METRIC_MAX).contains(&self.metric(k)))
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_in_bounds() {
        assert!(WorldState::new().in_bounds());
    }

    #[test]
    fn test_apply_delta_clamps_low() {
        let mut world = WorldState::new();
        let value = world.apply_delta(MetricKind::FactionInfluence, -500);
        assert_eq!(value, 0);
        assert_eq!(world.faction_influence, 0);
    }

    #[test]
    fn test_apply_delta_clamps_high() {
        let mut world = WorldState::new();
        let value = world.apply_delta(MetricKind::TimelineStability, 500);
        assert_eq!(value, 100);
        assert_eq!(world.timeline_stability, 100);
    }

    #[test]
    fn test_delta_sequence_stays_in_bounds() {
        let mut world = WorldState::new();
        let deltas = [-37, 90, -200, 15, 300, -45, 7];
        for (i, &d) in deltas.iter().enumerate() {
            let kind = MetricKind::ALL[i % MetricKind::ALL.len()];
            world.apply_delta(kind, d);
            assert!(world.in_bounds(), "out of bounds after delta {}", d);
        }
    }

    #[test]
    fn test_metric_roundtrip_by_kind() {
        let mut world = WorldState::new();
        for &kind in &MetricKind::ALL {
            world.set_metric(kind, 55);
            assert_eq!(world.metric(kind), 55);
        }
    }

    #[test]
    fn test_metric_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&MetricKind::TimelineStability).unwrap(),
            r#""timeline_stability""#
        );
        assert_eq!(
            serde_json::to_string(&MetricKind::HostBodyIntegrity).unwrap(),
            r#""host_body_integrity""#
        );
    }

    #[test]
    fn test_world_state_serde_roundtrip() {
        let mut world = WorldState::new();
        world.apply_delta(MetricKind::ExposureRisk, 33);
        world.turn_number = 17;
        let json = serde_json::to_string(&world).unwrap();
        let parsed: WorldState = serde_json::from_str(&json).unwrap();
        assert_eq!(world, parsed);
    }
}
