//! Turn Reports
//!
//! The structured per-turn product handed to the presentation layer: what
//! emergencies fired, what missions were generated or resolved, and which
//! effects landed on the world.

use serde::{Deserialize, Serialize};

use crate::calendar::TurnStamp;
use crate::emergency::EmergencyInstance;
use crate::mission::Mission;
use crate::world::MetricKind;

/// One delta that actually landed on the world this turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedEffect {
    pub metric: MetricKind,
    pub amount: i32,
    /// Metric value after clamping.
    pub resulting_value: i32,
    /// Mission or event id the delta came from.
    pub source: String,
}

/// Everything that happened in one turn, for the narrator layer to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub stamp: TurnStamp,
    /// Deltas applied this turn, in application order.
    pub effects_applied: Vec<AppliedEffect>,
    /// Emergencies detected this turn, highest severity first.
    pub emergencies: Vec<EmergencyInstance>,
    /// Missions synthesized this turn, in generation order.
    pub missions_generated: Vec<Mission>,
    /// Missions that reached a terminal outcome this turn.
    pub missions_resolved: Vec<Mission>,
    /// Id of a player mission awaiting phase input, if any.
    pub awaiting_player: Option<String>,
}

impl TurnReport {
    /// Creates an empty report for the given stamp.
    pub fn new(stamp: TurnStamp) -> Self {
        Self {
            stamp,
            effects_applied: Vec::new(),
            emergencies: Vec::new(),
            missions_generated: Vec::new(),
            missions_resolved: Vec::new(),
            awaiting_player: None,
        }
    }

    /// Serializes the report to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a report from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::GameDate;
    use crate::emergency::{EmergencyCategory, SeverityTier};

    #[test]
    fn test_empty_report_roundtrip() {
        let report = TurnReport::new(TurnStamp::new(3, GameDate::new(2018, 3, 18)));
        let line = report.to_jsonl().unwrap();
        assert!(!line.contains('\n'));
        let parsed = TurnReport::from_jsonl(&line).unwrap();
        assert_eq!(report, parsed);
    }

    #[test]
    fn test_report_with_emergency_roundtrip() {
        let mut report = TurnReport::new(TurnStamp::start());
        report.emergencies.push(EmergencyInstance {
            category: EmergencyCategory::TimelineCollapse,
            trigger_value: 8,
            tier: SeverityTier::Critical,
            detected_turn: 1,
        });
        report.effects_applied.push(AppliedEffect {
            metric: MetricKind::TimelineStability,
            amount: 10,
            resulting_value: 18,
            source: "msn_000001".to_string(),
        });
        let parsed = TurnReport::from_jsonl(&report.to_jsonl().unwrap()).unwrap();
        assert_eq!(parsed.emergencies.len(), 1);
        assert_eq!(parsed.effects_applied[0].resulting_value, 18);
    }
}
