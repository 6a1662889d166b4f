//! Engine Snapshot
//!
//! The persisted state layout the engine can be reconstructed from:
//! world state, cooldown table, mission history, and the pending consequence
//! queue. In-flight missions live inside the history with a non-terminal
//! status, so nothing outside these structures is needed to resume.

use serde::{Deserialize, Serialize};

use crate::consequence::ConsequenceEntry;
use crate::emergency::CooldownTable;
use crate::mission::Mission;
use crate::world::WorldState;

/// Serializable snapshot of a full engine session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub world: WorldState,
    pub cooldowns: CooldownTable,
    /// Every mission ever generated, resolved or still open, oldest first.
    pub mission_history: Vec<Mission>,
    /// Delayed consequences not yet applied, in scheduling order.
    pub pending_consequences: Vec<ConsequenceEntry>,
    /// Next mission id sequence number, persisted so restored engines
    /// allocate identical ids.
    pub next_mission_seq: u64,
}

impl EngineSnapshot {
    /// Serializes the snapshot as pretty JSON for on-disk storage.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consequence::EffectDelta;
    use crate::world::MetricKind;

    #[test]
    fn test_snapshot_roundtrip() {
        let mut world = WorldState::new();
        world.turn_number = 9;
        world.apply_delta(MetricKind::ExposureRisk, 40);

        let mut cooldowns = CooldownTable::new();
        cooldowns.mark(crate::emergency::EmergencyCategory::ExposureCrisis, 7);

        let snapshot = EngineSnapshot {
            world,
            cooldowns,
            mission_history: Vec::new(),
            pending_consequences: vec![ConsequenceEntry::new(
                vec![EffectDelta::new(MetricKind::TimelineStability, 5)],
                12,
                "msn_000002",
            )],
            next_mission_seq: 3,
        };

        let parsed = EngineSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(snapshot, parsed);
    }
}
