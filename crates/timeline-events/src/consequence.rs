//! Consequence Types
//!
//! World-state deltas produced by resolved missions and events. Immediate
//! deltas are applied as they are recorded; delayed deltas are queued against
//! a future turn.

use serde::{Deserialize, Serialize};

use crate::world::MetricKind;

/// A single signed adjustment to one world metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDelta {
    pub metric: MetricKind,
    pub amount: i32,
}

impl EffectDelta {
    pub fn new(metric: MetricKind, amount: i32) -> Self {
        Self { metric, amount }
    }
}

/// A scheduled bundle of deltas waiting for its apply turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceEntry {
    pub deltas: Vec<EffectDelta>,
    /// Turn on or after which the entry fires.
    pub apply_turn: u64,
    /// Mission or event id that produced the entry.
    pub source: String,
    /// Entries are removed once applied; the flag records that contract in
    /// the persisted form.
    pub one_shot: bool,
}

impl ConsequenceEntry {
    pub fn new(deltas: Vec<EffectDelta>, apply_turn: u64, source: impl Into<String>) -> Self {
        Self {
            deltas,
            apply_turn,
            source: source.into(),
            one_shot: true,
        }
    }

    /// True if the entry is due on `current_turn`.
    pub fn due(&self, current_turn: u64) -> bool {
        self.apply_turn <= current_turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_on_or_after_apply_turn() {
        let entry = ConsequenceEntry::new(
            vec![EffectDelta::new(MetricKind::ExposureRisk, 9)],
            12,
            "msn_000003",
        );
        assert!(!entry.due(11));
        assert!(entry.due(12));
        assert!(entry.due(30));
    }

    #[test]
    fn test_serde_roundtrip() {
        let entry = ConsequenceEntry::new(
            vec![
                EffectDelta::new(MetricKind::TimelineStability, -10),
                EffectDelta::new(MetricKind::FactionInfluence, 5),
            ],
            8,
            "msn_000001",
        );
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ConsequenceEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, parsed);
    }
}
