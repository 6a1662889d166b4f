//! Emergency Detection
//!
//! Scans world metrics against per-category thresholds and emits at most one
//! emergency per category per scan, gated by per-category cooldowns.

use timeline_events::{
    BreachDirection, CooldownTable, EmergencyCategory, EmergencyInstance, WorldState,
};

use crate::config::DetectionConfig;

/// Threshold watcher over the world state.
pub struct EmergencyDetector {
    config: DetectionConfig,
    cooldowns: CooldownTable,
}

impl EmergencyDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            cooldowns: CooldownTable::new(),
        }
    }

    /// Rebuilds a detector from a persisted cooldown table.
    pub fn from_parts(config: DetectionConfig, cooldowns: CooldownTable) -> Self {
        Self { config, cooldowns }
    }

    /// The cooldown table, for snapshotting.
    pub fn cooldowns(&self) -> &CooldownTable {
        &self.cooldowns
    }

    /// How far a metric value has breached the category's threshold.
    ///
    /// Returns None while the metric is on the safe side.
    fn breach_distance(&self, category: EmergencyCategory, value: i32) -> Option<i32> {
        let threshold = self.config.threshold(category);
        match category.direction() {
            BreachDirection::Below if value < threshold => Some(threshold - value),
            BreachDirection::Above if value > threshold => Some(value - threshold),
            _ => None,
        }
    }

    /// Scans the world for breached thresholds.
    ///
    /// Emits at most one instance per category and stamps the cooldown table
    /// for each, so re-scanning within the cooldown window yields nothing for
    /// that category even while the metric stays breached. The returned list
    /// is in category declaration order; callers sort by severity.
    pub fn scan(&mut self, world: &WorldState, current_turn: u64) -> Vec<EmergencyInstance> {
        let mut detected = Vec::new();

        for category in EmergencyCategory::ALL {
            let value = world.metric(category.metric());
            let Some(distance) = self.breach_distance(category, value) else {
                continue;
            };

            if !self
                .cooldowns
                .ready(category, current_turn, self.config.cooldown(category))
            {
                tracing::debug!(
                    category = %category,
                    value,
                    "breach suppressed by cooldown"
                );
                continue;
            }

            let tier = self.config.tier_for_distance(distance);
            tracing::debug!(category = %category, value, %tier, "emergency detected");
            self.cooldowns.mark(category, current_turn);
            detected.push(EmergencyInstance {
                category,
                trigger_value: value,
                tier,
                detected_turn: current_turn,
            });
        }

        detected
    }
}
