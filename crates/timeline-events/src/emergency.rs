//! Emergency Types
//!
//! Categories of world-state crises, detected instances, and the cooldown
//! bookkeeping that stops the same category from re-firing every turn.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::world::MetricKind;

/// Direction in which a metric crossing its threshold signals danger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachDirection {
    /// Danger when the metric falls below the threshold.
    Below,
    /// Danger when the metric rises above the threshold.
    Above,
}

/// Category of emergency, each tied to exactly one world metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyCategory {
    TimelineCollapse,
    FactionTakeover,
    DirectorControlLoss,
    HostBodyRejection,
    ExposureCrisis,
    SecurityBreakdown,
}

impl EmergencyCategory {
    /// All categories, in scan order.
    pub const ALL: [EmergencyCategory; 6] = [
        EmergencyCategory::TimelineCollapse,
        EmergencyCategory::FactionTakeover,
        EmergencyCategory::DirectorControlLoss,
        EmergencyCategory::HostBodyRejection,
        EmergencyCategory::ExposureCrisis,
        EmergencyCategory::SecurityBreakdown,
    ];

    /// The world metric this category watches.
    pub fn metric(&self) -> MetricKind {
        match self {
            EmergencyCategory::TimelineCollapse => MetricKind::TimelineStability,
            EmergencyCategory::FactionTakeover => MetricKind::FactionInfluence,
            EmergencyCategory::DirectorControlLoss => MetricKind::GovernmentControl,
            EmergencyCategory::HostBodyRejection => MetricKind::HostBodyIntegrity,
            EmergencyCategory::ExposureCrisis => MetricKind::ExposureRisk,
            EmergencyCategory::SecurityBreakdown => MetricKind::NationalSecurity,
        }
    }

    /// Which side of the threshold counts as a breach.
    pub fn direction(&self) -> BreachDirection {
        match self {
            EmergencyCategory::TimelineCollapse => BreachDirection::Below,
            EmergencyCategory::FactionTakeover => BreachDirection::Above,
            EmergencyCategory::DirectorControlLoss => BreachDirection::Below,
            EmergencyCategory::HostBodyRejection => BreachDirection::Below,
            EmergencyCategory::ExposureCrisis => BreachDirection::Above,
            EmergencyCategory::SecurityBreakdown => BreachDirection::Below,
        }
    }
}

impl fmt::Display for EmergencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmergencyCategory::TimelineCollapse => "timeline_collapse",
            EmergencyCategory::FactionTakeover => "faction_takeover",
            EmergencyCategory::DirectorControlLoss => "director_control_loss",
            EmergencyCategory::HostBodyRejection => "host_body_rejection",
            EmergencyCategory::ExposureCrisis => "exposure_crisis",
            EmergencyCategory::SecurityBreakdown => "security_breakdown",
        };
        write!(f, "{}", name)
    }
}

/// Coarse bucket for how far a metric has breached its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Moderate,
    Severe,
    Critical,
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeverityTier::Moderate => "moderate",
            SeverityTier::Severe => "severe",
            SeverityTier::Critical => "critical",
        };
        write!(f, "{}", name)
    }
}

/// One detected crisis, produced by a scan and consumed by mission generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyInstance {
    pub category: EmergencyCategory,
    /// The metric value that tripped the threshold.
    pub trigger_value: i32,
    pub tier: SeverityTier,
    /// Turn on which the breach was detected.
    pub detected_turn: u64,
}

/// Last-triggered turn per category.
///
/// Read and written only by the emergency detector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownTable {
    entries: HashMap<EmergencyCategory, u64>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn on which the category last fired, if ever.
    pub fn last_triggered(&self, category: EmergencyCategory) -> Option<u64> {
        self.entries.get(&category).copied()
    }

    /// True if the category may fire again at `current_turn`.
    pub fn ready(&self, category: EmergencyCategory, current_turn: u64, cooldown_turns: u64) -> bool {
        match self.last_triggered(category) {
            Some(last) => current_turn.saturating_sub(last) >= cooldown_turns,
            None => true,
        }
    }

    /// Records that the category fired on `current_turn`.
    pub fn mark(&mut self, category: EmergencyCategory, current_turn: u64) {
        self.entries.insert(category, current_turn);
    }

    /// Clears the cooldown for a category.
    pub fn reset(&mut self, category: EmergencyCategory) {
        self.entries.remove(&category);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
