//! Configuration loading for the engine.
//!
//! All tunables — thresholds, cooldowns, severity breakpoints, difficulty
//! tables, drift couplings — load from a TOML file. Every section has
//! defaults so a partial (or missing) file is fine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use timeline_events::{EmergencyCategory, SeverityTier, TeamProfile};

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Emergency detection settings
    pub detection: DetectionConfig,
    /// Mission difficulty settings
    pub missions: MissionConfig,
    /// Scheduling cadence for routine and AI activity
    pub cadence: CadenceConfig,
    /// Inter-metric drift couplings
    pub drift: DriftConfig,
    /// Player team capability profile
    pub team: TeamProfile,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Emergency detection configuration.
///
/// Threshold and cooldown maps are keyed by category name (e.g.
/// "timeline_collapse"); anything missing falls back to the built-in value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Per-category threshold overrides
    pub thresholds: HashMap<String, i32>,
    /// Per-category cooldown overrides, in turns
    pub cooldowns: HashMap<String, u64>,
    /// Cooldown applied when no override exists
    pub default_cooldown_turns: u64,
    /// Breach distance at which severity becomes severe
    pub severe_at: i32,
    /// Breach distance at which severity becomes critical
    pub critical_at: i32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            thresholds: HashMap::new(),
            cooldowns: HashMap::new(),
            default_cooldown_turns: 5,
            severe_at: 10,
            critical_at: 20,
        }
    }
}

impl DetectionConfig {
    /// Built-in threshold for a category.
    fn builtin_threshold(category: EmergencyCategory) -> i32 {
        match category {
            EmergencyCategory::TimelineCollapse => 30,
            EmergencyCategory::FactionTakeover => 80,
            EmergencyCategory::DirectorControlLoss => 20,
            EmergencyCategory::HostBodyRejection => 15,
            EmergencyCategory::ExposureCrisis => 85,
            EmergencyCategory::SecurityBreakdown => 25,
        }
    }

    /// Threshold for a category, honoring overrides.
    pub fn threshold(&self, category: EmergencyCategory) -> i32 {
        self.thresholds
            .get(&category.to_string())
            .copied()
            .unwrap_or_else(|| Self::builtin_threshold(category))
    }

    /// Cooldown in turns for a category, honoring overrides.
    pub fn cooldown(&self, category: EmergencyCategory) -> u64 {
        self.cooldowns
            .get(&category.to_string())
            .copied()
            .unwrap_or(self.default_cooldown_turns)
    }

    /// Severity tier for a breach this many points past the threshold.
    pub fn tier_for_distance(&self, distance: i32) -> SeverityTier {
        if distance >= self.critical_at {
            SeverityTier::Critical
        } else if distance >= self.severe_at {
            SeverityTier::Severe
        } else {
            SeverityTier::Moderate
        }
    }
}

/// Mission difficulty configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Die used for phase rolls
    pub die_sides: i32,
    /// Window below the DC that still counts as a partial
    pub partial_margin: i32,
    /// Base DC for moderate-tier emergencies
    pub moderate_dc: i32,
    /// Base DC for severe-tier emergencies
    pub severe_dc: i32,
    /// Base DC for critical-tier emergencies
    pub critical_dc: i32,
    /// Base DC for routine missions
    pub routine_dc: i32,
    /// Capability points per +1 DC; stronger teams face harder missions
    pub team_scaling_divisor: i32,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            die_sides: 20,
            partial_margin: 5,
            moderate_dc: 15,
            severe_dc: 20,
            critical_dc: 25,
            routine_dc: 12,
            team_scaling_divisor: 4,
        }
    }
}

impl MissionConfig {
    /// Base DC for an emergency of the given tier.
    pub fn tier_dc(&self, tier: SeverityTier) -> i32 {
        match tier {
            SeverityTier::Moderate => self.moderate_dc,
            SeverityTier::Severe => self.severe_dc,
            SeverityTier::Critical => self.critical_dc,
        }
    }
}

/// Cadence configuration for routine and AI actor activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Turns between routine player missions when no emergency claims the slot
    pub routine_interval: u64,
    /// Turns between government agency operations
    pub government_interval: u64,
    /// Turns between Faction cell operations
    pub faction_interval: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            routine_interval: 3,
            government_interval: 3,
            faction_interval: 4,
        }
    }
}

/// Inter-metric drift couplings, applied once per turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub enabled: bool,
    /// Below this, timeline instability erodes government control
    pub low_stability_threshold: i32,
    pub government_erosion: i32,
    pub faction_gain: i32,
    /// Above this, Faction influence erodes timeline stability
    pub high_faction_threshold: i32,
    pub stability_erosion: i32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            low_stability_threshold: 50,
            government_erosion: 2,
            faction_gain: 1,
            high_faction_threshold: 50,
            stability_erosion: 1,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Engine Configuration

[detection]
default_cooldown_turns = 5
severe_at = 10
critical_at = 20

[detection.thresholds]
timeline_collapse = 30
faction_takeover = 80
director_control_loss = 20
host_body_rejection = 15
exposure_crisis = 85
security_breakdown = 25

[missions]
die_sides = 20
partial_margin = 5
moderate_dc = 15
severe_dc = 20
critical_dc = 25
routine_dc = 12
team_scaling_divisor = 4

[cadence]
routine_interval = 3
government_interval = 3
faction_interval = 4

[drift]
enabled = true
low_stability_threshold = 50
government_erosion = 2
faction_gain = 1
high_faction_threshold = 50
stability_erosion = 1

[team]
stealth = 5
combat = 5
technical = 5
intelligence = 5
social = 5
cohesion = 5
communication = 5
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.detection.default_cooldown_turns, 5);
        assert_eq!(config.missions.die_sides, 20);
        assert_eq!(config.cadence.routine_interval, 3);
        assert!(config.drift.enabled);
    }

    #[test]
    fn test_builtin_thresholds() {
        let detection = DetectionConfig::default();

        assert_eq!(detection.threshold(EmergencyCategory::TimelineCollapse), 30);
        assert_eq!(detection.threshold(EmergencyCategory::FactionTakeover), 80);
        assert_eq!(detection.threshold(EmergencyCategory::HostBodyRejection), 15);
    }

    #[test]
    fn test_threshold_override() {
        let mut detection = DetectionConfig::default();
        detection
            .thresholds
            .insert("timeline_collapse".to_string(), 40);

        assert_eq!(detection.threshold(EmergencyCategory::TimelineCollapse), 40);
        // Others keep built-ins
        assert_eq!(detection.threshold(EmergencyCategory::FactionTakeover), 80);
    }

    #[test]
    fn test_cooldown_override() {
        let mut detection = DetectionConfig::default();
        detection.cooldowns.insert("exposure_crisis".to_string(), 9);

        assert_eq!(detection.cooldown(EmergencyCategory::ExposureCrisis), 9);
        assert_eq!(detection.cooldown(EmergencyCategory::TimelineCollapse), 5);
    }

    #[test]
    fn test_tier_for_distance() {
        let detection = DetectionConfig::default();

        assert_eq!(detection.tier_for_distance(0), SeverityTier::Moderate);
        assert_eq!(detection.tier_for_distance(9), SeverityTier::Moderate);
        assert_eq!(detection.tier_for_distance(10), SeverityTier::Severe);
        assert_eq!(detection.tier_for_distance(19), SeverityTier::Severe);
        assert_eq!(detection.tier_for_distance(22), SeverityTier::Critical);
    }

    #[test]
    fn test_tier_dc() {
        let missions = MissionConfig::default();

        assert_eq!(missions.tier_dc(SeverityTier::Moderate), 15);
        assert_eq!(missions.tier_dc(SeverityTier::Severe), 20);
        assert_eq!(missions.tier_dc(SeverityTier::Critical), 25);
    }

    #[test]
    fn test_parse_config_from_toml() {
        let toml = r#"
            [detection]
            default_cooldown_turns = 8

            [missions]
            critical_dc = 28

            [team]
            stealth = 7
        "#;

        let config = EngineConfig::from_toml_str(toml).unwrap();

        assert_eq!(config.detection.default_cooldown_turns, 8);
        assert_eq!(config.missions.critical_dc, 28);
        assert_eq!(config.team.stealth, 7);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
            [cadence]
            routine_interval = 5
        "#;

        let config = EngineConfig::from_toml_str(toml).unwrap();

        // Specified value
        assert_eq!(config.cadence.routine_interval, 5);
        // Default values
        assert_eq!(config.cadence.government_interval, 3);
        assert_eq!(config.missions.partial_margin, 5);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.detection.severe_at, 10);
    }

    #[test]
    fn test_default_config_toml_parses() {
        let toml = default_config_toml();
        let config = EngineConfig::from_toml_str(&toml).unwrap();

        assert_eq!(config.detection.threshold(EmergencyCategory::TimelineCollapse), 30);
        assert_eq!(config.missions.routine_dc, 12);
        assert_eq!(config.team.cohesion, 5);
    }

    #[test]
    fn test_config_to_toml_roundtrip() {
        let config = EngineConfig::default();
        let toml = config.to_toml().unwrap();
        let parsed = EngineConfig::from_toml_str(&toml).unwrap();

        assert_eq!(parsed.missions.die_sides, config.missions.die_sides);
        assert_eq!(
            parsed.detection.default_cooldown_turns,
            config.detection.default_cooldown_turns
        );
    }
}
