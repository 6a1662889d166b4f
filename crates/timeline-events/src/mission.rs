//! Mission Types
//!
//! Missions, their phase breakdown, and the per-phase roll results the
//! executor produces. These are pure records; resolution logic lives in the
//! core crate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::emergency::{EmergencyCategory, SeverityTier};

/// Generates a mission ID for the given sequence number.
///
/// IDs are sequential rather than random so a restored engine allocates the
/// same IDs as the original.
pub fn generate_mission_id(sequence: u64) -> String {
    format!("msn_{:06}", sequence)
}

/// One sub-stage of a mission, resolved independently via a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Infiltration,
    Execution,
    Extraction,
}

impl PhaseKind {
    /// The skill a phase of this kind leans on by default.
    pub fn default_skill(&self) -> SkillKind {
        match self {
            PhaseKind::Infiltration => SkillKind::Stealth,
            PhaseKind::Execution => SkillKind::Technical,
            PhaseKind::Extraction => SkillKind::Combat,
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhaseKind::Infiltration => "infiltration",
            PhaseKind::Execution => "execution",
            PhaseKind::Extraction => "extraction",
        };
        write!(f, "{}", name)
    }
}

/// Team skill used to modify a phase roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Stealth,
    Combat,
    Technical,
    Intelligence,
    Social,
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkillKind::Stealth => "stealth",
            SkillKind::Combat => "combat",
            SkillKind::Technical => "technical",
            SkillKind::Intelligence => "intelligence",
            SkillKind::Social => "social",
        };
        write!(f, "{}", name)
    }
}

/// Classification of a single phase roll.
///
/// Ordered from worst to best so aggregation can compare tiers directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    CriticalFailure,
    Failure,
    Partial,
    Success,
    CriticalSuccess,
}

/// Final classification of a completed mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalOutcome {
    Success,
    PartialSuccess,
    Failure,
}

impl fmt::Display for TerminalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminalOutcome::Success => "success",
            TerminalOutcome::PartialSuccess => "partial_success",
            TerminalOutcome::Failure => "failure",
        };
        write!(f, "{}", name)
    }
}

/// Routine (non-emergency) mission flavors on the Director's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineKind {
    IntelligenceGathering,
    MaintenanceOperation,
    ProtocolEnforcement,
    /// Faction-side disruption work; never on the Director's schedule.
    SabotageOperation,
}

impl RoutineKind {
    /// Kinds the Director cycles through on the routine cadence.
    pub const DIRECTOR_ROTATION: [RoutineKind; 3] = [
        RoutineKind::IntelligenceGathering,
        RoutineKind::MaintenanceOperation,
        RoutineKind::ProtocolEnforcement,
    ];
}

/// The independent trigger sources that run inside a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    PlayerTeam,
    GovernmentAgency,
    RivalTeam,
    FactionCell,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Actor::PlayerTeam => "player_team",
            Actor::GovernmentAgency => "government_agency",
            Actor::RivalTeam => "rival_team",
            Actor::FactionCell => "faction_cell",
        };
        write!(f, "{}", name)
    }
}

/// What caused a mission to exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissionOrigin {
    Emergency {
        category: EmergencyCategory,
        tier: SeverityTier,
    },
    Routine {
        routine: RoutineKind,
    },
}

/// One planned phase: what is attempted and which skill carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub kind: PhaseKind,
    pub skill: SkillKind,
    /// How heavily the skill counts toward the roll modifier.
    pub weight: f32,
}

impl PhaseSpec {
    pub fn new(kind: PhaseKind, skill: SkillKind, weight: f32) -> Self {
        Self { kind, skill, weight }
    }
}

/// Full numeric breakdown of one resolved phase.
///
/// The engine always reports the numbers; hiding them from the player is the
/// narrator layer's call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub phase: PhaseKind,
    pub skill: SkillKind,
    /// Raw die face, 1..=sides.
    pub roll: i32,
    pub modifier: i32,
    pub total: i32,
    pub dc: i32,
    pub margin: i32,
    pub tier: OutcomeTier,
}

/// Lifecycle state of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    /// Created, no phase resolved yet.
    Pending,
    /// At least one phase resolved, more remain.
    InProgress,
    /// All phases resolved (or short-circuited); `outcome` is set.
    Resolved,
}

/// A synthesized mission working through its phase sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub origin: MissionOrigin,
    pub actor: Actor,
    /// Machine-readable objective tag, e.g. "stabilize_timeline".
    pub objective: String,
    pub phases: Vec<PhaseSpec>,
    /// Difficulty baseline the executor derives per-phase DCs from.
    pub difficulty: i32,
    pub status: MissionStatus,
    pub phase_results: Vec<PhaseResult>,
    pub outcome: Option<TerminalOutcome>,
    pub created_turn: u64,
}

impl Mission {
    /// Index of the next unresolved phase.
    pub fn next_phase_index(&self) -> usize {
        self.phase_results.len()
    }

    /// The next phase to resolve, if the mission is still open.
    pub fn current_phase(&self) -> Option<&PhaseSpec> {
        if self.status == MissionStatus::Resolved {
            return None;
        }
        self.phases.get(self.next_phase_index())
    }

    /// True while the mission can still accept a phase resolution.
    pub fn is_open(&self) -> bool {
        self.status != MissionStatus::Resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mission() -> Mission {
        Mission {
            id: generate_mission_id(7),
            origin: MissionOrigin::Emergency {
                category: EmergencyCategory::TimelineCollapse,
                tier: SeverityTier::Critical,
            },
            actor: Actor::PlayerTeam,
            objective: "stabilize_timeline".to_string(),
            phases: vec![
                PhaseSpec::new(PhaseKind::Infiltration, SkillKind::Stealth, 1.0),
                PhaseSpec::new(PhaseKind::Execution, SkillKind::Technical, 1.0),
                PhaseSpec::new(PhaseKind::Extraction, SkillKind::Combat, 0.8),
            ],
            difficulty: 20,
            status: MissionStatus::Pending,
            phase_results: Vec::new(),
            outcome: None,
            created_turn: 4,
        }
    }

    #[test]
    fn test_mission_id_format() {
        assert_eq!(generate_mission_id(42), "msn_000042");
    }

    #[test]
    fn test_outcome_tier_ordering() {
        assert!(OutcomeTier::CriticalSuccess > OutcomeTier::Success);
        assert!(OutcomeTier::Success > OutcomeTier::Partial);
        assert!(OutcomeTier::Partial > OutcomeTier::Failure);
        assert!(OutcomeTier::Failure > OutcomeTier::CriticalFailure);
    }

    #[test]
    fn test_current_phase_walks_sequence() {
        let mut mission = sample_mission();
        assert_eq!(mission.current_phase().unwrap().kind, PhaseKind::Infiltration);

        mission.phase_results.push(PhaseResult {
            phase: PhaseKind::Infiltration,
            skill: SkillKind::Stealth,
            roll: 12,
            modifier: 3,
            total: 15,
            dc: 15,
            margin: 5,
            tier: OutcomeTier::Success,
        });
        mission.status = MissionStatus::InProgress;
        assert_eq!(mission.current_phase().unwrap().kind, PhaseKind::Execution);
    }

    #[test]
    fn test_resolved_mission_has_no_current_phase() {
        let mut mission = sample_mission();
        mission.status = MissionStatus::Resolved;
        mission.outcome = Some(TerminalOutcome::Failure);
        assert!(mission.current_phase().is_none());
        assert!(!mission.is_open());
    }

    #[test]
    fn test_default_skill_per_phase() {
        assert_eq!(PhaseKind::Infiltration.default_skill(), SkillKind::Stealth);
        assert_eq!(PhaseKind::Execution.default_skill(), SkillKind::Technical);
        assert_eq!(PhaseKind::Extraction.default_skill(), SkillKind::Combat);
    }

    #[test]
    fn test_origin_serialization() {
        let origin = MissionOrigin::Emergency {
            category: EmergencyCategory::FactionTakeover,
            tier: SeverityTier::Severe,
        };
        let json = serde_json::to_string(&origin).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"emergency","category":"faction_takeover","tier":"severe"}"#
        );
    }

    #[test]
    fn test_mission_serde_roundtrip() {
        let mission = sample_mission();
        let json = serde_json::to_string(&mission).unwrap();
        let parsed: Mission = serde_json::from_str(&json).unwrap();
        assert_eq!(mission, parsed);
    }
}
