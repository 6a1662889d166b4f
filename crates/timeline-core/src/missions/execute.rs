//! Mission Execution
//!
//! Runs a mission through its phase state machine. Each phase gets a DC from
//! the mission difficulty and phase kind, a modifier from the team's weighted
//! skill plus cohesion and communication, and one roll. A critical failure
//! short-circuits every remaining phase; the aggregation of phase tiers into
//! a terminal outcome is deterministic.

use rand::Rng;

use timeline_events::{
    Mission, MissionStatus, OutcomeTier, PhaseKind, PhaseResult, SkillKind, TeamProfile,
    TerminalOutcome,
};

use crate::config::MissionConfig;
use crate::rolls;

/// DC offset for the execution phase: the hardest stretch of any operation.
const EXECUTION_DC_OFFSET: i32 = 2;
/// DC offset for the extraction phase.
const EXTRACTION_DC_OFFSET: i32 = 1;

/// Resolves mission phases with rolls.
pub struct MissionExecutor {
    config: MissionConfig,
}

impl MissionExecutor {
    pub fn new(config: MissionConfig) -> Self {
        Self { config }
    }

    /// DC for one phase of the mission.
    fn phase_dc(&self, mission: &Mission, kind: PhaseKind) -> i32 {
        let offset = match kind {
            PhaseKind::Infiltration => 0,
            PhaseKind::Execution => EXECUTION_DC_OFFSET,
            PhaseKind::Extraction => EXTRACTION_DC_OFFSET,
        };
        mission.difficulty + offset
    }

    /// Roll modifier for a phase: weighted skill plus team bonuses.
    fn phase_modifier(
        &self,
        team: &TeamProfile,
        skill: SkillKind,
        weight: f32,
        extra: i32,
    ) -> i32 {
        let skill_part = (team.skill(skill) as f32 * weight).round() as i32;
        skill_part + team.cohesion / 2 + team.communication / 3 + extra
    }

    /// Resolves the next pending phase of an open mission.
    ///
    /// Returns None if the mission is already resolved. `skill_override` lets
    /// a player pick an unconventional approach; `extra_modifier` carries
    /// situational bonuses or penalties.
    pub fn resolve_next_phase(
        &self,
        mission: &mut Mission,
        team: &TeamProfile,
        rng: &mut impl Rng,
        skill_override: Option<SkillKind>,
        extra_modifier: i32,
    ) -> Option<PhaseResult> {
        let spec = mission.current_phase()?.clone();
        let skill = skill_override.unwrap_or(spec.skill);
        let dc = self.phase_dc(mission, spec.kind);
        let margin = self.config.partial_margin;
        let modifier = self.phase_modifier(team, skill, spec.weight, extra_modifier);

        let (roll, tier) =
            rolls::resolve(rng, self.config.die_sides, modifier, dc, margin);
        tracing::debug!(
            mission = %mission.id,
            phase = %spec.kind,
            raw = roll.raw,
            modifier,
            total = roll.total,
            dc,
            ?tier,
            "phase resolved"
        );

        let result = PhaseResult {
            phase: spec.kind,
            skill,
            roll: roll.raw,
            modifier,
            total: roll.total,
            dc,
            margin,
            tier,
        };
        record_phase_result(mission, result.clone());
        Some(result)
    }

    /// Resolves every remaining phase and returns the terminal outcome.
    pub fn auto_resolve(
        &self,
        mission: &mut Mission,
        team: &TeamProfile,
        rng: &mut impl Rng,
    ) -> TerminalOutcome {
        while mission.is_open() {
            if self.resolve_next_phase(mission, team, rng, None, 0).is_none() {
                break;
            }
        }
        // is_open() only goes false once record_phase_result sets an outcome.
        mission.outcome.unwrap_or(TerminalOutcome::Failure)
    }
}

/// Applies one phase result to the mission's state machine.
///
/// A critical failure forces the terminal state to Failure and abandons the
/// remaining phases; otherwise the mission advances, and once the last phase
/// lands the terminal outcome is aggregated: Success only if every phase
/// came in at success or better, PartialSuccess for any shortfall.
pub fn record_phase_result(mission: &mut Mission, result: PhaseResult) {
    let tier = result.tier;
    mission.phase_results.push(result);

    if tier == OutcomeTier::CriticalFailure {
        mission.status = MissionStatus::Resolved;
        mission.outcome = Some(TerminalOutcome::Failure);
        return;
    }

    if mission.phase_results.len() >= mission.phases.len() {
        mission.status = MissionStatus::Resolved;
        mission.outcome = Some(aggregate(&mission.phase_results));
    } else {
        mission.status = MissionStatus::InProgress;
    }
}

/// Deterministic aggregation of phase tiers into a terminal outcome.
fn aggregate(results: &[PhaseResult]) -> TerminalOutcome {
    if results
        .iter()
        .any(|r| r.tier == OutcomeTier::CriticalFailure)
    {
        return TerminalOutcome::Failure;
    }
    if results.iter().all(|r| r.tier >= OutcomeTier::Success) {
        TerminalOutcome::Success
    } else {
        TerminalOutcome::PartialSuccess
    }
}
