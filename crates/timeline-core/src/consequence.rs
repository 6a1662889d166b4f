//! Consequence Scheduling
//!
//! Translates resolved missions into world-state deltas. Immediate deltas
//! land synchronously; delayed deltas queue against a future turn and apply
//! exactly once, in FIFO order, even if several turns pass between flushes.

use timeline_events::{
    AppliedEffect, Actor, BreachDirection, ConsequenceEntry, EffectDelta, EmergencyCategory,
    MetricKind, Mission, MissionOrigin, RoutineKind, SeverityTier, TerminalOutcome, WorldState,
};

/// An effect with the number of turns it lags behind the outcome.
/// Delay 0 means immediate.
type TimedEffect = (EffectDelta, u64);

/// Multiplier applied to emergency effects per severity tier.
fn tier_scale(tier: SeverityTier) -> i32 {
    match tier {
        SeverityTier::Moderate => 1,
        SeverityTier::Severe => 2,
        SeverityTier::Critical => 3,
    }
}

/// Signed unit that moves a category's metric away from danger.
fn toward_safety(category: EmergencyCategory) -> i32 {
    match category.direction() {
        BreachDirection::Below => 1,
        BreachDirection::Above => -1,
    }
}

/// Effect table for emergency-driven missions.
fn emergency_effects(
    category: EmergencyCategory,
    tier: SeverityTier,
    outcome: TerminalOutcome,
) -> Vec<TimedEffect> {
    let metric = category.metric();
    let safety = toward_safety(category);
    let scale = tier_scale(tier);

    match outcome {
        TerminalOutcome::Success => vec![
            (EffectDelta::new(metric, safety * (4 + 4 * scale)), 0),
            // Stabilization keeps paying off as the correction settles in.
            (EffectDelta::new(metric, safety * 2 * scale), 3),
        ],
        TerminalOutcome::PartialSuccess => vec![
            (EffectDelta::new(metric, safety * 2 * scale), 0),
            (EffectDelta::new(MetricKind::ExposureRisk, 2), 1),
        ],
        TerminalOutcome::Failure => vec![
            (EffectDelta::new(metric, -safety * (3 + scale)), 0),
            // Federal response, then forensics.
            (EffectDelta::new(MetricKind::ExposureRisk, 6), 1),
            (EffectDelta::new(MetricKind::ExposureRisk, 4), 2),
        ],
    }
}

/// Effect table for routine missions, keyed by the acting faction.
fn routine_effects(actor: Actor, kind: RoutineKind, outcome: TerminalOutcome) -> Vec<TimedEffect> {
    use MetricKind::*;
    use TerminalOutcome::*;

    match (actor, kind) {
        // Government investigations: success closes in on everyone.
        (Actor::GovernmentAgency, _) => match outcome {
            Success => vec![
                (EffectDelta::new(NationalSecurity, 3), 0),
                (EffectDelta::new(ExposureRisk, 4), 0),
            ],
            PartialSuccess => vec![
                (EffectDelta::new(NationalSecurity, 1), 0),
                (EffectDelta::new(ExposureRisk, 2), 0),
            ],
            Failure => vec![(EffectDelta::new(NationalSecurity, -2), 0)],
        },
        // Faction operations work against the Director.
        (Actor::FactionCell, _) => match outcome {
            Success => vec![
                (EffectDelta::new(FactionInfluence, 5), 0),
                (EffectDelta::new(TimelineStability, -4), 0),
                (EffectDelta::new(TimelineStability, -2), 2),
            ],
            PartialSuccess => vec![
                (EffectDelta::new(FactionInfluence, 2), 0),
                (EffectDelta::new(TimelineStability, -1), 0),
            ],
            Failure => vec![
                (EffectDelta::new(FactionInfluence, -3), 0),
                (EffectDelta::new(NationalSecurity, 2), 0),
            ],
        },
        // Director-side teams on the routine rotation.
        (_, RoutineKind::IntelligenceGathering) => match outcome {
            Success => vec![
                (EffectDelta::new(ExposureRisk, -3), 0),
                (EffectDelta::new(NationalSecurity, 1), 0),
            ],
            PartialSuccess => vec![(EffectDelta::new(ExposureRisk, -1), 0)],
            Failure => vec![(EffectDelta::new(ExposureRisk, 2), 1)],
        },
        (_, RoutineKind::MaintenanceOperation) => match outcome {
            Success => vec![
                (EffectDelta::new(HostBodyIntegrity, 2), 0),
                (EffectDelta::new(TimelineStability, 1), 0),
            ],
            PartialSuccess => vec![(EffectDelta::new(HostBodyIntegrity, 1), 0)],
            Failure => vec![(EffectDelta::new(HostBodyIntegrity, -2), 0)],
        },
        (_, RoutineKind::ProtocolEnforcement) => match outcome {
            Success => vec![(EffectDelta::new(GovernmentControl, 2), 0)],
            PartialSuccess => vec![(EffectDelta::new(GovernmentControl, 1), 0)],
            Failure => vec![
                (EffectDelta::new(GovernmentControl, -1), 0),
                (EffectDelta::new(ExposureRisk, 2), 1),
            ],
        },
        // Sabotage in Director-side hands only happens via configuration
        // gaps; treat it as maintenance gone strange.
        (_, RoutineKind::SabotageOperation) => match outcome {
            Success => vec![(EffectDelta::new(TimelineStability, 1), 0)],
            PartialSuccess => vec![],
            Failure => vec![(EffectDelta::new(ExposureRisk, 1), 0)],
        },
    }
}

/// Looks up the timed effects for a resolved mission.
pub fn effects_for(mission: &Mission) -> Vec<TimedEffect> {
    let Some(outcome) = mission.outcome else {
        return Vec::new();
    };
    match &mission.origin {
        MissionOrigin::Emergency { category, tier } => {
            emergency_effects(*category, *tier, outcome)
        }
        MissionOrigin::Routine { routine } => routine_effects(mission.actor, *routine, outcome),
    }
}

/// Turn-indexed queue of pending world-state effects.
pub struct ConsequenceScheduler {
    pending: Vec<ConsequenceEntry>,
}

impl ConsequenceScheduler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Rebuilds a scheduler from a persisted queue.
    pub fn from_pending(pending: Vec<ConsequenceEntry>) -> Self {
        Self { pending }
    }

    /// The pending queue, for snapshotting.
    pub fn pending(&self) -> &[ConsequenceEntry] {
        &self.pending
    }

    /// Records a resolved mission's consequences.
    ///
    /// Immediate deltas are applied to the world before this returns; delayed
    /// deltas are queued against `world.turn_number + delay`.
    pub fn record(&mut self, world: &mut WorldState, mission: &Mission) -> Vec<AppliedEffect> {
        self.record_effects(world, &mission.id, effects_for(mission))
    }

    /// Records arbitrary timed effects from a named source.
    pub fn record_effects(
        &mut self,
        world: &mut WorldState,
        source: &str,
        effects: Vec<TimedEffect>,
    ) -> Vec<AppliedEffect> {
        let mut applied = Vec::new();
        for (delta, delay) in effects {
            if delay == 0 {
                let resulting_value = world.apply_delta(delta.metric, delta.amount);
                applied.push(AppliedEffect {
                    metric: delta.metric,
                    amount: delta.amount,
                    resulting_value,
                    source: source.to_string(),
                });
            } else {
                self.pending.push(ConsequenceEntry::new(
                    vec![delta],
                    world.turn_number + delay,
                    source,
                ));
            }
        }
        applied
    }

    /// Applies every queued entry due on or before `current_turn`.
    ///
    /// Entries fire in insertion order and are removed as they fire, so each
    /// applies exactly once even when flushes skip turns. An entry whose
    /// source mission is missing from history is a data-integrity warning but
    /// still applies: effects are state-scoped, not mission-scoped.
    pub fn flush(
        &mut self,
        world: &mut WorldState,
        current_turn: u64,
        history: &[Mission],
    ) -> Vec<AppliedEffect> {
        let mut applied = Vec::new();
        let mut remaining = Vec::new();

        for entry in self.pending.drain(..) {
            if !entry.due(current_turn) {
                remaining.push(entry);
                continue;
            }
            let mission_scoped = entry.source.starts_with("msn_");
            if mission_scoped && !history.iter().any(|m| m.id == entry.source) {
                tracing::warn!(
                    source = %entry.source,
                    "queued consequence references a mission missing from history"
                );
            }
            for delta in &entry.deltas {
                let resulting_value = world.apply_delta(delta.metric, delta.amount);
                applied.push(AppliedEffect {
                    metric: delta.metric,
                    amount: delta.amount,
                    resulting_value,
                    source: entry.source.clone(),
                });
            }
        }

        self.pending = remaining;
        applied
    }
}

impl Default for ConsequenceScheduler {
    fn default() -> Self {
        Self::new()
    }
}
