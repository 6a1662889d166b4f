//! Engine Orchestration
//!
//! Advances the world one turn at a time: flush due consequences, apply
//! drift, scan for emergencies, synthesize missions, resolve AI actors in a
//! fixed order, and hand back a structured report. The player's mission is
//! left open for phase-by-phase input unless auto-resolution is enabled.
//!
//! Actor order within a turn is fixed and deterministic: government agencies,
//! then rival Traveler teams, then Faction cells, then the Director's routine
//! rotation, then the player slot.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;

use timeline_events::{
    Actor, EmergencyInstance, EngineSnapshot, Mission, PhaseResult, RoutineKind, SkillKind,
    TeamProfile, TurnReport, TurnStamp, WorldState,
};

use crate::config::EngineConfig;
use crate::consequence::ConsequenceScheduler;
use crate::detection::EmergencyDetector;
use crate::missions::{MissionExecutor, MissionGenerator, Trigger};

/// Player input for advancing one mission phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseAction {
    /// Optional unconventional approach: roll the phase on this skill.
    pub approach: Option<SkillKind>,
    /// Situational modifier granted by the presentation layer.
    pub bonus: i32,
}

/// Errors surfaced to the embedding layer. Nothing here is fatal.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown mission id: {0}")]
    UnknownMission(String),
    #[error("mission {0} is not awaiting player input")]
    NotAwaitingInput(String),
}

/// The threat-driven event/mission engine for one game session.
pub struct Engine {
    config: EngineConfig,
    world: WorldState,
    detector: EmergencyDetector,
    generator: MissionGenerator,
    executor: MissionExecutor,
    scheduler: ConsequenceScheduler,
    /// Every mission ever generated, oldest first; open missions included.
    history: Vec<Mission>,
    next_mission_seq: u64,
    stamp: TurnStamp,
    rng: SmallRng,
    /// When set, the player slot auto-resolves inside advance_turn.
    auto_resolve_player: bool,
}

impl Engine {
    /// Creates a fresh session with the given configuration and seed.
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        let detector = EmergencyDetector::new(config.detection.clone());
        let generator = MissionGenerator::new(config.missions.clone());
        let executor = MissionExecutor::new(config.missions.clone());
        Self {
            config,
            world: WorldState::new(),
            detector,
            generator,
            executor,
            scheduler: ConsequenceScheduler::new(),
            history: Vec::new(),
            next_mission_seq: 1,
            stamp: TurnStamp::start(),
            rng: SmallRng::seed_from_u64(seed),
            auto_resolve_player: false,
        }
    }

    /// Reconstructs a session from a persisted snapshot.
    ///
    /// The snapshot carries the complete engine state; `seed` starts the
    /// random stream for the turns ahead.
    pub fn restore(snapshot: EngineSnapshot, config: EngineConfig, seed: u64) -> Self {
        let detector = EmergencyDetector::from_parts(config.detection.clone(), snapshot.cooldowns);
        let generator = MissionGenerator::new(config.missions.clone());
        let executor = MissionExecutor::new(config.missions.clone());
        let stamp = stamp_for_turn(snapshot.world.turn_number);
        Self {
            config,
            world: snapshot.world,
            detector,
            generator,
            executor,
            scheduler: ConsequenceScheduler::from_pending(snapshot.pending_consequences),
            history: snapshot.mission_history,
            next_mission_seq: snapshot.next_mission_seq,
            stamp,
            rng: SmallRng::seed_from_u64(seed),
            auto_resolve_player: false,
        }
    }

    /// Captures the complete persistable state of the session.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            world: self.world.clone(),
            cooldowns: self.detector.cooldowns().clone(),
            mission_history: self.history.clone(),
            pending_consequences: self.scheduler.pending().to_vec(),
            next_mission_seq: self.next_mission_seq,
        }
    }

    /// Restarts the random stream from a fixed seed.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Enables or disables auto-resolution of the player slot.
    pub fn set_auto_resolve_player(&mut self, auto: bool) {
        self.auto_resolve_player = auto;
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &[Mission] {
        &self.history
    }

    pub fn stamp(&self) -> &TurnStamp {
        &self.stamp
    }

    /// The open player mission, if one is waiting on input.
    pub fn awaiting_player(&self) -> Option<&Mission> {
        self.history
            .iter()
            .rev()
            .find(|m| m.actor == Actor::PlayerTeam && m.is_open())
    }

    /// Capability profile for an actor.
    ///
    /// AI rosters are fixed; the player team comes from configuration.
    fn actor_team(&self, actor: Actor) -> TeamProfile {
        match actor {
            Actor::PlayerTeam => self.config.team,
            Actor::GovernmentAgency => TeamProfile {
                stealth: 4,
                combat: 5,
                technical: 5,
                intelligence: 7,
                social: 6,
                cohesion: 6,
                communication: 6,
            },
            Actor::RivalTeam => TeamProfile {
                stealth: 6,
                combat: 5,
                technical: 6,
                intelligence: 5,
                social: 4,
                cohesion: 5,
                communication: 6,
            },
            Actor::FactionCell => TeamProfile {
                stealth: 7,
                combat: 6,
                technical: 6,
                intelligence: 5,
                social: 3,
                cohesion: 4,
                communication: 4,
            },
        }
    }

    /// Synthesizes a mission for the trigger and logs it to the report.
    fn spawn_mission(
        &mut self,
        actor: Actor,
        trigger: Trigger<'_>,
        report: &mut TurnReport,
    ) -> Mission {
        let team = self.actor_team(actor);
        let mission = self.generator.generate(
            trigger,
            actor,
            &team,
            self.next_mission_seq,
            self.world.turn_number,
        );
        self.next_mission_seq += 1;
        report.missions_generated.push(mission.clone());
        mission
    }

    /// Generates, fully resolves, and records one AI mission.
    fn run_ai_mission(&mut self, actor: Actor, trigger: Trigger<'_>, report: &mut TurnReport) {
        let mut mission = self.spawn_mission(actor, trigger, report);
        let team = self.actor_team(actor);
        self.executor
            .auto_resolve(&mut mission, &team, &mut self.rng);
        let applied = self.scheduler.record(&mut self.world, &mission);
        report.effects_applied.extend(applied);
        report.missions_resolved.push(mission.clone());
        self.history.push(mission);
    }

    /// Opens (or auto-resolves) the player mission for the trigger.
    fn run_player_mission(&mut self, trigger: Trigger<'_>, report: &mut TurnReport) {
        if self.auto_resolve_player {
            self.run_ai_mission(Actor::PlayerTeam, trigger, report);
        } else {
            let mission = self.spawn_mission(Actor::PlayerTeam, trigger, report);
            self.history.push(mission);
        }
    }

    /// Once-per-turn inter-metric couplings, routed through the scheduler so
    /// the single-writer rule holds.
    fn apply_drift(&mut self, report: &mut TurnReport) {
        use timeline_events::{EffectDelta, MetricKind};

        let drift = &self.config.drift;
        if !drift.enabled {
            return;
        }

        let mut effects = Vec::new();
        if self.world.timeline_stability < drift.low_stability_threshold {
            effects.push((
                EffectDelta::new(MetricKind::GovernmentControl, -drift.government_erosion),
                0,
            ));
            effects.push((EffectDelta::new(MetricKind::FactionInfluence, drift.faction_gain), 0));
        }
        if self.world.faction_influence > drift.high_faction_threshold {
            effects.push((
                EffectDelta::new(MetricKind::TimelineStability, -drift.stability_erosion),
                0,
            ));
        }

        if !effects.is_empty() {
            let applied = self
                .scheduler
                .record_effects(&mut self.world, "world_drift", effects);
            report.effects_applied.extend(applied);
        }
    }

    /// Advances the world by one turn.
    ///
    /// Ordering inside the turn is part of the contract: consequences due
    /// this turn land before the scan, so thresholds see the rippled state.
    pub fn advance_turn(&mut self) -> TurnReport {
        self.world.turn_number += 1;
        self.stamp.advance_turn();
        let turn = self.world.turn_number;
        let mut report = TurnReport::new(self.stamp.clone());

        // 1. Flush consequences due this turn.
        let flushed = self.scheduler.flush(&mut self.world, turn, &self.history);
        report.effects_applied.extend(flushed);

        // 2. Inter-metric drift.
        self.apply_drift(&mut report);

        // 3. Scan for emergencies, highest severity first.
        let mut emergencies = self.detector.scan(&self.world, turn);
        emergencies.sort_by(|a, b| b.tier.cmp(&a.tier));
        report.emergencies = emergencies.clone();

        // The top emergency goes to the player team unless it is already
        // mid-mission; everything else is dispatched to rival teams.
        let player_busy = self.awaiting_player().is_some();
        let (player_emergency, rival_emergencies): (Option<&EmergencyInstance>, &[EmergencyInstance]) =
            if player_busy || emergencies.is_empty() {
                (None, &emergencies[..])
            } else {
                (Some(&emergencies[0]), &emergencies[1..])
            };

        // 4. Government agencies.
        if self.config.cadence.government_interval > 0
            && turn % self.config.cadence.government_interval == 0
        {
            self.run_ai_mission(
                Actor::GovernmentAgency,
                Trigger::Routine(RoutineKind::IntelligenceGathering),
                &mut report,
            );
        }

        // 5. Rival Traveler teams pick up the remaining emergencies.
        for instance in rival_emergencies.to_vec() {
            self.run_ai_mission(Actor::RivalTeam, Trigger::Emergency(&instance), &mut report);
        }

        // 6. Faction cells.
        if self.config.cadence.faction_interval > 0
            && turn % self.config.cadence.faction_interval == 0
        {
            self.run_ai_mission(
                Actor::FactionCell,
                Trigger::Routine(RoutineKind::SabotageOperation),
                &mut report,
            );
        }

        // 7. Player slot: emergency first, otherwise the routine rotation.
        if let Some(instance) = player_emergency.cloned() {
            self.run_player_mission(Trigger::Emergency(&instance), &mut report);
        } else if !player_busy
            && self.config.cadence.routine_interval > 0
            && turn % self.config.cadence.routine_interval == 0
        {
            let rotation = RoutineKind::DIRECTOR_ROTATION;
            let kind = rotation
                [((turn / self.config.cadence.routine_interval) as usize) % rotation.len()];
            self.run_player_mission(Trigger::Routine(kind), &mut report);
        }

        report.awaiting_player = self.awaiting_player().map(|m| m.id.clone());
        tracing::info!(
            turn,
            emergencies = report.emergencies.len(),
            resolved = report.missions_resolved.len(),
            "turn complete"
        );
        report
    }

    /// Advances one phase of an open player mission.
    ///
    /// Rejected without mutating anything if the id is unknown or the
    /// mission is not waiting on the player.
    pub fn submit_mission_action(
        &mut self,
        mission_id: &str,
        action: PhaseAction,
    ) -> Result<PhaseResult, EngineError> {
        let index = self
            .history
            .iter()
            .position(|m| m.id == mission_id)
            .ok_or_else(|| EngineError::UnknownMission(mission_id.to_string()))?;

        if self.history[index].actor != Actor::PlayerTeam || !self.history[index].is_open() {
            return Err(EngineError::NotAwaitingInput(mission_id.to_string()));
        }

        let team = self.config.team;
        let result = self
            .executor
            .resolve_next_phase(
                &mut self.history[index],
                &team,
                &mut self.rng,
                action.approach,
                action.bonus,
            )
            .ok_or_else(|| EngineError::NotAwaitingInput(mission_id.to_string()))?;

        if !self.history[index].is_open() {
            let mission = self.history[index].clone();
            self.scheduler.record(&mut self.world, &mission);
        }

        Ok(result)
    }
}

/// Rebuilds the calendar stamp for a turn counter.
fn stamp_for_turn(turn: u64) -> TurnStamp {
    let mut stamp = TurnStamp::start();
    for _ in 0..turn {
        stamp.advance_turn();
    }
    stamp
}
