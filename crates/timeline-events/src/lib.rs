//! Shared data types and serialization for the timeline simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod calendar;
pub mod consequence;
pub mod emergency;
pub mod mission;
pub mod report;
pub mod snapshot;
pub mod team;
pub mod world;

// Re-export calendar types
pub use calendar::{GameDate, ParseDateError, TurnStamp, CAMPAIGN_START};

// Re-export world types
pub use world::{MetricKind, WorldState, METRIC_MAX, METRIC_MIN};

// Re-export emergency types
pub use emergency::{
    BreachDirection, CooldownTable, EmergencyCategory, EmergencyInstance, SeverityTier,
};

// Re-export mission types
pub use mission::{
    generate_mission_id, Actor, Mission, MissionOrigin, MissionStatus, OutcomeTier, PhaseKind,
    PhaseResult, PhaseSpec, RoutineKind, SkillKind, TerminalOutcome,
};

// Re-export team types
pub use team::TeamProfile;

// Re-export consequence types
pub use consequence::{ConsequenceEntry, EffectDelta};

// Re-export report types
pub use report::{AppliedEffect, TurnReport};

// Re-export snapshot types
pub use snapshot::EngineSnapshot;
