//! Mission Generation
//!
//! Synthesizes a mission from a trigger: either a detected emergency or a
//! routine slot on the Director's schedule. Phase sequences and skill weights
//! come from a template registry keyed by trigger kind; difficulty scales
//! with threat severity and with the assigned team's capability so stronger
//! teams face proportionally harder work.

use std::collections::HashMap;

use timeline_events::{
    generate_mission_id, Actor, EmergencyCategory, EmergencyInstance, Mission, MissionOrigin,
    MissionStatus, PhaseKind, PhaseSpec, RoutineKind, SkillKind, TeamProfile,
};

use crate::config::MissionConfig;

/// What a mission is generated in response to.
#[derive(Debug, Clone, Copy)]
pub enum Trigger<'a> {
    Emergency(&'a EmergencyInstance),
    Routine(RoutineKind),
}

/// Registry key for mission templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    Emergency(EmergencyCategory),
    Routine(RoutineKind),
}

/// Blueprint for one mission shape.
#[derive(Debug, Clone)]
pub struct MissionTemplate {
    /// Machine-readable objective tag.
    pub objective: &'static str,
    pub phases: Vec<PhaseSpec>,
}

impl MissionTemplate {
    fn new(objective: &'static str, phases: Vec<PhaseSpec>) -> Self {
        Self { objective, phases }
    }
}

/// Builds the built-in template registry.
pub fn default_templates() -> HashMap<TemplateKey, MissionTemplate> {
    use PhaseKind::*;
    use SkillKind::*;

    let mut templates = HashMap::new();

    templates.insert(
        TemplateKey::Emergency(EmergencyCategory::TimelineCollapse),
        MissionTemplate::new(
            "stabilize_timeline",
            vec![
                PhaseSpec::new(Infiltration, Stealth, 1.0),
                PhaseSpec::new(Execution, Technical, 1.2),
                PhaseSpec::new(Extraction, Combat, 0.8),
            ],
        ),
    );
    templates.insert(
        TemplateKey::Emergency(EmergencyCategory::FactionTakeover),
        MissionTemplate::new(
            "counter_faction_operations",
            vec![
                PhaseSpec::new(Infiltration, Stealth, 1.0),
                PhaseSpec::new(Execution, Combat, 1.0),
                PhaseSpec::new(Extraction, Stealth, 0.8),
            ],
        ),
    );
    templates.insert(
        TemplateKey::Emergency(EmergencyCategory::DirectorControlLoss),
        MissionTemplate::new(
            "restore_director_channels",
            vec![
                PhaseSpec::new(Infiltration, Technical, 1.0),
                PhaseSpec::new(Execution, Technical, 1.2),
            ],
        ),
    );
    templates.insert(
        TemplateKey::Emergency(EmergencyCategory::HostBodyRejection),
        MissionTemplate::new(
            "emergency_consciousness_transfer",
            vec![
                PhaseSpec::new(Execution, Technical, 1.2),
                PhaseSpec::new(Extraction, Social, 0.8),
            ],
        ),
    );
    templates.insert(
        TemplateKey::Emergency(EmergencyCategory::ExposureCrisis),
        MissionTemplate::new(
            "suppress_public_exposure",
            vec![
                PhaseSpec::new(Infiltration, Stealth, 1.2),
                PhaseSpec::new(Execution, Social, 1.0),
                PhaseSpec::new(Extraction, Stealth, 1.0),
            ],
        ),
    );
    templates.insert(
        TemplateKey::Emergency(EmergencyCategory::SecurityBreakdown),
        MissionTemplate::new(
            "shore_up_institutions",
            vec![
                PhaseSpec::new(Infiltration, Social, 1.0),
                PhaseSpec::new(Execution, Intelligence, 1.0),
            ],
        ),
    );

    templates.insert(
        TemplateKey::Routine(RoutineKind::IntelligenceGathering),
        MissionTemplate::new(
            "gather_field_intelligence",
            vec![
                PhaseSpec::new(Infiltration, Stealth, 1.0),
                PhaseSpec::new(Execution, Intelligence, 1.0),
            ],
        ),
    );
    templates.insert(
        TemplateKey::Routine(RoutineKind::MaintenanceOperation),
        MissionTemplate::new(
            "maintain_operational_cover",
            vec![PhaseSpec::new(Execution, Technical, 1.0)],
        ),
    );
    templates.insert(
        TemplateKey::Routine(RoutineKind::ProtocolEnforcement),
        MissionTemplate::new(
            "enforce_protocols",
            vec![
                PhaseSpec::new(Execution, Social, 1.0),
                PhaseSpec::new(Extraction, Stealth, 0.6),
            ],
        ),
    );
    templates.insert(
        TemplateKey::Routine(RoutineKind::SabotageOperation),
        MissionTemplate::new(
            "disrupt_critical_infrastructure",
            vec![
                PhaseSpec::new(Infiltration, Stealth, 1.0),
                PhaseSpec::new(Execution, Technical, 1.0),
                PhaseSpec::new(Extraction, Combat, 1.0),
            ],
        ),
    );

    templates
}

/// Synthesizes missions from triggers.
pub struct MissionGenerator {
    config: MissionConfig,
    templates: HashMap<TemplateKey, MissionTemplate>,
}

impl MissionGenerator {
    pub fn new(config: MissionConfig) -> Self {
        Self::with_templates(config, default_templates())
    }

    /// Creates a generator with a custom template registry.
    pub fn with_templates(
        config: MissionConfig,
        templates: HashMap<TemplateKey, MissionTemplate>,
    ) -> Self {
        Self { config, templates }
    }

    /// Last-resort template when the registry has a gap.
    fn fallback_template() -> MissionTemplate {
        MissionTemplate::new(
            "routine_operation",
            vec![PhaseSpec::new(PhaseKind::Execution, SkillKind::Technical, 1.0)],
        )
    }

    /// Difficulty baseline for a trigger, adjusted for team capability.
    ///
    /// The capability adjustment keeps difficulty tracking the threat: a
    /// stronger team gets a harder DC, not a trivialized mission.
    fn difficulty(&self, trigger: Trigger<'_>, team: &TeamProfile) -> i32 {
        let base = match trigger {
            Trigger::Emergency(instance) => self.config.tier_dc(instance.tier),
            Trigger::Routine(_) => self.config.routine_dc,
        };
        let adjustment =
            (team.capability_rating() + team.cohesion) / self.config.team_scaling_divisor.max(1);
        base + adjustment
    }

    /// Builds a fully formed mission for the trigger.
    ///
    /// A missing template is a configuration gap, not a player-visible
    /// error: it is logged and the generic fallback is used instead.
    pub fn generate(
        &self,
        trigger: Trigger<'_>,
        actor: Actor,
        team: &TeamProfile,
        sequence: u64,
        current_turn: u64,
    ) -> Mission {
        let (key, origin) = match trigger {
            Trigger::Emergency(instance) => (
                TemplateKey::Emergency(instance.category),
                MissionOrigin::Emergency {
                    category: instance.category,
                    tier: instance.tier,
                },
            ),
            Trigger::Routine(kind) => (
                TemplateKey::Routine(kind),
                MissionOrigin::Routine { routine: kind },
            ),
        };

        let fallback;
        let template = match self.templates.get(&key) {
            Some(t) => t,
            None => {
                tracing::warn!(?key, "no mission template for trigger; using fallback");
                fallback = Self::fallback_template();
                &fallback
            }
        };

        Mission {
            id: generate_mission_id(sequence),
            origin,
            actor,
            objective: template.objective.to_string(),
            phases: template.phases.clone(),
            difficulty: self.difficulty(trigger, team),
            status: MissionStatus::Pending,
            phase_results: Vec::new(),
            outcome: None,
            created_turn: current_turn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline_events::SeverityTier;

    fn emergency(tier: SeverityTier) -> EmergencyInstance {
        EmergencyInstance {
            category: EmergencyCategory::TimelineCollapse,
            trigger_value: 8,
            tier,
            detected_turn: 1,
        }
    }

    #[test]
    fn test_registry_covers_all_triggers() {
        let templates = default_templates();
        for category in EmergencyCategory::ALL {
            assert!(
                templates.contains_key(&TemplateKey::Emergency(category)),
                "missing template for {}",
                category
            );
        }
        assert!(templates.contains_key(&TemplateKey::Routine(RoutineKind::SabotageOperation)));
    }

    #[test]
    fn test_every_template_has_at_least_one_phase() {
        for template in default_templates().values() {
            assert!(!template.phases.is_empty());
        }
    }

    #[test]
    fn test_emergency_mission_shape() {
        let generator = MissionGenerator::new(MissionConfig::default());
        let instance = emergency(SeverityTier::Critical);
        let mission = generator.generate(
            Trigger::Emergency(&instance),
            Actor::PlayerTeam,
            &TeamProfile::default(),
            1,
            4,
        );

        assert_eq!(mission.id, "msn_000001");
        assert_eq!(mission.objective, "stabilize_timeline");
        assert_eq!(mission.phases.len(), 3);
        assert_eq!(mission.status, MissionStatus::Pending);
        assert_eq!(mission.created_turn, 4);
        assert_eq!(
            mission.origin,
            MissionOrigin::Emergency {
                category: EmergencyCategory::TimelineCollapse,
                tier: SeverityTier::Critical,
            }
        );
    }

    #[test]
    fn test_difficulty_scales_with_tier() {
        let generator = MissionGenerator::new(MissionConfig::default());
        let team = TeamProfile::default();

        let moderate = emergency(SeverityTier::Moderate);
        let critical = emergency(SeverityTier::Critical);
        let d_moderate = generator
            .generate(Trigger::Emergency(&moderate), Actor::PlayerTeam, &team, 1, 1)
            .difficulty;
        let d_critical = generator
            .generate(Trigger::Emergency(&critical), Actor::PlayerTeam, &team, 2, 1)
            .difficulty;

        assert!(d_critical > d_moderate);
    }

    #[test]
    fn test_stronger_team_faces_harder_dc() {
        let generator = MissionGenerator::new(MissionConfig::default());
        let instance = emergency(SeverityTier::Severe);

        let weak = TeamProfile {
            stealth: 2,
            combat: 2,
            technical: 2,
            intelligence: 2,
            social: 2,
            cohesion: 2,
            communication: 2,
        };
        let strong = TeamProfile {
            stealth: 9,
            combat: 9,
            technical: 9,
            intelligence: 9,
            social: 9,
            cohesion: 9,
            communication: 9,
        };

        let d_weak = generator
            .generate(Trigger::Emergency(&instance), Actor::PlayerTeam, &weak, 1, 1)
            .difficulty;
        let d_strong = generator
            .generate(Trigger::Emergency(&instance), Actor::PlayerTeam, &strong, 2, 1)
            .difficulty;

        assert!(d_strong > d_weak);
    }

    #[test]
    fn test_routine_mission_uses_routine_dc() {
        let generator = MissionGenerator::new(MissionConfig::default());
        let mission = generator.generate(
            Trigger::Routine(RoutineKind::MaintenanceOperation),
            Actor::PlayerTeam,
            &TeamProfile::default(),
            3,
            9,
        );

        assert_eq!(mission.objective, "maintain_operational_cover");
        // routine_dc 12 + (5 + 5) / 4
        assert_eq!(mission.difficulty, 14);
    }

    #[test]
    fn test_missing_template_falls_back() {
        // Empty registry: every lookup is a configuration gap.
        let generator =
            MissionGenerator::with_templates(MissionConfig::default(), HashMap::new());
        let instance = emergency(SeverityTier::Moderate);
        let mission = generator.generate(
            Trigger::Emergency(&instance),
            Actor::PlayerTeam,
            &TeamProfile::default(),
            1,
            1,
        );

        // Still a usable mission, never an error.
        assert_eq!(mission.objective, "routine_operation");
        assert_eq!(mission.phases.len(), 1);
    }
}
