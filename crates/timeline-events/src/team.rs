//! Team Capability Profile
//!
//! Skill ratings for one operating team. Ratings run 0..=10.

use serde::{Deserialize, Serialize};

use crate::mission::SkillKind;

/// Capability profile for a team of operatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamProfile {
    pub stealth: i32,
    pub combat: i32,
    pub technical: i32,
    pub intelligence: i32,
    pub social: i32,
    /// How well the team holds together under pressure.
    pub cohesion: i32,
    /// Quality of in-field communication.
    pub communication: i32,
}

impl TeamProfile {
    /// Rating for one skill.
    pub fn skill(&self, kind: SkillKind) -> i32 {
        match kind {
            SkillKind::Stealth => self.stealth,
            SkillKind::Combat => self.combat,
            SkillKind::Technical => self.technical,
            SkillKind::Intelligence => self.intelligence,
            SkillKind::Social => self.social,
        }
    }

    /// Average skill rating across all five skills.
    pub fn capability_rating(&self) -> i32 {
        (self.stealth + self.combat + self.technical + self.intelligence + self.social) / 5
    }
}

impl Default for TeamProfile {
    /// A competent but unexceptional team.
    fn default() -> Self {
        Self {
            stealth: 5,
            combat: 5,
            technical: 5,
            intelligence: 5,
            social: 5,
            cohesion: 5,
            communication: 5,
        }
    }
}
