//! Roll Resolution
//!
//! The probability primitive every phase resolution goes through: roll an
//! N-sided die, add modifiers, classify against a DC. Pure over the injected
//! RNG so tests can fix the seed and assert exact outcomes.

use rand::Rng;

use timeline_events::OutcomeTier;

/// A single die roll with its modifier applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roll {
    /// Raw die face, 1..=sides.
    pub raw: i32,
    pub modifier: i32,
    /// raw + modifier, not clamped.
    pub total: i32,
}

/// Rolls an N-sided die and applies a modifier.
pub fn roll(rng: &mut impl Rng, sides: i32, modifier: i32) -> Roll {
    let raw = rng.gen_range(1..=sides);
    Roll {
        raw,
        modifier,
        total: raw + modifier,
    }
}

/// Classifies a roll against a DC.
///
/// Raw-face criticals (1 and the die maximum) take precedence over the total
/// comparison; between them the ladder is success at the DC, partial within
/// `margin` below it, failure underneath.
pub fn classify(roll: Roll, sides: i32, dc: i32, margin: i32) -> OutcomeTier {
    if roll.raw == 1 {
        OutcomeTier::CriticalFailure
    } else if roll.raw == sides {
        OutcomeTier::CriticalSuccess
    } else if roll.total >= dc {
        OutcomeTier::Success
    } else if roll.total >= dc - margin {
        OutcomeTier::Partial
    } else {
        OutcomeTier::Failure
    }
}

/// Rolls and classifies in one step.
pub fn resolve(rng: &mut impl Rng, sides: i32, modifier: i32, dc: i32, margin: i32) -> (Roll, OutcomeTier) {
    let r = roll(rng, sides, modifier);
    let tier = classify(r, sides, dc, margin);
    (r, tier)
}
