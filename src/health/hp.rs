//! Per-part health tracking
//!
//! Normalized health is the only stored quantity; hit points are derived
//! from it on demand.

use serde::{Deserialize, Serialize};

use crate::core::types::EPSILON;
use crate::health::damage::{apply_multipliers, Damage, DamageMultiplier};

/// Damage state categories, ordered from healthy to destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageState {
    None,
    Minor,
    Major,
    Critical,
    Terminal,
}

impl DamageState {
    /// Classify normalized health using inclusive upper thresholds
    pub fn from_health(health: f32) -> Self {
        if health <= 0.05 {
            DamageState::Terminal
        } else if health <= 0.25 {
            DamageState::Critical
        } else if health <= 0.70 {
            DamageState::Major
        } else if health <= 0.99 {
            DamageState::Minor
        } else {
            DamageState::None
        }
    }

    /// Worst of the two states wins
    pub fn combine(self, other: DamageState) -> DamageState {
        self.max(other)
    }

    pub fn all() -> [DamageState; 5] {
        [
            DamageState::None,
            DamageState::Minor,
            DamageState::Major,
            DamageState::Critical,
            DamageState::Terminal,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "unharmed",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
            Self::Terminal => "terminal",
        }
    }
}

/// Outcome of a single health mutation, complete when returned
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HpChangedEvent {
    pub hp_prev: u32,
    pub hp_current: u32,
    /// Signed change in normalized health (negative for damage)
    pub health_delta: f32,
}

/// Health of a single part
///
/// Only built through `new`, so `health` never leaves [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HpSystem {
    hp_base: u32,
    /// Always within [0, 1]
    health: f32,
    damage_multipliers: Vec<DamageMultiplier>,
}

impl HpSystem {
    /// Full-health system with the given base HP and multiplier set
    pub fn new(hp_base: u32, damage_multipliers: Vec<DamageMultiplier>) -> Self {
        Self {
            hp_base,
            health: 1.0,
            damage_multipliers,
        }
    }

    pub fn hp_base(&self) -> u32 {
        self.hp_base
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    /// Current hit points, derived from normalized health
    pub fn hp(&self) -> u32 {
        (self.health * self.hp_base as f32).round() as u32
    }

    pub fn damage_multipliers(&self) -> &[DamageMultiplier] {
        &self.damage_multipliers
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    pub fn damage_state(&self) -> DamageState {
        DamageState::from_health(self.health)
    }

    /// Apply a hit through this part's multipliers
    pub fn take_damage(&mut self, damage: &Damage) -> HpChangedEvent {
        let amount = apply_multipliers(&self.damage_multipliers, damage).max(0.0);
        self.apply_delta(-amount / self.normalizer())
    }

    /// Restore health; multipliers do not apply
    pub fn heal(&mut self, amount: f32) -> HpChangedEvent {
        self.apply_delta(amount.max(0.0) / self.normalizer())
    }

    /// Restore a fraction of full health directly
    pub fn heal_fraction(&mut self, fraction: f32) -> HpChangedEvent {
        self.apply_delta(fraction.max(0.0))
    }

    fn normalizer(&self) -> f32 {
        (self.hp_base as f32).max(EPSILON)
    }

    fn apply_delta(&mut self, delta: f32) -> HpChangedEvent {
        let hp_prev = self.hp();
        let before = self.health;
        let next = before + delta;
        self.health = if next.is_nan() { before } else { next.clamp(0.0, 1.0) };

        HpChangedEvent {
            hp_prev,
            hp_current: self.hp(),
            health_delta: self.health - before,
        }
    }
}
