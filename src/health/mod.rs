//! Health model: damage values, multipliers, per-part HP and damage states
//!
//! Anything that can be hurt exposes itself through the capability traits
//! below instead of a shared base type.

pub mod damage;
pub mod hp;

pub use damage::{apply_multipliers, simplify_multipliers, Damage, DamageMultiplier, DamageType};
pub use hp::{DamageState, HpChangedEvent, HpSystem};

/// Something with a readable damage state
pub trait CanBeDamaged {
    /// Worst damage state across everything this object tracks
    fn damage_state(&self) -> DamageState;

    fn is_destroyed(&self) -> bool {
        self.damage_state() == DamageState::Terminal
    }
}

/// Something that accepts hits and heals, reporting each change as `T`
///
/// Implementations apply the change synchronously; the returned event
/// describes final state.
pub trait CanTakeDamage<T>: CanBeDamaged {
    fn take_damage(&mut self, damage: &Damage) -> T;

    fn heal(&mut self, amount: f32) -> T;
}

impl CanBeDamaged for HpSystem {
    fn damage_state(&self) -> DamageState {
        HpSystem::damage_state(self)
    }

    fn is_destroyed(&self) -> bool {
        HpSystem::is_destroyed(self)
    }
}

impl CanTakeDamage<HpChangedEvent> for HpSystem {
    fn take_damage(&mut self, damage: &Damage) -> HpChangedEvent {
        HpSystem::take_damage(self, damage)
    }

    fn heal(&mut self, amount: f32) -> HpChangedEvent {
        HpSystem::heal(self, amount)
    }
}
