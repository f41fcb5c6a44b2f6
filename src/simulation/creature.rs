//! A creature: one body, its derived capacities and its damage RNG stream

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::body::{Body, BodyDamageEvent, TemplateRegistry};
use crate::capacity::{CapacityInfo, CapacityModel, CapacityModifier, SeverityTable};
use crate::core::error::Result;
use crate::core::types::{EntityId, Seconds, EPSILON};
use crate::health::{CanBeDamaged, CanTakeDamage, Damage, DamageState};

#[derive(Debug, Clone)]
pub struct Creature {
    pub id: EntityId,
    pub name: String,
    body: Body,
    capacities: CapacityModel,
    rng: ChaCha8Rng,
}

impl Creature {
    pub fn new(id: EntityId, name: impl Into<String>, body: Body, seed: u64) -> Self {
        let capacities = CapacityModel::new(body.base_capacity());
        Self {
            id,
            name: name.into(),
            body,
            capacities,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creature with a fresh body of `body_type`
    pub fn spawn(
        registry: &TemplateRegistry,
        body_type: &str,
        name: impl Into<String>,
        seed: u64,
    ) -> Result<Self> {
        let body = registry.instantiate(body_type)?;
        Ok(Self::new(EntityId::new(), name, body, seed))
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Direct tree access marks capacities dirty, since parts may change
    pub fn body_mut(&mut self) -> &mut Body {
        self.capacities.mark_dirty();
        &mut self.body
    }

    pub fn capacities(&self) -> &CapacityModel {
        &self.capacities
    }

    /// Last recomputed capacity snapshot
    pub fn current_capacities(&self) -> CapacityInfo {
        self.capacities.current()
    }

    pub fn mark_capacities_dirty(&mut self) {
        self.capacities.mark_dirty();
    }

    pub fn add_modifier(&mut self, modifier: CapacityModifier) {
        self.capacities.add_modifier(modifier);
    }

    /// Recompute capacities if dirty or a modifier expired
    ///
    /// Returns `(previous, current)` when the snapshot actually changed.
    pub fn update_capacities(
        &mut self,
        now: Seconds,
        severity: &SeverityTable,
    ) -> Option<(CapacityInfo, CapacityInfo)> {
        if !self.capacities.needs_recompute(now) {
            return None;
        }
        let previous = self
            .capacities
            .recompute(now, self.body.capacity_inputs(), severity);
        let current = self.capacities.current();

        if previous.max_difference(&current) > EPSILON {
            Some((previous, current))
        } else {
            None
        }
    }

    /// Natural healing scaled by the current Healing capacity
    pub fn regenerate(&mut self, elapsed: Seconds) -> Option<BodyDamageEvent> {
        let healing = self.capacities.current().healing;
        let event = self.body.regenerate(elapsed, healing)?;
        self.capacities.mark_dirty();
        Some(event)
    }
}

impl CanBeDamaged for Creature {
    fn damage_state(&self) -> DamageState {
        self.body.damage_state()
    }
}

impl CanTakeDamage<BodyDamageEvent> for Creature {
    fn take_damage(&mut self, damage: &Damage) -> BodyDamageEvent {
        let event = self.body.take_damage(damage, &mut self.rng);
        self.capacities.mark_dirty();
        event
    }

    fn heal(&mut self, amount: f32) -> BodyDamageEvent {
        let event = self.body.heal(amount);
        self.capacities.mark_dirty();
        event
    }
}
