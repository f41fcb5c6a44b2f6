//! A creature's own copy of a body template
//!
//! Bodies are deep copies: nothing is shared with the template or with other
//! bodies, so cloning one and mutating the clone leaves the source untouched.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::body::part::BodyPart;
use crate::body::propagation::{propagate, PartDamageEvent};
use crate::body::tree::{BodyTree, NodeId, MAX_PARTS};
use crate::capacity::CapacityInfo;
use crate::core::types::Seconds;
use crate::health::{CanBeDamaged, Damage, DamageState, HpChangedEvent};

/// What caused a body-wide health change
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum HealthChange {
    Damage(Damage),
    Heal(f32),
    Regeneration(f32),
}

/// Every part touched by one body-wide change, in visitation order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyDamageEvent {
    pub cause: HealthChange,
    pub parts: Vec<PartDamageEvent>,
}

impl BodyDamageEvent {
    fn new(cause: HealthChange) -> Self {
        Self {
            cause,
            parts: Vec::with_capacity(MAX_PARTS),
        }
    }

    /// Sum of normalized health lost (positive) or gained (negative)
    pub fn total_health_lost(&self) -> f32 {
        -self.parts.iter().map(|p| p.hp.health_delta).sum::<f32>()
    }

    pub fn touched(&self, node: NodeId) -> bool {
        self.parts.iter().any(|p| p.node == node)
    }
}

/// Natural healing parameters copied from the template
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealingProfile {
    /// Normalized health restored per period at full Healing capacity
    pub rate: f32,
    pub period: Seconds,
}

impl Default for HealingProfile {
    fn default() -> Self {
        Self {
            rate: 0.0,
            period: 1.0,
        }
    }
}

/// One creature's body
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    body_type: String,
    tree: BodyTree,
    healing: HealingProfile,
    base_capacity: CapacityInfo,
    healing_elapsed: Seconds,
}

impl Body {
    pub fn new(
        body_type: impl Into<String>,
        tree: BodyTree,
        healing: HealingProfile,
        base_capacity: CapacityInfo,
    ) -> Self {
        Self {
            body_type: body_type.into(),
            tree,
            healing,
            base_capacity,
            healing_elapsed: 0.0,
        }
    }

    pub fn body_type(&self) -> &str {
        &self.body_type
    }

    pub fn tree(&self) -> &BodyTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut BodyTree {
        &mut self.tree
    }

    pub fn healing(&self) -> HealingProfile {
        self.healing
    }

    /// Capacities of this body before any damage or modifier
    pub fn base_capacity(&self) -> CapacityInfo {
        self.base_capacity
    }

    /// Distribute a hit over the tree, starting at the root
    ///
    /// All affected parts hold their final state when this returns.
    pub fn take_damage<R: Rng>(&mut self, damage: &Damage, rng: &mut R) -> BodyDamageEvent {
        let mut event = BodyDamageEvent::new(HealthChange::Damage(*damage));
        let root = self.tree.root();
        propagate(&mut self.tree, root, *damage, rng, &mut event.parts);

        debug!(
            body_type = %self.body_type,
            parts_hit = event.parts.len(),
            health_lost = event.total_health_lost(),
            "Body took damage"
        );
        event
    }

    /// Heal every part by `amount` hit points
    pub fn heal(&mut self, amount: f32) -> BodyDamageEvent {
        let mut event = BodyDamageEvent::new(HealthChange::Heal(amount));
        self.heal_parts(&mut event, amount, |part| part.hp.heal(amount), |_| true);
        event
    }

    /// Advance natural healing by `elapsed` seconds
    ///
    /// Each completed healing period restores `rate * healing_capacity` of
    /// normalized health to every wounded part that is not destroyed.
    /// Returns `None` when no period completed or nothing needed healing.
    pub fn regenerate(&mut self, elapsed: Seconds, healing_capacity: f32) -> Option<BodyDamageEvent> {
        if self.healing.rate <= 0.0 || self.healing.period <= 0.0 {
            return None;
        }

        self.healing_elapsed += elapsed.max(0.0);
        let periods = (self.healing_elapsed / self.healing.period).floor();
        if periods < 1.0 {
            return None;
        }
        self.healing_elapsed -= periods * self.healing.period;

        let fraction = self.healing.rate * healing_capacity.max(0.0) * periods;
        if fraction <= 0.0 {
            return None;
        }

        let mut event = BodyDamageEvent::new(HealthChange::Regeneration(fraction));
        self.heal_parts(
            &mut event,
            fraction,
            |part| part.hp.heal_fraction(fraction),
            |part| part.hp.health() > 0.0 && part.hp.health() < 1.0,
        );

        if event.parts.is_empty() {
            None
        } else {
            Some(event)
        }
    }

    fn heal_parts(
        &mut self,
        event: &mut BodyDamageEvent,
        amount: f32,
        mut heal: impl FnMut(&mut BodyPart) -> HpChangedEvent,
        wants: impl Fn(&BodyPart) -> bool,
    ) {
        let nodes: Vec<NodeId> = self.tree.parts().map(|(id, _)| id).collect();
        for node in nodes {
            let Some(part) = self.tree.part_mut(node) else {
                continue;
            };
            if !wants(part) {
                continue;
            }
            let hp = heal(part);
            event.parts.push(PartDamageEvent {
                node,
                part_name: part.display_name().to_string(),
                amount,
                hp,
            });
        }
    }

    /// Damage state and capacity contribution of every part
    pub fn capacity_inputs(&self) -> impl Iterator<Item = (DamageState, CapacityInfo)> + '_ {
        self.tree
            .parts()
            .map(|(_, part)| (part.damage_state(), part.capacity_contribution))
    }

    /// Damage state of a single part
    pub fn part_state(&self, node: NodeId) -> Option<DamageState> {
        self.tree.part(node).map(|part| part.damage_state())
    }

    /// Mean normalized health across all parts
    pub fn overall_health(&self) -> f32 {
        let (sum, count) = self
            .tree
            .parts()
            .fold((0.0, 0usize), |(sum, count), (_, part)| (sum + part.hp.health(), count + 1));
        if count == 0 {
            1.0
        } else {
            sum / count as f32
        }
    }
}

impl CanBeDamaged for Body {
    /// Worst state across all parts
    fn damage_state(&self) -> DamageState {
        self.tree
            .parts()
            .map(|(_, part)| part.damage_state())
            .fold(DamageState::None, DamageState::combine)
    }
}
