//! World - owns creatures and drives the time-gated subsystems
//!
//! The host calls `tick` once per frame. Direct damage is applied and
//! published immediately; queued health commands and capacity
//! recomputation wait for their own subsystem cadence.

use ahash::AHashMap;
use tracing::{debug, info, warn};

use crate::body::{BodyDamageEvent, TemplateRegistry};
use crate::capacity::{CapacityInfo, CapacityModifier};
use crate::core::config::SimulationConfig;
use crate::core::error::{AnatomyError, Result};
use crate::core::types::{EntityId, Seconds};
use crate::health::{CanTakeDamage, Damage};
use crate::scheduler::{Scheduled, UpdateTimer};
use crate::simulation::creature::Creature;
use crate::simulation::events::{CapacityChanged, EventBuses};

/// Work deferred to the health subsystem
#[derive(Debug, Clone, PartialEq)]
pub enum HealthCommand {
    Damage { entity: EntityId, damage: Damage },
    Heal { entity: EntityId, amount: f32 },
}

/// Work deferred to the capacity subsystem
#[derive(Debug, Clone, PartialEq)]
pub enum CapacityCommand {
    MarkDirty(EntityId),
    AddModifier {
        entity: EntityId,
        modifier: CapacityModifier,
    },
}

/// Which subsystems ran during one `tick`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub health_updated: bool,
    pub capacity_updated: bool,
    /// External decision-making should run this frame
    pub decision_due: bool,
}

pub struct World {
    config: SimulationConfig,
    registry: TemplateRegistry,
    creatures: AHashMap<EntityId, Creature>,
    /// Spawn order; subsystems visit creatures in this order
    order: Vec<EntityId>,
    elapsed: Seconds,
    spawned: u64,
    health: Scheduled<HealthCommand>,
    capacity: Scheduled<CapacityCommand>,
    decision: UpdateTimer,
    pub events: EventBuses,
}

impl World {
    pub fn new(config: SimulationConfig, registry: TemplateRegistry) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            health: Scheduled::new(config.health_update_interval),
            capacity: Scheduled::new(config.capacity_update_interval),
            decision: UpdateTimer::new(config.decision_update_interval),
            config,
            registry,
            creatures: AHashMap::new(),
            order: Vec::new(),
            elapsed: 0.0,
            spawned: 0,
            events: EventBuses::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Simulation time since the world was created
    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }

    pub fn decision_timer(&self) -> &UpdateTimer {
        &self.decision
    }

    /// Spawn a creature with a fresh body of `body_type`
    pub fn spawn(&mut self, body_type: &str, name: impl Into<String>) -> Result<EntityId> {
        let seed = self.config.rng_seed.wrapping_add(self.spawned);
        let creature = Creature::spawn(&self.registry, body_type, name, seed)?;
        let id = creature.id;
        self.spawned += 1;

        info!(entity = ?id, name = %creature.name, body_type, "Spawned creature");
        self.creatures.insert(id, creature);
        self.order.push(id);
        Ok(id)
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Creature> {
        let creature = self.creatures.remove(&id)?;
        self.order.retain(|entity| *entity != id);
        Some(creature)
    }

    pub fn creature(&self, id: EntityId) -> Result<&Creature> {
        self.creatures.get(&id).ok_or(AnatomyError::EntityNotFound(id))
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Result<&mut Creature> {
        self.creatures
            .get_mut(&id)
            .ok_or(AnatomyError::EntityNotFound(id))
    }

    /// Creatures in spawn order
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> + '_ {
        self.order.iter().filter_map(|id| self.creatures.get(id))
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    /// Last capacity snapshot of a creature
    pub fn current_capacities(&self, id: EntityId) -> Result<CapacityInfo> {
        Ok(self.creature(id)?.current_capacities())
    }

    /// Apply a hit now and publish the resulting events
    pub fn damage(&mut self, id: EntityId, damage: &Damage) -> Result<BodyDamageEvent> {
        let event = self.creature_mut(id)?.take_damage(damage);
        self.events.publish_body(id, &event);
        Ok(event)
    }

    /// Heal every part of a creature now and publish the resulting events
    pub fn heal(&mut self, id: EntityId, amount: f32) -> Result<BodyDamageEvent> {
        let event = self.creature_mut(id)?.heal(amount);
        self.events.publish_body(id, &event);
        Ok(event)
    }

    /// Apply a hit on the next health update
    pub fn queue_damage(&mut self, entity: EntityId, damage: Damage) {
        self.health.push(HealthCommand::Damage { entity, damage });
    }

    pub fn queue_heal(&mut self, entity: EntityId, amount: f32) {
        self.health.push(HealthCommand::Heal { entity, amount });
    }

    /// Force a capacity recompute on the next capacity update
    pub fn invalidate_capacities(&mut self, entity: EntityId) {
        self.capacity.push(CapacityCommand::MarkDirty(entity));
    }

    /// Attach a timed modifier starting now; takes effect on the next
    /// capacity update
    pub fn add_modifier(
        &mut self,
        entity: EntityId,
        delta: CapacityInfo,
        multiplicative: bool,
        duration: Seconds,
    ) -> Result<()> {
        self.creature(entity)?;
        let modifier = CapacityModifier {
            capacity_delta: delta,
            multiplicative,
            spawn_time: self.elapsed,
            duration,
        };
        self.capacity
            .push(CapacityCommand::AddModifier { entity, modifier });
        Ok(())
    }

    /// Advance every subsystem by `dt` seconds
    pub fn tick(&mut self, dt: Seconds) -> TickReport {
        self.elapsed += dt.max(0.0);

        let mut report = TickReport::default();

        if let Some(batch) = self.health.tick(dt) {
            report.health_updated = true;
            debug!(queued = batch.events.len(), "Health update");

            for command in batch.events {
                if let Err(e) = self.apply_health_command(command) {
                    warn!(error = %e, "Dropped health command");
                }
            }

            for id in &self.order {
                let Some(creature) = self.creatures.get_mut(id) else {
                    continue;
                };
                if let Some(event) = creature.regenerate(batch.elapsed) {
                    self.events.publish_body(*id, &event);
                }
            }
        }

        if let Some(batch) = self.capacity.tick(dt) {
            report.capacity_updated = true;
            debug!(queued = batch.events.len(), "Capacity update");

            for command in batch.events {
                let (entity, applied) = match command {
                    CapacityCommand::MarkDirty(entity) => (
                        entity,
                        self.creatures
                            .get_mut(&entity)
                            .map(Creature::mark_capacities_dirty),
                    ),
                    CapacityCommand::AddModifier { entity, modifier } => (
                        entity,
                        self.creatures
                            .get_mut(&entity)
                            .map(|c| c.add_modifier(modifier)),
                    ),
                };
                if applied.is_none() {
                    warn!(entity = ?entity, "Capacity command for missing creature");
                }
            }

            let now = self.elapsed;
            let severity = self.config.severity;
            for id in &self.order {
                let Some(creature) = self.creatures.get_mut(id) else {
                    continue;
                };
                if let Some((previous, current)) = creature.update_capacities(now, &severity) {
                    self.events.capacity_changed.notify(&CapacityChanged {
                        entity: *id,
                        previous,
                        current,
                    });
                }
            }
        }

        report.decision_due = self.decision.tick(dt).is_some();
        report
    }

    fn apply_health_command(&mut self, command: HealthCommand) -> Result<BodyDamageEvent> {
        match command {
            HealthCommand::Damage { entity, damage } => self.damage(entity, &damage),
            HealthCommand::Heal { entity, amount } => self.heal(entity, amount),
        }
    }
}
