//! Outbound change notifications for UI and AI collaborators

use serde::Serialize;

use crate::body::{BodyDamageEvent, PartDamageEvent};
use crate::capacity::CapacityInfo;
use crate::core::types::EntityId;
use crate::scheduler::NotificationBus;

/// A single part's HP changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartHpChanged {
    pub entity: EntityId,
    pub change: PartDamageEvent,
}

/// A body-wide change (hit, heal, regeneration) completed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyDamaged {
    pub entity: EntityId,
    pub event: BodyDamageEvent,
}

/// A creature's capacity snapshot was recomputed to a different value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityChanged {
    pub entity: EntityId,
    pub previous: CapacityInfo,
    pub current: CapacityInfo,
}

/// One bus per outbound event stream
#[derive(Debug)]
pub struct EventBuses {
    pub hp_changed: NotificationBus<PartHpChanged>,
    pub body_damaged: NotificationBus<BodyDamaged>,
    pub capacity_changed: NotificationBus<CapacityChanged>,
}

impl EventBuses {
    pub fn new() -> Self {
        Self {
            hp_changed: NotificationBus::new("hp_changed"),
            body_damaged: NotificationBus::new("body_damaged"),
            capacity_changed: NotificationBus::new("capacity_changed"),
        }
    }

    /// Per-part events first, in visitation order, then the aggregate
    pub(crate) fn publish_body(&mut self, entity: EntityId, event: &BodyDamageEvent) {
        if !self.hp_changed.is_empty() {
            for change in &event.parts {
                self.hp_changed.notify(&PartHpChanged {
                    entity,
                    change: change.clone(),
                });
            }
        }

        if !self.body_damaged.is_empty() {
            self.body_damaged.notify(&BodyDamaged {
                entity,
                event: event.clone(),
            });
        }
    }
}

impl Default for EventBuses {
    fn default() -> Self {
        Self::new()
    }
}
