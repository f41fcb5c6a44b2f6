//! Timed capacity modifiers (drugs, adrenaline, exhaustion...)

use serde::{Deserialize, Serialize};

use crate::capacity::info::CapacityInfo;
use crate::core::types::Seconds;

/// A temporary change to a creature's capacities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityModifier {
    pub capacity_delta: CapacityInfo,
    /// Multiply component-wise instead of adding
    pub multiplicative: bool,
    pub spawn_time: Seconds,
    pub duration: Seconds,
}

impl CapacityModifier {
    pub fn additive(capacity_delta: CapacityInfo, spawn_time: Seconds, duration: Seconds) -> Self {
        Self {
            capacity_delta,
            multiplicative: false,
            spawn_time,
            duration,
        }
    }

    pub fn multiplicative(
        capacity_delta: CapacityInfo,
        spawn_time: Seconds,
        duration: Seconds,
    ) -> Self {
        Self {
            capacity_delta,
            multiplicative: true,
            spawn_time,
            duration,
        }
    }

    pub fn is_expired(&self, now: Seconds) -> bool {
        now - self.spawn_time >= self.duration
    }

    /// Fold this modifier into a running capacity total
    pub fn apply(&self, total: CapacityInfo) -> CapacityInfo {
        if self.multiplicative {
            total * self.capacity_delta
        } else {
            total + self.capacity_delta
        }
    }
}
