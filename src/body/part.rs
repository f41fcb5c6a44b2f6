//! Body part payload stored in the tree arena

use serde::Serialize;

use crate::capacity::CapacityInfo;
use crate::health::{DamageState, HpSystem};

/// One part of a body instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyPart {
    /// Definition name, shared by every instance of the definition ("Arm")
    pub name: String,
    /// Per-instance name when one definition is reused ("Left Arm")
    pub custom_name: Option<String>,
    /// Relative chance of being hit among siblings
    pub size_weight: f32,
    pub hp: HpSystem,
    /// Capacity lost when this part is fully penalized
    pub capacity_contribution: CapacityInfo,
}

impl BodyPart {
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.name)
    }

    pub fn damage_state(&self) -> DamageState {
        self.hp.damage_state()
    }
}
