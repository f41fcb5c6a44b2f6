//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Guard for every normalization that divides by a weight sum or HP base
pub const EPSILON: f32 = 1e-4;

/// Simulation time in seconds
pub type Seconds = f32;

/// Unique identifier for creatures owning a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}
