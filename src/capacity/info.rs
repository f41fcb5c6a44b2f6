//! Six-dimensional capacity vector

use serde::{Deserialize, Serialize};

/// Derived gameplay stats
///
/// Used both as a creature's current capacities and as the amount a part
/// contributes to them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityInfo {
    pub pain: f32,
    pub cognition: f32,
    pub movement: f32,
    pub manipulation: f32,
    pub communication: f32,
    pub healing: f32,
}

impl CapacityInfo {
    pub fn new(
        pain: f32,
        cognition: f32,
        movement: f32,
        manipulation: f32,
        communication: f32,
        healing: f32,
    ) -> Self {
        Self {
            pain,
            cognition,
            movement,
            manipulation,
            communication,
            healing,
        }
    }

    /// Every capacity at full strength, no pain
    pub fn baseline() -> Self {
        Self::new(0.0, 1.0, 1.0, 1.0, 1.0, 1.0)
    }

    pub fn splat(value: f32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    /// Clamp every component to be non-negative
    pub fn clamp_non_negative(self) -> Self {
        self.map(|v| v.max(0.0))
    }

    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            pain: f(self.pain),
            cognition: f(self.cognition),
            movement: f(self.movement),
            manipulation: f(self.manipulation),
            communication: f(self.communication),
            healing: f(self.healing),
        }
    }

    fn zip(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self {
            pain: f(self.pain, rhs.pain),
            cognition: f(self.cognition, rhs.cognition),
            movement: f(self.movement, rhs.movement),
            manipulation: f(self.manipulation, rhs.manipulation),
            communication: f(self.communication, rhs.communication),
            healing: f(self.healing, rhs.healing),
        }
    }

    /// Largest absolute component-wise difference
    pub fn max_difference(&self, other: &Self) -> f32 {
        let d = self.zip(*other, |a, b| (a - b).abs());
        [
            d.pain,
            d.cognition,
            d.movement,
            d.manipulation,
            d.communication,
            d.healing,
        ]
        .into_iter()
        .fold(0.0, f32::max)
    }
}

impl std::ops::Add for CapacityInfo {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl std::ops::Sub for CapacityInfo {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

/// Component-wise product
impl std::ops::Mul for CapacityInfo {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }
}

impl std::ops::Mul<f32> for CapacityInfo {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        self.map(|v| v * rhs)
    }
}
