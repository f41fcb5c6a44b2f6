//! Damage values and damage-type multipliers
//!
//! A `Damage` is an immutable value built by whatever decided a hit happened.
//! Parts resist or amplify it through `DamageMultiplier` sets derived from
//! their material composition.

use serde::{Deserialize, Serialize};

/// Kind of harm carried by a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Multiplier tag only: applies to every damage type
    Any,
    Slashing,
    Piercing,
    Blunt,
    Fire,
    Cold,
    Poison,
}

impl DamageType {
    /// Does a multiplier tagged `self` apply to damage of type `incoming`?
    pub fn applies_to(&self, incoming: DamageType) -> bool {
        *self == DamageType::Any || *self == incoming
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Slashing => "slashing",
            Self::Piercing => "piercing",
            Self::Blunt => "blunt",
            Self::Fire => "fire",
            Self::Cold => "cold",
            Self::Poison => "poison",
        }
    }
}

/// An incoming hit
///
/// `penetration` scales the amount forwarded to contained parts,
/// `dispersion` controls how many siblings are touched at each level.
/// Both stay within [0, 1]; the only way in is `Damage::new`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Damage {
    damage_type: DamageType,
    amount: f32,
    penetration: f32,
    dispersion: f32,
}

impl Damage {
    /// Build a hit, clamping penetration and dispersion into [0, 1]
    pub fn new(damage_type: DamageType, amount: f32, penetration: f32, dispersion: f32) -> Self {
        Self {
            damage_type,
            amount: amount.max(0.0),
            penetration: penetration.clamp(0.0, 1.0),
            dispersion: dispersion.clamp(0.0, 1.0),
        }
    }

    pub fn damage_type(&self) -> DamageType {
        self.damage_type
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn penetration(&self) -> f32 {
        self.penetration
    }

    pub fn dispersion(&self) -> f32 {
        self.dispersion
    }

    /// The hit forwarded one level deeper; never larger than this one
    pub fn penetrated(&self) -> Self {
        Self {
            amount: self.amount * self.penetration.clamp(0.0, 1.0),
            ..*self
        }
    }

    /// Same hit with a different amount
    pub fn with_amount(&self, amount: f32) -> Self {
        Self {
            amount: amount.max(0.0),
            ..*self
        }
    }
}

/// Resistance (< 1) or weakness (> 1) against one damage type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageMultiplier {
    pub damage_type: DamageType,
    pub amount: f32,
    #[serde(default)]
    pub weight: Option<f32>,
}

impl DamageMultiplier {
    pub fn new(damage_type: DamageType, amount: f32) -> Self {
        Self {
            damage_type,
            amount,
            weight: None,
        }
    }

    pub fn weighted(damage_type: DamageType, amount: f32, weight: f32) -> Self {
        Self {
            damage_type,
            amount,
            weight: Some(weight),
        }
    }

    /// Merge two multipliers of the same damage type
    ///
    /// Unweighted pairs multiply. If either side carries a weight the result
    /// is the weighted average and the weights add up, so later merges keep
    /// the right proportions. A missing weight counts as 1.
    pub fn merge(&self, other: &DamageMultiplier) -> DamageMultiplier {
        debug_assert_eq!(self.damage_type, other.damage_type);

        match (self.weight, other.weight) {
            (None, None) => DamageMultiplier::new(self.damage_type, self.amount * other.amount),
            (wa, wb) => {
                let wa = wa.unwrap_or(1.0).max(0.0);
                let wb = wb.unwrap_or(1.0).max(0.0);
                let total = wa + wb;
                let amount = if total > crate::core::types::EPSILON {
                    (self.amount * wa + other.amount * wb) / total
                } else {
                    (self.amount + other.amount) * 0.5
                };
                DamageMultiplier::weighted(self.damage_type, amount, total)
            }
        }
    }
}

/// Collapse multipliers so that each damage type appears at most once
///
/// Types keep the order of their first appearance.
pub fn simplify_multipliers(multipliers: &[DamageMultiplier]) -> Vec<DamageMultiplier> {
    let mut merged: Vec<DamageMultiplier> = Vec::with_capacity(multipliers.len());

    for multiplier in multipliers {
        match merged
            .iter_mut()
            .find(|m| m.damage_type == multiplier.damage_type)
        {
            Some(existing) => *existing = existing.merge(multiplier),
            None => merged.push(*multiplier),
        }
    }

    merged
}

/// Apply every matching multiplier to a raw damage amount
pub fn apply_multipliers(multipliers: &[DamageMultiplier], damage: &Damage) -> f32 {
    multipliers
        .iter()
        .filter(|m| m.damage_type.applies_to(damage.damage_type))
        .fold(damage.amount, |amount, m| amount * m.amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_merge_is_weighted_average() {
        let merged = simplify_multipliers(&[
            DamageMultiplier::weighted(DamageType::Slashing, 0.5, 2.0),
            DamageMultiplier::weighted(DamageType::Slashing, 1.5, 1.0),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].damage_type, DamageType::Slashing);
        assert!((merged[0].amount - 2.5 / 3.0).abs() < 1e-5);
        assert_eq!(merged[0].weight, Some(3.0));
    }

    #[test]
    fn test_unweighted_merge_is_product() {
        let merged = simplify_multipliers(&[
            DamageMultiplier::new(DamageType::Slashing, 0.5),
            DamageMultiplier::new(DamageType::Slashing, 1.5),
        ]);

        assert_eq!(merged.len(), 1);
        assert!((merged[0].amount - 0.75).abs() < 1e-6);
        assert_eq!(merged[0].weight, None);
    }

    #[test]
    fn test_merge_is_transitive_and_keeps_order() {
        let merged = simplify_multipliers(&[
            DamageMultiplier::weighted(DamageType::Fire, 2.0, 1.0),
            DamageMultiplier::weighted(DamageType::Blunt, 0.5, 1.0),
            DamageMultiplier::weighted(DamageType::Fire, 1.0, 1.0),
            DamageMultiplier::weighted(DamageType::Fire, 0.0, 2.0),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].damage_type, DamageType::Fire);
        assert_eq!(merged[1].damage_type, DamageType::Blunt);
        // (2*1 + 1*1 + 0*2) / 4
        assert!((merged[0].amount - 0.75).abs() < 1e-6);
        assert_eq!(merged[0].weight, Some(4.0));
    }

    #[test]
    fn test_any_multiplier_applies_universally() {
        let multipliers = [
            DamageMultiplier::new(DamageType::Any, 0.5),
            DamageMultiplier::new(DamageType::Fire, 2.0),
        ];

        let fire = Damage::new(DamageType::Fire, 10.0, 0.0, 0.0);
        let cut = Damage::new(DamageType::Slashing, 10.0, 0.0, 0.0);

        assert!((apply_multipliers(&multipliers, &fire) - 10.0).abs() < 1e-6);
        assert!((apply_multipliers(&multipliers, &cut) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_penetrated_scales_amount_only() {
        let hit = Damage::new(DamageType::Piercing, 20.0, 0.5, 0.3);
        let inner = hit.penetrated();

        assert_eq!(inner.amount, 10.0);
        assert_eq!(inner.damage_type, DamageType::Piercing);
        assert_eq!(inner.dispersion, 0.3);
        assert_eq!(inner.penetration, 0.5);
    }

    #[test]
    fn test_new_clamps_fractions() {
        let hit = Damage::new(DamageType::Blunt, -3.0, 1.5, -0.2);
        assert_eq!(hit.amount, 0.0);
        assert_eq!(hit.penetration, 1.0);
        assert_eq!(hit.dispersion, 0.0);
    }

    #[test]
    fn test_penetrated_never_amplifies_out_of_range_penetration() {
        let hit = Damage {
            damage_type: DamageType::Piercing,
            amount: 20.0,
            penetration: 3.0,
            dispersion: 0.0,
        };
        assert_eq!(hit.penetrated().amount(), 20.0);

        let hit = Damage {
            penetration: -1.0,
            ..hit
        };
        assert_eq!(hit.penetrated().amount(), 0.0);
    }
}
