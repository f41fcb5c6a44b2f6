//! Capacity recomputation from damage states and live modifiers

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capacity::info::CapacityInfo;
use crate::capacity::modifier::CapacityModifier;
use crate::core::error::{AnatomyError, Result};
use crate::core::types::Seconds;
use crate::health::DamageState;

/// Penalty scalar applied to a part's capacity contribution per damage state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityTable {
    pub none: f32,
    pub minor: f32,
    pub major: f32,
    pub critical: f32,
    pub terminal: f32,
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self {
            none: 0.0,
            minor: 0.1,
            major: 0.35,
            critical: 0.7,
            terminal: 1.0,
        }
    }
}

impl SeverityTable {
    pub fn scalar(&self, state: DamageState) -> f32 {
        match state {
            DamageState::None => self.none,
            DamageState::Minor => self.minor,
            DamageState::Major => self.major,
            DamageState::Critical => self.critical,
            DamageState::Terminal => self.terminal,
        }
    }

    /// Scalars must be non-negative and must not shrink as damage worsens
    pub fn validate(&self) -> Result<()> {
        let mut previous = 0.0;
        for state in DamageState::all() {
            let value = self.scalar(state);
            if value < 0.0 {
                return Err(AnatomyError::InvalidConfig(format!(
                    "severity.{} must be non-negative (got {})",
                    state.display_name(),
                    value
                )));
            }
            if value < previous {
                return Err(AnatomyError::InvalidConfig(format!(
                    "severity.{} ({}) is lower than a milder state ({})",
                    state.display_name(),
                    value,
                    previous
                )));
            }
            previous = value;
        }
        Ok(())
    }
}

/// A creature's derived capacities
///
/// Damage only marks the model dirty. The capacity subsystem calls
/// `recompute` on its own cadence, so `current` may lag health by up to one
/// capacity interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityModel {
    base: CapacityInfo,
    modifiers: Vec<CapacityModifier>,
    current: CapacityInfo,
    dirty: bool,
}

impl CapacityModel {
    pub fn new(base: CapacityInfo) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
            current: base,
            dirty: true,
        }
    }

    pub fn base(&self) -> CapacityInfo {
        self.base
    }

    /// Last computed snapshot
    pub fn current(&self) -> CapacityInfo {
        self.current
    }

    pub fn modifiers(&self) -> &[CapacityModifier] {
        &self.modifiers
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn add_modifier(&mut self, modifier: CapacityModifier) {
        self.modifiers.push(modifier);
        self.dirty = true;
    }

    /// Dirty, or holding a modifier that has run out
    pub fn needs_recompute(&self, now: Seconds) -> bool {
        self.dirty || self.modifiers.iter().any(|m| m.is_expired(now))
    }

    /// Rebuild the snapshot
    ///
    /// `parts` yields each part's damage state and capacity contribution.
    /// Returns the previous snapshot.
    pub fn recompute<I>(&mut self, now: Seconds, parts: I, severity: &SeverityTable) -> CapacityInfo
    where
        I: IntoIterator<Item = (DamageState, CapacityInfo)>,
    {
        let expired_before = self.modifiers.len();
        self.modifiers.retain(|m| !m.is_expired(now));
        let expired = expired_before - self.modifiers.len();

        let mut total = self
            .modifiers
            .iter()
            .fold(self.base, |total, modifier| modifier.apply(total));

        for (state, contribution) in parts {
            total = total - contribution * severity.scalar(state);
        }

        let previous = self.current;
        self.current = total.clamp_non_negative();
        self.dirty = false;

        debug!(
            expired,
            live = self.modifiers.len(),
            movement = self.current.movement,
            "Recomputed capacities"
        );

        previous
    }
}

impl Default for CapacityModel {
    fn default() -> Self {
        Self::new(CapacityInfo::baseline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limb() -> CapacityInfo {
        CapacityInfo {
            movement: 1.0,
            ..CapacityInfo::default()
        }
    }

    #[test]
    fn test_all_terminal_clamps_to_zero() {
        let severity = SeverityTable {
            terminal: 0.9,
            ..SeverityTable::default()
        };
        let mut model = CapacityModel::default();

        let parts = vec![(DamageState::Terminal, limb()), (DamageState::Terminal, limb())];
        model.recompute(0.0, parts, &severity);

        assert_eq!(model.current().movement, 0.0);
        assert_eq!(model.current().cognition, 1.0);
        assert!(!model.is_dirty());
    }

    #[test]
    fn test_single_terminal_part_uses_configured_penalty() {
        let severity = SeverityTable {
            terminal: 0.9,
            ..SeverityTable::default()
        };
        let mut model = CapacityModel::default();
        model.recompute(0.0, [(DamageState::Terminal, limb())], &severity);

        assert!((model.current().movement - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_modifiers_apply_in_insertion_order() {
        let mut model = CapacityModel::default();
        // (1 + 1) * 0.5 = 1.0, whereas (1 * 0.5) + 1 would be 1.5
        model.add_modifier(CapacityModifier::additive(CapacityInfo::splat(1.0), 0.0, 10.0));
        model.add_modifier(CapacityModifier::multiplicative(CapacityInfo::splat(0.5), 0.0, 10.0));
        model.recompute(1.0, std::iter::empty(), &SeverityTable::default());

        assert!((model.current().movement - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_expired_modifiers_are_dropped() {
        let mut model = CapacityModel::default();
        model.add_modifier(CapacityModifier::additive(CapacityInfo::splat(1.0), 0.0, 2.0));
        model.recompute(1.0, std::iter::empty(), &SeverityTable::default());
        assert_eq!(model.current().movement, 2.0);

        assert!(!model.needs_recompute(1.5));
        assert!(model.needs_recompute(2.0));

        model.recompute(2.0, std::iter::empty(), &SeverityTable::default());
        assert_eq!(model.current().movement, 1.0);
        assert!(model.modifiers().is_empty());
    }

    #[test]
    fn test_recompute_returns_previous_snapshot() {
        let mut model = CapacityModel::default();
        let previous = model.recompute(0.0, [(DamageState::Terminal, limb())], &SeverityTable::default());

        assert_eq!(previous, CapacityInfo::baseline());
        assert_eq!(model.current().movement, 0.0);
    }

    #[test]
    fn test_severity_validation() {
        assert!(SeverityTable::default().validate().is_ok());

        let negative = SeverityTable {
            none: -0.1,
            ..SeverityTable::default()
        };
        assert!(negative.validate().is_err());
    }
}
