//! Weighted stochastic distribution of a hit across the body tree
//!
//! A hit lands on the root and walks downward. At every level a contiguous
//! run of children is picked by sampling a cumulative distribution over
//! their size weights; the run widens with `dispersion` and each chosen
//! child receives the hit scaled by `penetration`.

use rand::Rng;
use tracing::{debug, warn};

use crate::body::tree::{BodyTree, NodeId, MAX_CHILDREN};
use crate::core::types::EPSILON;
use crate::health::{Damage, HpChangedEvent};

/// One part touched by a body-wide change
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PartDamageEvent {
    pub node: NodeId,
    pub part_name: String,
    /// Raw amount that reached this part, before its multipliers
    pub amount: f32,
    pub hp: HpChangedEvent,
}

/// Pick the inclusive sibling range `[lo, hi]` hit by a single draw
///
/// `weights` are the siblings' size weights in order, `r` a uniform draw in
/// [0, 1). The probes `r_lo` and `r_hi` bound a window of width
/// `dispersion` placed at `r` inside the unit interval, so `dispersion = 0`
/// selects one sibling and `dispersion = 1` selects all of them.
///
/// Pure: equal inputs always give equal outputs.
pub fn sample_dispersion(weights: &[f32], r: f32, dispersion: f32) -> (usize, usize) {
    if weights.len() < 2 {
        warn!(
            siblings = weights.len(),
            "Dispersion sampling needs at least two weighted siblings"
        );
        return (0, 0);
    }

    let dispersion = dispersion.clamp(0.0, 1.0);
    let r = r.clamp(0.0, 1.0);

    // Epsilon keeps the top of the CDF strictly below 1 and guards zero sums.
    let total = weights.iter().map(|w| w.max(0.0)).sum::<f32>() + EPSILON;

    // Window of width `dispersion`: r_hi - r_lo == dispersion. Written as
    // products so both probes move monotonically with dispersion.
    let r_lo = r * (1.0 - dispersion);
    let r_hi = if dispersion > 0.0 {
        1.0 - (1.0 - r) * (1.0 - dispersion)
    } else {
        r_lo
    };

    (cdf_index(weights, total, r_lo), cdf_index(weights, total, r_hi))
}

/// First index whose cumulative weight exceeds `probe`
///
/// Probes at or below zero resolve to the first sibling, probes past the
/// top of the distribution to the last one.
fn cdf_index(weights: &[f32], total: f32, probe: f32) -> usize {
    if probe <= 0.0 {
        return 0;
    }

    let mut cumulative = 0.0;
    for (i, weight) in weights.iter().enumerate() {
        cumulative += weight.max(0.0) / total;
        if probe < cumulative {
            return i;
        }
    }
    weights.len() - 1
}

/// Walk the tree from `node`, applying `damage` and recording every part hit
pub(crate) fn propagate<R: Rng>(
    tree: &mut BodyTree,
    node: NodeId,
    damage: Damage,
    rng: &mut R,
    events: &mut Vec<PartDamageEvent>,
) {
    let Some(current) = tree.node(node).copied() else {
        return;
    };

    if let Some(part) = tree.part_mut(node) {
        let hp = part.hp.take_damage(&damage);
        debug!(
            part = part.display_name(),
            amount = damage.amount(),
            health = part.hp.health(),
            "Part damaged"
        );
        events.push(PartDamageEvent {
            node,
            part_name: part.display_name().to_string(),
            amount: damage.amount(),
            hp,
        });
    }

    let children = current.children();
    if children.is_empty() {
        return;
    }

    let mut weights = [0.0f32; MAX_CHILDREN];
    for (weight, child) in weights.iter_mut().zip(children) {
        *weight = tree.part(*child).map_or(0.0, |p| p.size_weight);
    }

    let (lo, hi) = sample_dispersion(
        &weights[..children.len()],
        rng.gen::<f32>(),
        damage.dispersion(),
    );

    let forwarded = damage.penetrated();
    for child in &children[lo..=hi] {
        propagate(tree, *child, forwarded, rng, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dispersion_selects_single_index() {
        let weights = [1.0, 2.0, 3.0, 4.0];
        for i in 0..20 {
            let r = i as f32 / 20.0;
            let (lo, hi) = sample_dispersion(&weights, r, 0.0);
            assert_eq!(lo, hi, "r = {r}");
        }
    }

    #[test]
    fn test_full_dispersion_spans_all_siblings() {
        let weights = [0.1, 0.5, 0.2, 0.2];
        for i in 0..20 {
            let r = i as f32 / 20.0;
            assert_eq!(sample_dispersion(&weights, r, 1.0), (0, 3), "r = {r}");
        }
    }

    #[test]
    fn test_draw_follows_cumulative_weights() {
        // CDF ~ [0.25, 0.5, 1.0]
        let weights = [1.0, 1.0, 2.0];
        assert_eq!(sample_dispersion(&weights, 0.1, 0.0), (0, 0));
        assert_eq!(sample_dispersion(&weights, 0.3, 0.0), (1, 1));
        assert_eq!(sample_dispersion(&weights, 0.6, 0.0), (2, 2));
        assert_eq!(sample_dispersion(&weights, 0.999, 0.0), (2, 2));
    }

    #[test]
    fn test_partial_dispersion_window() {
        let weights = [1.0, 1.0, 1.0, 1.0];
        // r_lo = 0.5 * 0.5 = 0.25 -> index 1, r_hi = 0.75 -> index 3
        assert_eq!(sample_dispersion(&weights, 0.5, 0.5), (1, 3));
    }

    #[test]
    fn test_same_inputs_same_outputs() {
        let weights = [0.3, 0.1, 0.6];
        let first = sample_dispersion(&weights, 0.42, 0.3);
        for _ in 0..10 {
            assert_eq!(sample_dispersion(&weights, 0.42, 0.3), first);
        }
    }

    #[test]
    fn test_degenerate_inputs_resolve_to_first_index() {
        assert_eq!(sample_dispersion(&[], 0.7, 0.5), (0, 0));
        assert_eq!(sample_dispersion(&[3.0], 0.7, 0.5), (0, 0));
    }

    #[test]
    fn test_zero_weights_do_not_divide_by_zero() {
        let (lo, hi) = sample_dispersion(&[0.0, 0.0, 0.0], 0.5, 0.0);
        assert!(lo <= hi && hi < 3);
    }

    #[test]
    fn test_zero_weight_sibling_is_skipped_by_point_draws() {
        let weights = [1.0, 0.0, 1.0];
        for i in 0..20 {
            let (lo, _) = sample_dispersion(&weights, i as f32 / 20.0, 0.0);
            assert_ne!(lo, 1);
        }
    }
}
