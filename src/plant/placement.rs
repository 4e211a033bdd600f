//! Organ placement on built stems.

use super::Growth;
use super::config::LeafConfig;
use super::health::sanitize;
use super::stem::Stem;

/// Main stem leaf target for a moisture level:
/// `base_count + floor(moisture / moisture_step)`.
///
/// Moisture is clamped to `[0, 100]` first.
pub fn target_leaf_count(moisture: f32, cfg: &LeafConfig) -> usize {
    let moisture = sanitize(moisture).clamp(0.0, 100.0);
    cfg.base_count as usize + (moisture / cfg.moisture_step).floor() as usize
}

/// Replace the leaves of `stem` with a fresh batch over `[min_height, max_height]`.
///
/// Without an explicit `count` the target for the current moisture is used.
pub(crate) fn place_leaves(
    growth: &mut Growth<'_>,
    stem: &mut Stem,
    min_height: f32,
    max_height: f32,
    count: Option<usize>,
) {
    let count = count.unwrap_or_else(|| target_leaf_count(growth.moisture, &growth.config.leaves));
    stem.leaves
        .regenerate(growth, &stem.segments, min_height, max_height, count);
}

/// Put a flower of the given scale on the top face of `stem`.
pub(crate) fn place_flower(growth: &mut Growth<'_>, stem: &mut Stem, scale: f32) {
    let Some(top) = stem.top_segment().cloned() else {
        log::debug!("Skipping flower: stem {:?} has no segments", stem.node());
        return;
    };
    stem.flower.bloom(growth, &top, scale);
}
