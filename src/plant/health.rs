//! Health score and leaf color buckets derived from moisture and light.

use serde::{Deserialize, Serialize};

use crate::core::color::Rgb;

/// Light level at which the health contribution saturates.
pub const LIGHT_SATURATION: f32 = 1000.0;

const MOISTURE_WEIGHT: f32 = 0.6;
const LIGHT_WEIGHT: f32 = 0.4;

/// Weighted health in `[0, 1]`: 60% moisture, 40% light (saturating at 1000).
///
/// Out-of-range and NaN inputs are clamped so the score stays in range.
pub fn health_score(moisture: f32, light: f32) -> f32 {
    let moisture_factor = (sanitize(moisture) / 100.0).clamp(0.0, 1.0);
    let light_factor = (sanitize(light).min(LIGHT_SATURATION) / LIGHT_SATURATION).clamp(0.0, 1.0);
    moisture_factor * MOISTURE_WEIGHT + light_factor * LIGHT_WEIGHT
}

/// Replace NaN with zero.
pub(crate) fn sanitize(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v }
}

/// Discrete foliage color bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafColor {
    Healthy,
    LightGreen,
    Yellow,
    Unhealthy,
}

impl LeafColor {
    /// Bucket a health score by descending threshold (0.7, 0.5, 0.3).
    pub fn from_score(score: f32) -> Self {
        if score > 0.7 {
            LeafColor::Healthy
        } else if score > 0.5 {
            LeafColor::LightGreen
        } else if score > 0.3 {
            LeafColor::Yellow
        } else {
            LeafColor::Unhealthy
        }
    }

    /// Bucket for the given environment.
    pub fn for_environment(moisture: f32, light: f32) -> Self {
        Self::from_score(health_score(moisture, light))
    }

    pub fn hex(self) -> u32 {
        match self {
            LeafColor::Healthy => 0x32CD32,
            LeafColor::LightGreen => 0x9ACD32,
            LeafColor::Yellow => 0xFFD700,
            LeafColor::Unhealthy => 0xB22222,
        }
    }

    pub fn rgb(self) -> Rgb {
        Rgb::from_hex(self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_extremes() {
        assert!((health_score(100.0, 1000.0) - 1.0).abs() < 1e-6);
        assert_eq!(health_score(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_score_healthy_state() {
        let score = health_score(65.0, 800.0);
        assert!((score - 0.71).abs() < 1e-4);
        assert_eq!(LeafColor::from_score(score), LeafColor::Healthy);
        assert_eq!(LeafColor::for_environment(65.0, 800.0).hex(), 0x32CD32);
    }

    #[test]
    fn test_light_saturates() {
        assert_eq!(health_score(50.0, 1000.0), health_score(50.0, 5000.0));
    }

    #[test]
    fn test_out_of_range_inputs_stay_in_unit_interval() {
        for (m, l) in [(-20.0, -5.0), (250.0, 9000.0), (f32::NAN, 300.0), (40.0, f32::NAN)] {
            let s = health_score(m, l);
            assert!((0.0..=1.0).contains(&s), "score {s} for ({m}, {l})");
        }
    }

    #[test]
    fn test_buckets_use_strict_thresholds() {
        assert_eq!(LeafColor::from_score(0.71), LeafColor::Healthy);
        assert_eq!(LeafColor::from_score(0.7), LeafColor::LightGreen);
        assert_eq!(LeafColor::from_score(0.5), LeafColor::Yellow);
        assert_eq!(LeafColor::from_score(0.3), LeafColor::Unhealthy);
        assert_eq!(LeafColor::from_score(0.0), LeafColor::Unhealthy);
    }

    #[test]
    fn test_canned_states_map_to_expected_colors() {
        // light deprived: 0.36 + 0.06
        assert_eq!(LeafColor::for_environment(60.0, 150.0), LeafColor::Yellow);
        // dehydrated: 0.15 + 0.28
        assert_eq!(LeafColor::for_environment(25.0, 700.0), LeafColor::Yellow);
        // stressed: 0.12 + 0.04
        assert_eq!(LeafColor::for_environment(20.0, 100.0), LeafColor::Unhealthy);
        // overwatered: 0.54 + 0.24
        assert_eq!(LeafColor::for_environment(90.0, 600.0), LeafColor::Healthy);
    }
}
