//! Plant recipe configuration.
//!
//! `PlantConfig::default()` is the stock recipe: a terracotta pot, a five
//! segment main stem, three to five side branches and a single flower on the
//! main stem. Every number the generators and the animator use lives here so
//! a recipe can be saved, tweaked and reloaded as JSON.

use std::f32::consts::FRAC_PI_6;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Error;
use crate::core::types::Result;

/// Geometry of the main stem.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StemConfig {
    /// Number of stacked segments.
    pub segments: u32,
    /// Height of every segment.
    pub segment_height: f32,
    /// Top radius of the first segment.
    pub base_radius: f32,
    /// Fractional radius loss per segment.
    pub taper: f32,
    /// Spread of the cosmetic per-segment tilt (radians, full width).
    pub tilt_spread: f32,
    /// Radial subdivisions of each segment cylinder.
    pub radial_segments: u32,
    /// Height of the stem base above the plant origin (top of the soil).
    pub base_height: f32,
    /// Leaves on the main stem are spread over this height range.
    pub leaf_min_height: f32,
    pub leaf_max_height: f32,
    /// Stem color as `0xRRGGBB`.
    pub color: u32,
}

impl Default for StemConfig {
    fn default() -> Self {
        Self {
            segments: 5,
            segment_height: 0.25,
            base_radius: 0.05,
            taper: 0.1,
            tilt_spread: 0.1,
            radial_segments: 8,
            base_height: 0.65,
            leaf_min_height: 0.7,
            leaf_max_height: 1.7,
            color: 0x2E8B57,
        }
    }
}

/// Side branch generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    /// Inclusive range of branch counts.
    pub min_count: u32,
    pub max_count: u32,
    /// Minimum azimuth separation between branches (radians).
    pub min_separation: f32,
    /// Rejection sampling budget per branch azimuth.
    pub max_attempts: u32,
    /// Initial outward tilt is drawn from `[min_tilt, min_tilt + tilt_range)`.
    pub min_tilt: f32,
    pub tilt_range: f32,
    /// Attachment point as a fraction of the host segment's height.
    pub min_height_factor: f32,
    pub max_height_factor: f32,
    /// Inclusive range of segments per branch.
    pub min_segments: u32,
    pub max_segments: u32,
    /// Segment height is drawn from `[min_segment_height, min_segment_height + segment_height_range)`.
    pub min_segment_height: f32,
    pub segment_height_range: f32,
    pub base_radius: f32,
    pub taper: f32,
    /// Bottom radius of each segment relative to its top radius.
    pub bottom_ratio: f32,
    pub tilt_spread: f32,
    pub radial_segments: u32,
    /// Inclusive range of leaves per branch.
    pub min_leaves: u32,
    pub max_leaves: u32,
    /// Leaves start this high up the branch...
    pub leaf_min_height: f32,
    /// ...and stop at this fraction of the branch's total height.
    pub leaf_max_fraction: f32,
    /// A branch gets a flower when a uniform draw exceeds this threshold.
    pub flower_threshold: f32,
    pub flower_scale: f32,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            min_count: 3,
            max_count: 5,
            min_separation: FRAC_PI_6,
            max_attempts: 20,
            min_tilt: 0.52,
            tilt_range: 0.5,
            min_height_factor: 0.2,
            max_height_factor: 0.8,
            min_segments: 3,
            max_segments: 5,
            min_segment_height: 0.15,
            segment_height_range: 0.1,
            base_radius: 0.03,
            taper: 0.2,
            bottom_ratio: 0.8,
            tilt_spread: 0.15,
            radial_segments: 8,
            min_leaves: 5,
            max_leaves: 9,
            leaf_min_height: 0.1,
            leaf_max_fraction: 0.9,
            flower_threshold: 0.5,
            flower_scale: 0.8,
        }
    }
}

/// Leaf placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafConfig {
    /// Main stem target is `base_count + floor(moisture / moisture_step)`.
    pub base_count: u32,
    pub moisture_step: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Full-width orientation jitter on both blade axes (radians).
    pub orientation_jitter: f32,
}

impl Default for LeafConfig {
    fn default() -> Self {
        Self {
            base_count: 10,
            moisture_step: 10.0,
            min_scale: 0.2,
            max_scale: 0.35,
            orientation_jitter: 0.3,
        }
    }
}

/// Flower composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    /// Petal base colors as `0xRRGGBB`; one is picked per flower.
    pub palette: Vec<u32>,
    pub petals_per_row: u32,
    /// Full-width per-petal hue jitter.
    pub hue_jitter: f32,
    /// Full-width per-petal lightness jitter.
    pub lightness_jitter: f32,
    /// Full-width petal orientation jitter (radians).
    pub tilt_jitter: f32,
    /// Scale of the flower on the main stem.
    pub main_scale: f32,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            palette: vec![0xFF69B4, 0xFF0000, 0xFF4500, 0xFFB6C1, 0xFFFFFF],
            petals_per_row: 5,
            hue_jitter: 0.05,
            lightness_jitter: 0.1,
            tilt_jitter: 0.1,
            main_scale: 1.0,
        }
    }
}

/// Response of the structure to moisture and light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Light above this level no longer changes the pose.
    pub light_saturation: f32,
    /// Main stem lean on x per unit of dryness.
    pub main_moisture_lean: f32,
    /// Main stem lean on z per unit of darkness.
    pub main_light_lean: f32,
    /// Side branch sway amplitudes.
    pub branch_light_sway: f32,
    pub branch_moisture_sway: f32,
    /// Per-branch amplitude step; branch `k` scales by `1 + (k % 3) * step`.
    pub variation_step: f32,
    /// Branch tilt never drops below this while animating.
    pub min_tilt: f32,
    /// Per-axis window around the original rotation.
    pub max_deviation: f32,
    /// Leaf droop per unit of dryness.
    pub droop_x: f32,
    pub droop_z: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            light_saturation: 500.0,
            main_moisture_lean: 0.3,
            main_light_lean: 0.5,
            branch_light_sway: 0.3,
            branch_moisture_sway: 0.2,
            variation_step: 0.2,
            min_tilt: 0.52,
            max_deviation: 0.7,
            droop_x: 0.5,
            droop_z: 0.3,
        }
    }
}

/// Pot and soil under the plant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotConfig {
    pub enabled: bool,
    /// Lathe profile as `[radius, y]` pairs, bottom to rim.
    pub profile: Vec<[f32; 2]>,
    pub radial_segments: u32,
    pub position_y: f32,
    pub color: u32,
    pub soil_radius: f32,
    pub soil_height: f32,
    pub soil_y: f32,
    pub soil_color: u32,
}

impl Default for PotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            profile: vec![
                [0.0, 0.0],
                [0.5, 0.0],
                [0.6, 0.2],
                [0.7, 0.5],
                [0.6, 0.6],
                [0.4, 0.65],
                [0.0, 0.65],
            ],
            radial_segments: 32,
            position_y: 0.325,
            color: 0x8B4513,
            soil_radius: 0.45,
            soil_height: 0.1,
            soil_y: 0.65,
            soil_color: 0x5E2605,
        }
    }
}

/// Complete plant recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub stem: StemConfig,
    pub branches: BranchConfig,
    pub leaves: LeafConfig,
    pub flower: FlowerConfig,
    pub animation: AnimationConfig,
    pub pot: PotConfig,
    pub initial_moisture: f32,
    pub initial_light: f32,
    /// Spin the whole plant by a random yaw at creation.
    pub random_yaw: bool,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            stem: StemConfig::default(),
            branches: BranchConfig::default(),
            leaves: LeafConfig::default(),
            flower: FlowerConfig::default(),
            animation: AnimationConfig::default(),
            pot: PotConfig::default(),
            initial_moisture: 70.0,
            initial_light: 500.0,
            random_yaw: true,
        }
    }
}

impl PlantConfig {
    /// Load a recipe from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the recipe as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check that the recipe can produce a well-formed plant.
    pub fn validate(&self) -> Result<()> {
        let stem = &self.stem;
        ensure(stem.segments > 0, "stem.segments must be > 0")?;
        ensure(stem.segment_height > 0.0, "stem.segment_height must be > 0")?;
        ensure(stem.base_radius > 0.0, "stem.base_radius must be > 0")?;
        ensure(
            stem.taper >= 0.0 && stem.taper * (stem.segments as f32) < 1.0,
            "stem.taper must leave every segment with a positive radius",
        )?;
        ensure(
            stem.leaf_min_height <= stem.leaf_max_height,
            "stem.leaf_min_height must be <= stem.leaf_max_height",
        )?;

        let b = &self.branches;
        ensure(b.min_count <= b.max_count, "branches.min_count must be <= max_count")?;
        if b.max_count > 0 {
            ensure(
                stem.segments >= 2,
                "branches need a main stem with at least 2 segments",
            )?;
        }
        ensure(b.min_separation >= 0.0, "branches.min_separation must be >= 0")?;
        if b.min_separation > 0.0 {
            let capacity = (std::f32::consts::TAU / b.min_separation + 1e-4).floor() as u32;
            ensure(
                b.max_count <= capacity,
                format!(
                    "branches.max_count {} exceeds the {} branches the stem can host at this separation",
                    b.max_count, capacity
                ),
            )?;
        }
        ensure(b.max_attempts > 0, "branches.max_attempts must be > 0")?;
        ensure(b.min_tilt >= 0.0 && b.tilt_range >= 0.0, "branch tilt range must be non-negative")?;
        ensure(
            (0.0..=1.0).contains(&b.min_height_factor)
                && (0.0..=1.0).contains(&b.max_height_factor)
                && b.min_height_factor <= b.max_height_factor,
            "branch height factors must satisfy 0 <= min <= max <= 1",
        )?;
        ensure(
            b.min_segments > 0 && b.min_segments <= b.max_segments,
            "branches.min_segments must be > 0 and <= max_segments",
        )?;
        ensure(b.min_segment_height > 0.0, "branches.min_segment_height must be > 0")?;
        ensure(b.segment_height_range >= 0.0, "branches.segment_height_range must be >= 0")?;
        ensure(b.base_radius > 0.0, "branches.base_radius must be > 0")?;
        ensure(
            b.taper >= 0.0 && b.taper * ((b.max_segments - 1) as f32) < 1.0,
            "branches.taper must leave every segment with a positive radius",
        )?;
        ensure(b.bottom_ratio > 0.0, "branches.bottom_ratio must be > 0")?;
        ensure(b.min_leaves <= b.max_leaves, "branches.min_leaves must be <= max_leaves")?;

        let l = &self.leaves;
        ensure(l.moisture_step > 0.0, "leaves.moisture_step must be > 0")?;
        ensure(
            l.min_scale > 0.0 && l.min_scale <= l.max_scale,
            "leaves.min_scale must be > 0 and <= max_scale",
        )?;

        let f = &self.flower;
        ensure(!f.palette.is_empty(), "flower.palette must not be empty")?;
        ensure(f.petals_per_row > 0, "flower.petals_per_row must be > 0")?;
        ensure(f.main_scale > 0.0, "flower.main_scale must be > 0")?;

        let a = &self.animation;
        ensure(a.light_saturation > 0.0, "animation.light_saturation must be > 0")?;
        ensure(a.max_deviation >= 0.0, "animation.max_deviation must be >= 0")?;

        if self.pot.enabled {
            ensure(self.pot.profile.len() >= 2, "pot.profile needs at least 2 points")?;
            ensure(self.pot.soil_radius > 0.0, "pot.soil_radius must be > 0")?;
        }

        ensure(
            (0.0..=100.0).contains(&self.initial_moisture),
            "initial_moisture must be within [0, 100]",
        )?;
        ensure(self.initial_light >= 0.0, "initial_light must be >= 0")?;
        Ok(())
    }
}

fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::InvalidConfig(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        PlantConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_matches_stock_recipe() {
        let c = PlantConfig::default();
        assert_eq!(c.stem.segments, 5);
        assert_eq!(c.initial_moisture, 70.0);
        assert_eq!(c.initial_light, 500.0);
        assert_eq!(c.flower.palette.len(), 5);
        assert_eq!(c.pot.profile.len(), 7);
    }

    #[test]
    fn test_rejects_empty_stem() {
        let mut c = PlantConfig::default();
        c.stem.segments = 0;
        assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let mut c = PlantConfig::default();
        c.branches.min_count = 6;
        assert!(c.validate().is_err());

        let mut c = PlantConfig::default();
        c.leaves.min_scale = 0.5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_too_many_branches_for_separation() {
        let mut c = PlantConfig::default();
        c.branches.max_count = 13;
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_single_segment_stem_cannot_host_branches() {
        let mut c = PlantConfig::default();
        c.stem.segments = 1;
        assert!(c.validate().is_err());

        c.branches.min_count = 0;
        c.branches.max_count = 0;
        c.validate().unwrap();
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("plant.json");

        let mut config = PlantConfig::default();
        config.initial_moisture = 25.0;
        config.flower.palette = vec![0xFFFFFF];
        config.save(&path).unwrap();

        let loaded = PlantConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "initial_light": 120.0, "stem": { "segments": 6 } }"#).unwrap();

        let loaded = PlantConfig::load(&path).unwrap();
        assert_eq!(loaded.initial_light, 120.0);
        assert_eq!(loaded.stem.segments, 6);
        assert_eq!(loaded.stem.segment_height, 0.25);
        assert_eq!(loaded.branches, BranchConfig::default());
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(PlantConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        std::fs::write(&path, r#"{ "initial_moisture": 150.0 }"#).unwrap();
        assert!(matches!(PlantConfig::load(&path), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            PlantConfig::load("/nonexistent/plant.json"),
            Err(Error::Io(_))
        ));
    }
}
