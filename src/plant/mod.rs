//! Procedural potted plant that reacts to moisture and light.
//!
//! A [`Plant`] is generated once from a [`PlantConfig`] and a random source:
//! pot and soil, a tapered main stem with leaves and a flower, and three to
//! five side branches with their own leaves and, sometimes, a flower.
//! [`Plant::update`] then re-poses and recolors that fixed structure for new
//! moisture and light levels. Only the main stem's leaves are ever rebuilt.
//!
//! ```
//! use plant_twin::plant::Plant;
//!
//! let mut plant = Plant::from_seed(42);
//! plant.update(25.0, 700.0);
//! assert_eq!(plant.main_stem().leaf_count(), 12);
//! ```

pub mod animator;
pub mod branch;
pub mod config;
pub mod flower;
pub mod health;
pub mod leaf;
pub mod placement;
pub mod pot;
pub mod shape;
pub mod stem;

pub use branch::{AngleSample, Branch, sample_branch_angle};
pub use config::{
    AnimationConfig, BranchConfig, FlowerConfig, LeafConfig, PlantConfig, PotConfig, StemConfig,
};
pub use flower::{Flower, FlowerGroup, Petal};
pub use health::{LeafColor, health_score};
pub use leaf::{Leaf, LeafGroup};
pub use placement::target_leaf_count;
pub use pot::Pot;
pub use shape::{OrganMeshes, PetalRow};
pub use stem::{Segment, Stem};

use std::f32::consts::TAU;

use crate::core::{RandomSource, Result, RngSource};
use crate::mesh::MeshLibrary;
use crate::scene::{BakedScene, FlatMeshEntry, SceneGraph, SceneNodeId, bake};

use animator::EnvironmentFactors;
use health::sanitize;

/// Everything a generation step may touch: the scene, the meshes, the
/// shared organ meshes, the recipe, the random source and the moisture
/// level that sets default leaf counts.
pub(crate) struct Growth<'a> {
    pub graph: &'a mut SceneGraph,
    pub meshes: &'a mut MeshLibrary,
    pub organs: &'a OrganMeshes,
    pub config: &'a PlantConfig,
    pub rng: &'a mut dyn RandomSource,
    pub moisture: f32,
}

fn clamp_moisture(moisture: f32) -> f32 {
    sanitize(moisture).clamp(0.0, 100.0)
}

fn clamp_light(light: f32) -> f32 {
    sanitize(light).max(0.0)
}

/// A generated plant and its current environment.
pub struct Plant {
    config: PlantConfig,
    graph: SceneGraph,
    meshes: MeshLibrary,
    organs: OrganMeshes,
    rng: Box<dyn RandomSource + Send>,
    pot: Option<Pot>,
    main_stem: Stem,
    branches: Vec<Branch>,
    moisture: f32,
    light: f32,
}

impl Plant {
    /// Generate a plant from the default recipe with an OS-seeded source.
    pub fn new() -> Self {
        Self::build(PlantConfig::default(), Box::new(RngSource::from_entropy()))
    }

    /// Generate a reproducible plant from the default recipe.
    pub fn from_seed(seed: u64) -> Self {
        Self::build(PlantConfig::default(), Box::new(RngSource::seeded(seed)))
    }

    /// Generate a plant from a custom recipe and random source.
    pub fn with_config(
        config: PlantConfig,
        source: impl RandomSource + Send + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, Box::new(source)))
    }

    fn build(config: PlantConfig, mut rng: Box<dyn RandomSource + Send>) -> Self {
        let mut graph = SceneGraph::new("plant");
        let mut meshes = MeshLibrary::new();
        let organs = OrganMeshes::build(&mut meshes);
        let moisture = clamp_moisture(config.initial_moisture);
        let light = clamp_light(config.initial_light);
        let root = graph.root();

        let (pot, main_stem, branches) = {
            let mut growth = Growth {
                graph: &mut graph,
                meshes: &mut meshes,
                organs: &organs,
                config: &config,
                rng: &mut *rng,
                moisture,
            };

            let pot = config.pot.enabled.then(|| pot::build_pot(&mut growth, root));

            let mut main_stem = stem::build_main_stem(&mut growth, root);
            placement::place_leaves(
                &mut growth,
                &mut main_stem,
                config.stem.leaf_min_height,
                config.stem.leaf_max_height,
                None,
            );
            placement::place_flower(&mut growth, &mut main_stem, config.flower.main_scale);

            let branches = branch::attach_branches(&mut growth, &main_stem);

            if config.random_yaw {
                let yaw = growth.rng.next_f32() * TAU;
                if let Some(t) = growth.graph.transform_mut(root) {
                    t.rotation.y = yaw;
                }
            }

            (pot, main_stem, branches)
        };

        log::info!(
            "Plant created: {} branches, {} main leaves, {} branch flowers, {} nodes, {} meshes",
            branches.len(),
            main_stem.leaf_count(),
            branches.iter().filter(|b| b.stem.has_flower()).count(),
            graph.node_count(),
            meshes.len()
        );

        Self {
            config,
            graph,
            meshes,
            organs,
            rng,
            pot,
            main_stem,
            branches,
            moisture,
            light,
        }
    }

    /// Apply new environment levels.
    ///
    /// Moisture is clamped to `[0, 100]` and light to `>= 0`; NaN reads as 0.
    /// The main stem's leaves are rebuilt when their count no longer matches
    /// the moisture target, then every stem is re-posed and every leaf
    /// drooped from scratch.
    pub fn update(&mut self, moisture: f32, light: f32) {
        let moisture = clamp_moisture(moisture);
        let light = clamp_light(light);
        self.moisture = moisture;
        self.light = light;

        let target = target_leaf_count(moisture, &self.config.leaves);
        if self.main_stem.leaf_count() != target {
            log::debug!(
                "Main stem leaves {} -> {} at moisture {:.1}",
                self.main_stem.leaf_count(),
                target,
                moisture
            );
            let mut growth = Growth {
                graph: &mut self.graph,
                meshes: &mut self.meshes,
                organs: &self.organs,
                config: &self.config,
                rng: &mut *self.rng,
                moisture,
            };
            placement::place_leaves(
                &mut growth,
                &mut self.main_stem,
                self.config.stem.leaf_min_height,
                self.config.stem.leaf_max_height,
                Some(target),
            );
        }

        let cfg = &self.config.animation;
        let factors = EnvironmentFactors::new(moisture, light, cfg);
        animator::repose(&mut self.graph, &self.main_stem, &self.branches, factors, cfg);
        animator::droop_leaves(&mut self.graph, &self.main_stem, &self.branches, moisture, cfg);

        log::trace!(
            "Updated to moisture {:.1}, light {:.1}: health {:.3} ({:?})",
            moisture,
            light,
            self.health_score(),
            self.leaf_color()
        );
    }

    /// The mesh hierarchy. Its root is the plant's root group.
    pub fn scene(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn meshes(&self) -> &MeshLibrary {
        &self.meshes
    }

    pub fn organs(&self) -> &OrganMeshes {
        &self.organs
    }

    /// Drawable entries with foliage resolved to the current leaf color.
    pub fn flatten(&self) -> Vec<FlatMeshEntry> {
        self.graph.flatten(self.leaf_color().rgb())
    }

    /// World-space geometry of the whole plant in one buffer.
    pub fn bake(&self) -> Result<BakedScene> {
        bake(&self.flatten(), &self.meshes)
    }

    pub fn root(&self) -> SceneNodeId {
        self.graph.root()
    }

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    pub fn moisture(&self) -> f32 {
        self.moisture
    }

    pub fn light(&self) -> f32 {
        self.light
    }

    pub fn health_score(&self) -> f32 {
        health_score(self.moisture, self.light)
    }

    pub fn leaf_color(&self) -> LeafColor {
        LeafColor::for_environment(self.moisture, self.light)
    }

    pub fn pot(&self) -> Option<&Pot> {
        self.pot.as_ref()
    }

    pub fn main_stem(&self) -> &Stem {
        &self.main_stem
    }

    /// Side branches in creation order; branch `k` (1-based) is `branches()[k - 1]`.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Current tilt magnitude of every side branch.
    pub fn branch_tilts(&self) -> Vec<f32> {
        self.branches
            .iter()
            .map(|b| b.tilt_magnitude(&self.graph))
            .collect()
    }

    /// Leaves on every stem.
    pub fn total_leaf_count(&self) -> usize {
        self.main_stem.leaf_count() + self.branches.iter().map(|b| b.stem.leaf_count()).sum::<usize>()
    }
}

impl Default for Plant {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) struct TestBed<R: RandomSource = crate::core::ScriptedSource> {
    pub graph: SceneGraph,
    pub meshes: MeshLibrary,
    pub organs: OrganMeshes,
    pub config: PlantConfig,
    pub rng: R,
    pub moisture: f32,
}

#[cfg(test)]
impl<R: RandomSource> TestBed<R> {
    pub fn new(rng: R) -> Self {
        let mut meshes = MeshLibrary::new();
        let organs = OrganMeshes::build(&mut meshes);
        let config = PlantConfig::default();
        Self {
            graph: SceneGraph::new("test"),
            meshes,
            organs,
            moisture: config.initial_moisture,
            config,
            rng,
        }
    }

    pub fn growth(&mut self) -> Growth<'_> {
        Growth {
            graph: &mut self.graph,
            meshes: &mut self.meshes,
            organs: &self.organs,
            config: &self.config,
            rng: &mut self.rng,
            moisture: self.moisture,
        }
    }
}
