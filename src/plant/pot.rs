//! Pot and soil under the main stem.

use glam::{Vec2, Vec3};

use crate::core::color::Rgb;
use crate::mesh::primitives;
use crate::scene::{LocalTransform, Material, SceneNodeId};

use super::Growth;

/// Node handles of the pot and its soil disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pot {
    pub body: SceneNodeId,
    pub soil: SceneNodeId,
}

/// Build the lathe pot and soil disc under `parent`. Uses no randomness.
pub(crate) fn build_pot(growth: &mut Growth<'_>, parent: SceneNodeId) -> Pot {
    let cfg = &growth.config.pot;

    let profile: Vec<Vec2> = cfg.profile.iter().map(|&[r, y]| Vec2::new(r, y)).collect();
    let body_mesh = growth.meshes.add(primitives::lathe(&profile, cfg.radial_segments));
    let soil_mesh = growth.meshes.add(primitives::cylinder(
        cfg.soil_radius,
        cfg.soil_radius,
        cfg.soil_height,
        cfg.radial_segments,
    ));

    let body = growth.graph.add_mesh(
        parent,
        "pot",
        body_mesh,
        Material::Fixed(Rgb::from_hex(cfg.color)),
        LocalTransform::from_position(Vec3::new(0.0, cfg.position_y, 0.0)),
    );
    let soil = growth.graph.add_mesh(
        parent,
        "soil",
        soil_mesh,
        Material::Fixed(Rgb::from_hex(cfg.soil_color)),
        LocalTransform::from_position(Vec3::new(0.0, cfg.soil_y, 0.0)),
    );

    Pot { body, soil }
}
