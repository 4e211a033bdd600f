//! Wavefront OBJ snapshot of a baked scene.
//!
//! Every baked object becomes its own `o` object with world-space
//! positions and normals. The resolved color is written as a comment since
//! plain OBJ has no per-object color without a material library.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::types::Result;

use super::flatten::BakedScene;

/// Write `scene` as OBJ text to `writer`.
pub fn write_obj<W: Write>(scene: &BakedScene, writer: &mut W) -> Result<()> {
    writeln!(writer, "# plant-twin OBJ snapshot")?;
    writeln!(writer, "# {} objects", scene.objects.len())?;

    for (i, object) in scene.objects.iter().enumerate() {
        writeln!(writer, "o node{}_{}", object.node.0, i)?;
        let c = object.color;
        writeln!(writer, "# color {:.4} {:.4} {:.4}", c.r, c.g, c.b)?;

        for v in scene.object_vertices(object) {
            let [x, y, z] = v.position;
            writeln!(writer, "v {x} {y} {z}")?;
        }
        for v in scene.object_vertices(object) {
            let [x, y, z] = v.normal;
            writeln!(writer, "vn {x} {y} {z}")?;
        }
        // OBJ indices are 1-based
        for tri in scene.object_indices(object).chunks_exact(3) {
            let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write `scene` to an OBJ file at `path`, replacing any existing file.
pub fn save_obj(path: impl AsRef<Path>, scene: &BakedScene) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_obj(scene, &mut writer)
}
