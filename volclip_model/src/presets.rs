use volclip_structs::Vector3;

use crate::{Model, ModelError, Poly};

/// Axis-aligned box brush centred on the origin, faces wound outward.
pub fn box_polys(half: Vector3, flags: u32) -> Result<Vec<Poly>, ModelError> {
    let Vector3 { x, y, z } = half;
    let faces: [[[f64; 3]; 4]; 6] = [
        [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]],
        [[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]],
        [[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]],
        [[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]],
        [[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]],
        [[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]],
    ];

    faces
        .iter()
        .map(|quad| {
            let mut poly = Poly::new(quad.iter().map(|v| Vector3::from(*v)), flags);
            poly.finalize()?;
            Ok(poly)
        })
        .collect()
}

/// Box brush with its polygon list filled in but no partition yet.
pub fn box_model(half: Vector3, flags: u32) -> Result<Model, ModelError> {
    Ok(Model::from_polys(box_polys(half, flags)?))
}
