// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting 2D profiles to 3D meshes and BRep faces
//!
//! Profiles lie in the XY plane of their local system and are swept along
//! `direction` by `depth`. Both the mesh and the BRep paths wind every face
//! outward for either sign of the sweep's Z component.

use crate::error::{Error, Result};
use crate::materials::MaterialId;
use crate::mesh::{apply_transform, Mesh};
use crate::profile::{Profile2D, Triangulation};
use ifc_shape_topology::FaceLoops;
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Sweep vector for a validated direction and depth
pub fn sweep_vector(direction: &Vector3<f64>, depth: f64) -> Result<Vector3<f64>> {
    if !depth.is_finite() || depth <= 0.0 {
        return Err(Error::InvalidExtrusion(format!(
            "Depth must be positive, got {depth}"
        )));
    }
    let direction = direction
        .try_normalize(1e-12)
        .ok_or_else(|| Error::InvalidExtrusion("Zero-length direction".to_string()))?;
    if direction.z.abs() < 1e-9 {
        return Err(Error::InvalidExtrusion(
            "Direction lies in the profile plane".to_string(),
        ));
    }
    Ok(direction * depth)
}

/// Extrude a 2D profile into a mesh
pub fn extrude_profile(
    profile: &Profile2D,
    direction: &Vector3<f64>,
    depth: f64,
    transform: Option<&Matrix4<f64>>,
    material: Option<MaterialId>,
) -> Result<Mesh> {
    let offset = sweep_vector(direction, depth)?;
    let mut profile = profile.clone();
    profile.normalize_winding();

    let triangulation = profile.triangulate()?;

    let side_vertex_count: usize = std::iter::once(&profile.outer)
        .chain(&profile.holes)
        .map(|ring| ring.len() * 4)
        .sum();
    let mut mesh = Mesh::with_capacity(
        triangulation.points.len() * 2 + side_vertex_count,
        triangulation.indices.len() * 2 + side_vertex_count / 4 * 6,
    );

    let up = offset.z > 0.0;
    create_cap_mesh(&triangulation, &Vector3::zeros(), !up, material, &mut mesh);
    create_cap_mesh(&triangulation, &offset, up, material, &mut mesh);

    create_side_walls(&profile.outer, &offset, material, &mut mesh);
    for hole in &profile.holes {
        create_side_walls(hole, &offset, material, &mut mesh);
    }

    if let Some(mat) = transform {
        apply_transform(&mut mesh, mat);
    }

    Ok(mesh)
}

/// Create a cap mesh facing +Z (`up`) or -Z
fn create_cap_mesh(
    triangulation: &Triangulation,
    offset: &Vector3<f64>,
    up: bool,
    material: Option<MaterialId>,
    mesh: &mut Mesh,
) {
    let base_index = mesh.vertex_count() as u32;
    let normal = if up { Vector3::z() } else { -Vector3::z() };

    for point in &triangulation.points {
        mesh.add_vertex(Point3::new(point.x, point.y, 0.0) + offset, normal);
    }

    for tri in triangulation.indices.chunks_exact(3) {
        let (a, b, c) = (
            triangulation.points[tri[0]],
            triangulation.points[tri[1]],
            triangulation.points[tri[2]],
        );
        let ccw = (b - a).perp(&(c - a)) > 0.0;
        let [i0, i1, i2] = [tri[0], tri[1], tri[2]].map(|i| base_index + i as u32);
        if ccw == up {
            mesh.add_triangle_with_material(i0, i1, i2, material);
        } else {
            mesh.add_triangle_with_material(i0, i2, i1, material);
        }
    }
}

/// Create side walls for a profile boundary
fn create_side_walls(
    boundary: &[Point2<f64>],
    offset: &Vector3<f64>,
    material: Option<MaterialId>,
    mesh: &mut Mesh,
) {
    let flip = offset.z < 0.0;

    for i in 0..boundary.len() {
        let j = (i + 1) % boundary.len();
        let p0 = Point3::new(boundary[i].x, boundary[i].y, 0.0);
        let p1 = Point3::new(boundary[j].x, boundary[j].y, 0.0);

        // Skip degenerate edges (duplicate points in profile)
        let normal = match (p1 - p0).cross(offset).try_normalize(1e-10) {
            Some(n) if flip => -n,
            Some(n) => n,
            None => continue,
        };

        let idx = mesh.vertex_count() as u32;
        mesh.add_vertex(p0, normal);
        mesh.add_vertex(p1, normal);
        mesh.add_vertex(p1 + offset, normal);
        mesh.add_vertex(p0 + offset, normal);

        if flip {
            mesh.add_triangle_with_material(idx, idx + 2, idx + 1, material);
            mesh.add_triangle_with_material(idx, idx + 3, idx + 2, material);
        } else {
            mesh.add_triangle_with_material(idx, idx + 1, idx + 2, material);
            mesh.add_triangle_with_material(idx, idx + 2, idx + 3, material);
        }
    }
}

/// Boundary faces of an extruded profile, outward wound, in the placed
/// coordinate system: bottom cap, top cap, then one side per profile edge.
pub fn extrusion_faces(
    profile: &Profile2D,
    direction: &Vector3<f64>,
    depth: f64,
    transform: &Matrix4<f64>,
) -> Result<Vec<FaceLoops>> {
    let offset = sweep_vector(direction, depth)?;
    let mut profile = profile.clone();
    profile.normalize_winding();
    if profile.outer.len() < 3 {
        return Err(Error::InvalidProfile(
            "Profile must have at least 3 vertices".to_string(),
        ));
    }

    let lift = |ring: &[Point2<f64>], by: &Vector3<f64>| -> Vec<Point3<f64>> {
        ring.iter().map(|p| Point3::new(p.x, p.y, 0.0) + by).collect()
    };
    let reversed = |mut ring: Vec<Point3<f64>>| {
        ring.reverse();
        ring
    };

    let zero = Vector3::zeros();
    let mut faces = Vec::with_capacity(2 + profile.outer.len());

    faces.push(FaceLoops::with_holes(
        reversed(lift(&profile.outer, &zero)),
        profile.holes.iter().map(|h| reversed(lift(h, &zero))).collect(),
    ));
    faces.push(FaceLoops::with_holes(
        lift(&profile.outer, &offset),
        profile.holes.iter().map(|h| lift(h, &offset)).collect(),
    ));

    for ring in std::iter::once(&profile.outer).chain(&profile.holes) {
        let base = lift(ring, &zero);
        for i in 0..base.len() {
            let (p0, p1) = (base[i], base[(i + 1) % base.len()]);
            faces.push(FaceLoops::new(vec![p0, p1, p1 + offset, p0 + offset]));
        }
    }

    let flip = offset.z < 0.0;
    for face in &mut faces {
        for ring in std::iter::once(&mut face.outer).chain(face.inner.iter_mut()) {
            if flip {
                ring.reverse();
            }
            for p in ring.iter_mut() {
                *p = transform.transform_point(p);
            }
        }
    }

    Ok(faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{create_circle, create_rectangle};
    use approx::assert_relative_eq;

    #[test]
    fn test_extrude_rectangle() {
        let profile = create_rectangle(10.0, 5.0);
        let mesh = extrude_profile(&profile, &Vector3::z(), 20.0, None, None).unwrap();

        let (min, max) = mesh.bounds();
        assert!((min.x - -5.0).abs() < 0.01);
        assert!((max.x - 5.0).abs() < 0.01);
        assert!((min.y - -2.5).abs() < 0.01);
        assert!((max.z - 20.0).abs() < 0.01);
        assert_relative_eq!(mesh.signed_volume(), 1000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_extrude_downward_stays_outward() {
        let profile = create_rectangle(2.0, 2.0);
        let mesh = extrude_profile(&profile, &-Vector3::z(), 3.0, None, None).unwrap();
        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, -3.0);
        assert_relative_eq!(max.z, 0.0);
        assert_relative_eq!(mesh.signed_volume(), 12.0, epsilon = 1e-4);
    }

    #[test]
    fn test_extrude_with_transform() {
        let profile = create_rectangle(10.0, 5.0);
        let transform = Matrix4::new_translation(&Vector3::new(100.0, 200.0, 300.0));
        let mesh =
            extrude_profile(&profile, &Vector3::z(), 20.0, Some(&transform), None).unwrap();

        let (min, max) = mesh.bounds();
        assert!((min.x - 95.0).abs() < 0.01);
        assert!((max.y - 202.5).abs() < 0.01);
        assert!((min.z - 300.0).abs() < 0.01);
        assert!((max.z - 320.0).abs() < 0.01);
    }

    #[test]
    fn test_extrude_hollow_circle_volume() {
        let profile = create_circle(10.0, Some(5.0));
        let mesh =
            extrude_profile(&profile, &Vector3::z(), 1.0, None, Some(MaterialId(3))).unwrap();
        assert!(mesh.signed_volume() > 0.0);
        assert!(mesh.materials.iter().all(|m| *m == Some(MaterialId(3))));
    }

    #[test]
    fn test_invalid_sweeps() {
        let profile = create_rectangle(10.0, 5.0);
        for (dir, depth) in [
            (Vector3::z(), -1.0),
            (Vector3::z(), 0.0),
            (Vector3::z(), f64::NAN),
            (Vector3::zeros(), 1.0),
            (Vector3::x(), 1.0),
        ] {
            assert!(matches!(
                extrude_profile(&profile, &dir, depth, None, None),
                Err(Error::InvalidExtrusion(_))
            ));
        }
    }

    #[test]
    fn test_extrusion_faces_of_box() {
        let profile = create_rectangle(2.0, 1.0);
        let faces = extrusion_faces(&profile, &Vector3::z(), 3.0, &Matrix4::identity()).unwrap();
        assert_eq!(faces.len(), 6);
        assert_relative_eq!(faces[0].outer[0].z, 0.0);
        assert_relative_eq!(faces[1].outer[0].z, 3.0);
    }
}
