// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric queries on BRep entities: normals, areas, triangulation and
//! enclosed volume.

use nalgebra::{Point3, Vector3};

use crate::arena::BrepArena;
use crate::error::{Error, Result};
use crate::keys::*;

impl BrepArena {
    /// Face normal by Newell's method, following the outer loop winding
    pub fn face_normal(&self, key: FaceKey) -> Option<Vector3<f64>> {
        let face = self.faces.get(key)?;
        let normal = self.ring_normal(&self.loops.get(face.outer)?.vertices);
        let len = normal.norm();
        if len < 1e-15 {
            return None;
        }
        Some(normal / len)
    }

    /// Face area with holes subtracted
    pub fn face_area(&self, key: FaceKey) -> Option<f64> {
        let face = self.faces.get(key)?;
        let mut area = self.ring_normal(&self.loops.get(face.outer)?.vertices).norm() / 2.0;
        for &hole in &face.inner {
            area -= self.ring_normal(&self.loops.get(hole)?.vertices).norm() / 2.0;
        }
        Some(area.max(0.0))
    }

    /// Triangulates a face with earcut over its dominant-axis projection.
    ///
    /// Triangles are wound to agree with [`face_normal`](Self::face_normal).
    pub fn triangulate_face(&self, key: FaceKey) -> Result<Vec<[VertexKey; 3]>> {
        let face = self.faces.get(key).ok_or(Error::FaceNotFound(key))?;
        let normal = self
            .face_normal(key)
            .ok_or(Error::DegenerateFace("zero area"))?;

        let abs_n = normal.abs();
        let (ax_u, ax_v) = if abs_n.z >= abs_n.x && abs_n.z >= abs_n.y {
            (0, 1) // XY
        } else if abs_n.y >= abs_n.x {
            (0, 2) // XZ
        } else {
            (1, 2) // YZ
        };

        let mut coords_2d: Vec<f64> = Vec::new();
        let mut all_verts: Vec<VertexKey> = Vec::new();
        let mut hole_indices: Vec<usize> = Vec::new();

        for (i, l) in std::iter::once(face.outer)
            .chain(face.inner.iter().copied())
            .enumerate()
        {
            let data = self.loops.get(l).ok_or(Error::LoopNotFound(l))?;
            if i > 0 {
                hole_indices.push(all_verts.len());
            }
            for &vk in &data.vertices {
                let p = self.vertex(vk).ok_or(Error::VertexNotFound(vk))?;
                coords_2d.push(p[ax_u]);
                coords_2d.push(p[ax_v]);
                all_verts.push(vk);
            }
        }

        let indices = earcutr::earcut(&coords_2d, &hole_indices, 2)
            .map_err(|e| Error::Triangulation(format!("{:?}", e)))?;

        let mut triangles = Vec::with_capacity(indices.len() / 3);
        for chunk in indices.chunks_exact(3) {
            let tri = [all_verts[chunk[0]], all_verts[chunk[1]], all_verts[chunk[2]]];
            let [a, b, c] = tri.map(|v| self.vertices[v]);
            if (b - a).cross(&(c - a)).dot(&normal) < 0.0 {
                triangles.push([tri[0], tri[2], tri[1]]);
            } else {
                triangles.push(tri);
            }
        }
        Ok(triangles)
    }

    /// Signed enclosed volume of a shell by the signed tetrahedron method.
    ///
    /// Positive for outward-facing winding.
    pub fn shell_signed_volume(&self, key: ShellKey) -> Result<f64> {
        let faces = self.shell_faces(key).ok_or(Error::ShellNotFound(key))?;
        let mut volume = 0.0;
        for &face in faces {
            for [a, b, c] in self.triangulate_face(face)? {
                let (p0, p1, p2) = (self.vertices[a], self.vertices[b], self.vertices[c]);
                volume += p0.coords.dot(&p1.coords.cross(&p2.coords));
            }
        }
        Ok(volume / 6.0)
    }

    /// |outer| minus the sum of |void| volumes
    pub fn solid_volume(&self, key: SolidKey) -> Result<f64> {
        let solid = self
            .solids
            .get(key)
            .ok_or(Error::SolidNotFound(key))?;
        let mut volume = self.shell_signed_volume(solid.outer)?.abs();
        for &void in &solid.voids {
            volume -= self.shell_signed_volume(void)?.abs();
        }
        Ok(volume)
    }

    /// Axis-aligned bounds of every vertex in the arena
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut iter = self.vertices.values();
        let first = *iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::builders::{box_faces, FaceLoops};
    use crate::error::Error;
    use crate::BrepArena;
    use nalgebra::Point3;

    #[test]
    fn cube_volume_and_normals() {
        let mut arena = BrepArena::new();
        let sewn = arena.sew_shell(&box_faces([0.0; 3], [2.0, 1.0, 1.0]), 1e-6).unwrap();
        assert_relative_eq!(arena.shell_signed_volume(sewn.shell).unwrap(), 2.0, epsilon = 1e-9);

        let solid = arena.add_solid(sewn.shell, &[]).unwrap();
        assert_relative_eq!(arena.solid_volume(solid).unwrap(), 2.0, epsilon = 1e-9);

        let (_, bottom) = sewn.faces[0];
        let n = arena.face_normal(bottom).unwrap();
        assert_relative_eq!(n.z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(arena.face_area(bottom).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn inward_shell_has_negative_signed_volume() {
        let mut arena = BrepArena::new();
        let mut faces = box_faces([0.0; 3], [1.0; 3]);
        for f in &mut faces {
            f.outer.reverse();
        }
        let sewn = arena.sew_shell(&faces, 1e-6).unwrap();
        assert_relative_eq!(arena.shell_signed_volume(sewn.shell).unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn solid_with_void_subtracts_volume() {
        let mut arena = BrepArena::new();
        let outer = arena.sew_shell(&box_faces([0.0; 3], [3.0; 3]), 1e-6).unwrap();
        let inner = arena.sew_shell(&box_faces([1.0; 3], [2.0; 3]), 1e-6).unwrap();
        let solid = arena.add_solid(outer.shell, &[inner.shell]).unwrap();
        assert_relative_eq!(arena.solid_volume(solid).unwrap(), 26.0, epsilon = 1e-9);
        assert_eq!(arena.solid_faces(solid).unwrap().len(), 12);
    }

    #[test]
    fn open_shell_cannot_bound_solid() {
        let mut arena = BrepArena::new();
        let faces: Vec<FaceLoops> = box_faces([0.0; 3], [1.0; 3]).into_iter().take(5).collect();
        let sewn = arena.sew_shell(&faces, 1e-6).unwrap();
        assert!(matches!(arena.add_solid(sewn.shell, &[]), Err(Error::OpenShell(4))));
        assert_eq!(arena.solid_count(), 0);
    }

    #[test]
    fn triangulate_face_with_hole() {
        let mut arena = BrepArena::new();
        let outer = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 4.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        let hole = vec![
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
            Point3::new(3.0, 3.0, 0.0),
            Point3::new(3.0, 1.0, 0.0),
        ];
        let sewn = arena
            .sew_shell(&[FaceLoops::with_holes(outer, vec![hole])], 1e-6)
            .unwrap();
        let (_, face) = sewn.faces[0];
        let triangles = arena.triangulate_face(face).unwrap();
        assert_eq!(triangles.len(), 8);
        assert_relative_eq!(arena.face_area(face).unwrap(), 12.0, epsilon = 1e-12);
    }
}
