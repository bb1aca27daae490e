// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shell construction from raw face loops with tolerance-based vertex and
//! edge sharing (face sewing).
//!
//! Faces that cannot be represented exactly are rejected one by one instead of
//! failing the whole shell, so callers can route them to a mesh fallback.

use nalgebra::{Point3, Vector3};

use crate::arena::BrepArena;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::spatial::SpatialIndex;

/// Boundary of one planar face: outer loop plus holes, in 3D
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceLoops {
    pub outer: Vec<Point3<f64>>,
    pub inner: Vec<Vec<Point3<f64>>>,
}

impl FaceLoops {
    pub fn new(outer: Vec<Point3<f64>>) -> Self {
        Self {
            outer,
            inner: Vec::new(),
        }
    }

    pub fn with_holes(outer: Vec<Point3<f64>>, inner: Vec<Vec<Point3<f64>>>) -> Self {
        Self { outer, inner }
    }
}

/// Result of [`BrepArena::sew_shell`]
#[derive(Debug)]
pub struct SewnShell {
    pub shell: ShellKey,
    /// (input index, face) for every accepted face
    pub faces: Vec<(usize, FaceKey)>,
    /// (input index, reason) for every rejected face
    pub rejected: Vec<(usize, Error)>,
}

impl BrepArena {
    /// Creates a shell from face loops, merging vertices within `tolerance`.
    ///
    /// Fails with [`Error::EmptyShell`] only when no face survives.
    pub fn sew_shell(&mut self, faces: &[FaceLoops], tolerance: f64) -> Result<SewnShell> {
        let mut index = SpatialIndex::new(tolerance.max(1e-10));
        let mut accepted = Vec::with_capacity(faces.len());
        let mut rejected = Vec::new();

        for (i, face) in faces.iter().enumerate() {
            match self.sew_face(&mut index, face, tolerance) {
                Ok(key) => accepted.push((i, key)),
                Err(e) => rejected.push((i, e)),
            }
        }

        if accepted.is_empty() {
            return Err(Error::EmptyShell);
        }

        let keys: Vec<FaceKey> = accepted.iter().map(|&(_, f)| f).collect();
        let shell = self.add_shell(&keys)?;
        Ok(SewnShell {
            shell,
            faces: accepted,
            rejected,
        })
    }

    fn sew_face(
        &mut self,
        index: &mut SpatialIndex,
        face: &FaceLoops,
        tolerance: f64,
    ) -> Result<FaceKey> {
        let outer = self.merge_ring(index, &face.outer, tolerance);
        if outer.len() < 3 {
            return Err(Error::DegenerateFace("fewer than 3 distinct vertices"));
        }
        if self.ring_normal(&outer).norm() <= tolerance * tolerance {
            return Err(Error::DegenerateFace("zero area"));
        }

        let mut holes = Vec::with_capacity(face.inner.len());
        for ring in &face.inner {
            let hole = self.merge_ring(index, ring, tolerance);
            // A collapsed hole bounds nothing
            if hole.len() >= 3 {
                holes.push(self.add_loop(&hole)?);
            }
        }

        let outer = self.add_loop(&outer)?;
        self.add_face(outer, &holes)
    }

    /// Merged vertex ring with consecutive and wrap-around duplicates removed
    fn merge_ring(
        &mut self,
        index: &mut SpatialIndex,
        points: &[Point3<f64>],
        tolerance: f64,
    ) -> Vec<VertexKey> {
        let mut ring: Vec<VertexKey> = Vec::with_capacity(points.len());
        for p in points {
            let v = self.find_or_add_vertex(index, p.x, p.y, p.z, tolerance);
            if ring.last() != Some(&v) {
                ring.push(v);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        ring
    }

    /// Unnormalized Newell normal (length = 2 × area)
    pub(crate) fn ring_normal(&self, ring: &[VertexKey]) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        let n = ring.len();
        for i in 0..n {
            let (Some(curr), Some(next)) = (self.vertex(ring[i]), self.vertex(ring[(i + 1) % n]))
            else {
                continue;
            };
            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }
        normal
    }
}

/// Axis-aligned box faces with outward winding, for tests and demos
pub fn box_faces(min: [f64; 3], max: [f64; 3]) -> Vec<FaceLoops> {
    let p = |x: usize, y: usize, z: usize| {
        Point3::new(
            if x == 0 { min[0] } else { max[0] },
            if y == 0 { min[1] } else { max[1] },
            if z == 0 { min[2] } else { max[2] },
        )
    };
    vec![
        FaceLoops::new(vec![p(0, 0, 0), p(0, 1, 0), p(1, 1, 0), p(1, 0, 0)]), // bottom
        FaceLoops::new(vec![p(0, 0, 1), p(1, 0, 1), p(1, 1, 1), p(0, 1, 1)]), // top
        FaceLoops::new(vec![p(0, 0, 0), p(1, 0, 0), p(1, 0, 1), p(0, 0, 1)]), // front
        FaceLoops::new(vec![p(0, 1, 0), p(0, 1, 1), p(1, 1, 1), p(1, 1, 0)]), // back
        FaceLoops::new(vec![p(0, 0, 0), p(0, 0, 1), p(0, 1, 1), p(0, 1, 0)]), // left
        FaceLoops::new(vec![p(1, 0, 0), p(1, 1, 0), p(1, 1, 1), p(1, 0, 1)]), // right
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sew_cube_shares_vertices_and_edges() {
        let mut arena = BrepArena::new();
        let sewn = arena
            .sew_shell(&box_faces([0.0; 3], [1.0; 3]), 1e-6)
            .unwrap();

        assert_eq!(sewn.faces.len(), 6);
        assert!(sewn.rejected.is_empty());
        assert_eq!(arena.vertex_count(), 8);
        assert_eq!(arena.edge_count(), 12);
        assert!(arena.shell_is_closed(sewn.shell));
    }

    #[test]
    fn sew_merges_within_tolerance() {
        let mut arena = BrepArena::new();
        let mut faces = box_faces([0.0; 3], [1.0; 3]);
        faces[1].outer[0].x += 1e-7;
        let sewn = arena.sew_shell(&faces, 1e-6).unwrap();
        assert_eq!(arena.vertex_count(), 8);
        assert!(arena.shell_is_closed(sewn.shell));
    }

    #[test]
    fn degenerate_faces_are_rejected_individually() {
        let mut arena = BrepArena::new();
        let mut faces = box_faces([0.0; 3], [1.0; 3]);
        // Two distinct points only
        faces[2] = FaceLoops::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ]);
        // Collinear
        faces[3] = FaceLoops::new(vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]);

        let sewn = arena.sew_shell(&faces, 1e-6).unwrap();
        assert_eq!(sewn.faces.len(), 4);
        let rejected: Vec<usize> = sewn.rejected.iter().map(|(i, _)| *i).collect();
        assert_eq!(rejected, vec![2, 3]);
        assert!(!arena.shell_is_closed(sewn.shell));
    }

    #[test]
    fn all_faces_rejected_is_empty_shell() {
        let mut arena = BrepArena::new();
        let faces = vec![FaceLoops::new(vec![Point3::origin(); 3])];
        assert!(matches!(arena.sew_shell(&faces, 1e-6), Err(Error::EmptyShell)));
    }
}
