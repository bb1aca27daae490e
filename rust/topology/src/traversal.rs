// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Downward/upward traversal and shell validity checks.

use nalgebra::Point3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::BrepArena;
use crate::keys::*;

impl BrepArena {
    /// Loop vertex positions in loop order
    pub fn loop_points(&self, key: LoopKey) -> Option<Vec<Point3<f64>>> {
        let data = self.loops.get(key)?;
        data.vertices.iter().map(|&v| self.vertex(v).copied()).collect()
    }

    /// Outer loop first, then holes
    pub fn face_loops(&self, key: FaceKey) -> Option<Vec<LoopKey>> {
        let face = self.faces.get(key)?;
        Some(std::iter::once(face.outer).chain(face.inner.iter().copied()).collect())
    }

    pub fn shell_faces(&self, key: ShellKey) -> Option<&[FaceKey]> {
        self.shells.get(key).map(|s| s.faces.as_slice())
    }

    /// Every face of a solid, outer shell first
    pub fn solid_faces(&self, key: SolidKey) -> Option<Vec<FaceKey>> {
        let solid = self.solids.get(key)?;
        let mut faces = Vec::new();
        for shell in std::iter::once(solid.outer).chain(solid.voids.iter().copied()) {
            faces.extend_from_slice(self.shell_faces(shell)?);
        }
        Some(faces)
    }

    /// Faces bounded by an edge
    pub fn edge_faces(&self, key: EdgeKey) -> &[FaceKey] {
        self.edge_to_faces.get(&key).map_or(&[], |f| f.as_slice())
    }

    /// Shells containing a face
    pub fn face_shells(&self, key: FaceKey) -> &[ShellKey] {
        self.face_to_shells.get(&key).map_or(&[], |s| s.as_slice())
    }

    /// Edge usage counts over a shell's faces
    fn shell_edge_uses(&self, key: ShellKey) -> FxHashMap<EdgeKey, usize> {
        let mut uses: FxHashMap<EdgeKey, usize> = FxHashMap::default();
        for &face in self.shell_faces(key).unwrap_or(&[]) {
            for l in self.face_loops(face).unwrap_or_default() {
                if let Some(data) = self.loops.get(l) {
                    for &edge in &data.edges {
                        *uses.entry(edge).or_insert(0) += 1;
                    }
                }
            }
        }
        uses
    }

    /// Number of edges not used by exactly two faces of the shell
    pub fn shell_open_edge_count(&self, key: ShellKey) -> usize {
        self.shell_edge_uses(key).values().filter(|&&c| c != 2).count()
    }

    /// True when every edge is shared by exactly two faces of the shell
    pub fn shell_is_closed(&self, key: ShellKey) -> bool {
        let uses = self.shell_edge_uses(key);
        !uses.is_empty() && uses.values().all(|&c| c == 2)
    }

    /// True when no directed edge is traversed twice in the same direction
    pub fn shell_is_consistently_oriented(&self, key: ShellKey) -> bool {
        let mut seen: FxHashSet<(VertexKey, VertexKey)> = FxHashSet::default();
        for &face in self.shell_faces(key).unwrap_or(&[]) {
            for l in self.face_loops(face).unwrap_or_default() {
                let Some(data) = self.loops.get(l) else {
                    continue;
                };
                let n = data.vertices.len();
                for i in 0..n {
                    if !seen.insert((data.vertices[i], data.vertices[(i + 1) % n])) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::builders::{box_faces, FaceLoops};
    use crate::BrepArena;

    #[test]
    fn cube_is_closed_and_oriented() {
        let mut arena = BrepArena::new();
        let sewn = arena.sew_shell(&box_faces([0.0; 3], [1.0; 3]), 1e-6).unwrap();
        assert!(arena.shell_is_closed(sewn.shell));
        assert!(arena.shell_is_consistently_oriented(sewn.shell));
        assert_eq!(arena.shell_open_edge_count(sewn.shell), 0);

        let (_, face) = sewn.faces[0];
        let edge = arena.loop_data(arena.face(face).unwrap().outer).unwrap().edges[0];
        assert_eq!(arena.edge_faces(edge).len(), 2);
        assert_eq!(arena.face_shells(face), &[sewn.shell]);
    }

    #[test]
    fn flipped_face_breaks_orientation() {
        let mut arena = BrepArena::new();
        let mut faces = box_faces([0.0; 3], [1.0; 3]);
        faces[0].outer.reverse();
        let sewn = arena.sew_shell(&faces, 1e-6).unwrap();
        assert!(arena.shell_is_closed(sewn.shell));
        assert!(!arena.shell_is_consistently_oriented(sewn.shell));
    }

    #[test]
    fn missing_face_opens_shell() {
        let mut arena = BrepArena::new();
        let faces: Vec<FaceLoops> = box_faces([0.0; 3], [1.0; 3]).into_iter().skip(1).collect();
        let sewn = arena.sew_shell(&faces, 1e-6).unwrap();
        assert!(!arena.shell_is_closed(sewn.shell));
        assert_eq!(arena.shell_open_edge_count(sewn.shell), 4);
    }
}
