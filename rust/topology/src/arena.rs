// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for boundary representations.
//!
//! The [`BrepArena`] owns every vertex, edge, loop, face, shell and solid of
//! one or more BReps. Entities live in slot maps with stable keys; upward
//! adjacency (edge → faces, face → shells) is maintained on insert so that
//! closure and orientation checks never rescan the arena.

use nalgebra::Point3;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::keys::*;

/// Data stored for an edge: an unordered pair of vertices.
///
/// `start`/`end` record the direction of the first loop that used the edge.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub start: VertexKey,
    pub end: VertexKey,
}

/// Data stored for a loop: a closed ring of vertices.
///
/// `edges[i]` joins `vertices[i]` and `vertices[(i + 1) % n]`.
#[derive(Debug, Clone)]
pub struct LoopData {
    pub vertices: Vec<VertexKey>,
    pub edges: Vec<EdgeKey>,
}

/// Data stored for a face: one outer loop and zero or more holes.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub outer: LoopKey,
    pub inner: Vec<LoopKey>,
}

/// Data stored for a shell: a connected set of faces.
#[derive(Debug, Clone)]
pub struct ShellData {
    pub faces: Vec<FaceKey>,
}

/// Data stored for a solid: an outer shell with optional void shells.
#[derive(Debug, Clone)]
pub struct SolidData {
    pub outer: ShellKey,
    pub voids: Vec<ShellKey>,
}

/// The central arena owning all BRep entities and their adjacency indices.
///
/// # Example
///
/// ```
/// use ifc_shape_topology::BrepArena;
///
/// let mut arena = BrepArena::new();
/// let v0 = arena.add_vertex(0.0, 0.0, 0.0);
/// let v1 = arena.add_vertex(1.0, 0.0, 0.0);
/// let v2 = arena.add_vertex(0.0, 1.0, 0.0);
/// let outer = arena.add_loop(&[v0, v1, v2]).unwrap();
/// let face = arena.add_face(outer, &[]).unwrap();
///
/// assert_eq!(arena.vertex_count(), 3);
/// assert_eq!(arena.edge_count(), 3);
/// assert!(arena.face(face).is_some());
/// ```
#[derive(Debug, Default, Clone)]
pub struct BrepArena {
    pub(crate) vertices: SlotMap<VertexKey, Point3<f64>>,
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    pub(crate) loops: SlotMap<LoopKey, LoopData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,
    pub(crate) shells: SlotMap<ShellKey, ShellData>,
    pub(crate) solids: SlotMap<SolidKey, SolidData>,

    /// Edge sharing: (min vertex, max vertex) → edge
    pub(crate) edge_lookup: FxHashMap<(VertexKey, VertexKey), EdgeKey>,

    // Upward adjacency: child → parents
    pub(crate) edge_to_faces: FxHashMap<EdgeKey, SmallVec<[FaceKey; 2]>>,
    pub(crate) face_to_shells: FxHashMap<FaceKey, SmallVec<[ShellKey; 1]>>,
}

impl BrepArena {
    /// Creates a new, empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    pub fn add_vertex(&mut self, x: f64, y: f64, z: f64) -> VertexKey {
        self.vertices.insert(Point3::new(x, y, z))
    }

    pub fn vertex(&self, key: VertexKey) -> Option<&Point3<f64>> {
        self.vertices.get(key)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Edge operations ---

    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Loop operations ---

    pub fn loop_data(&self, key: LoopKey) -> Option<&LoopData> {
        self.loops.get(key)
    }

    // --- Face operations ---

    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // --- Shell operations ---

    pub fn shell(&self, key: ShellKey) -> Option<&ShellData> {
        self.shells.get(key)
    }

    pub fn shell_count(&self) -> usize {
        self.shells.len()
    }

    // --- Solid operations ---

    pub fn solid(&self, key: SolidKey) -> Option<&SolidData> {
        self.solids.get(key)
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    // --- Adjacency helpers ---

    pub(crate) fn link_edge_face(&mut self, edge: EdgeKey, face: FaceKey) {
        let faces = self.edge_to_faces.entry(edge).or_default();
        if !faces.contains(&face) {
            faces.push(face);
        }
    }

    pub(crate) fn link_face_shell(&mut self, face: FaceKey, shell: ShellKey) {
        let shells = self.face_to_shells.entry(face).or_default();
        if !shells.contains(&shell) {
            shells.push(shell);
        }
    }
}
