// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction methods for BRep entities.
//!
//! Every entity is created through the arena, which checks that referenced
//! sub-entities exist and keeps the adjacency index current.

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::*;

impl BrepArena {
    /// Returns the edge joining two vertices, creating it on first use.
    ///
    /// Edges are shared: asking for `(b, a)` after `(a, b)` returns the same key.
    pub fn add_edge(&mut self, start: VertexKey, end: VertexKey) -> Result<EdgeKey> {
        if !self.vertices.contains_key(start) {
            return Err(Error::VertexNotFound(start));
        }
        if !self.vertices.contains_key(end) {
            return Err(Error::VertexNotFound(end));
        }

        let canonical = if start < end { (start, end) } else { (end, start) };
        if let Some(&existing) = self.edge_lookup.get(&canonical) {
            return Ok(existing);
        }

        let key = self.edges.insert(EdgeData { start, end });
        self.edge_lookup.insert(canonical, key);
        Ok(key)
    }

    /// Creates a closed loop through the given vertices.
    ///
    /// Needs at least 3 vertices with no two consecutive ones equal.
    pub fn add_loop(&mut self, vertices: &[VertexKey]) -> Result<LoopKey> {
        if vertices.len() < 3 {
            return Err(Error::DegenerateFace("loop has fewer than 3 vertices"));
        }

        let n = vertices.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            if a == b {
                return Err(Error::DegenerateFace("loop repeats a vertex"));
            }
            edges.push(self.add_edge(a, b)?);
        }

        Ok(self.loops.insert(LoopData {
            vertices: vertices.to_vec(),
            edges,
        }))
    }

    /// Creates a face from an outer loop and hole loops.
    pub fn add_face(&mut self, outer: LoopKey, inner: &[LoopKey]) -> Result<FaceKey> {
        for &l in std::iter::once(&outer).chain(inner) {
            if !self.loops.contains_key(l) {
                return Err(Error::LoopNotFound(l));
            }
        }

        let key = self.faces.insert(FaceData {
            outer,
            inner: inner.to_vec(),
        });

        let edges: Vec<EdgeKey> = std::iter::once(&outer)
            .chain(inner)
            .flat_map(|&l| self.loops[l].edges.clone())
            .collect();
        for edge in edges {
            self.link_edge_face(edge, key);
        }

        Ok(key)
    }

    /// Creates a shell from a set of faces.
    pub fn add_shell(&mut self, faces: &[FaceKey]) -> Result<ShellKey> {
        if faces.is_empty() {
            return Err(Error::EmptyShell);
        }
        for &f in faces {
            if !self.faces.contains_key(f) {
                return Err(Error::FaceNotFound(f));
            }
        }

        let key = self.shells.insert(ShellData {
            faces: faces.to_vec(),
        });
        for &f in faces {
            self.link_face_shell(f, key);
        }
        Ok(key)
    }

    /// Creates a solid bounded by `outer` with internal voids.
    ///
    /// Every shell must be closed and consistently oriented, and the net
    /// volume must be positive.
    pub fn add_solid(&mut self, outer: ShellKey, voids: &[ShellKey]) -> Result<SolidKey> {
        for &shell in std::iter::once(&outer).chain(voids) {
            self.check_closed_shell(shell)?;
        }

        let key = self.solids.insert(SolidData {
            outer,
            voids: voids.to_vec(),
        });

        let volume = self.solid_volume(key)?;
        if volume <= f64::EPSILON {
            self.solids.remove(key);
            return Err(Error::NonPositiveVolume(volume));
        }
        Ok(key)
    }

    /// Fails unless the shell is closed and consistently oriented
    pub fn check_closed_shell(&self, shell: ShellKey) -> Result<()> {
        if !self.shells.contains_key(shell) {
            return Err(Error::ShellNotFound(shell));
        }
        let open_edges = self.shell_open_edge_count(shell);
        if open_edges > 0 {
            return Err(Error::OpenShell(open_edges));
        }
        if !self.shell_is_consistently_oriented(shell) {
            return Err(Error::InconsistentOrientation);
        }
        Ok(())
    }
}
