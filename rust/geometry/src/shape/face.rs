// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary loops and the faces built from them.

use ifc_shape_topology::FaceLoops;
use nalgebra::Point3;
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::fuzzy::CanonicalVertexMap;
use crate::materials::MaterialId;

/// A closed ring of at least 3 distinct canonical points
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLoop {
    points: Vec<Point3<f64>>,
}

impl BoundaryLoop {
    /// Validates `points` through the canonical vertex map.
    ///
    /// Consecutive duplicates and a closing point equal to the first are
    /// absorbed; any other repeat makes the loop self-intersecting.
    pub fn new(points: &[Point3<f64>], vertices: &mut CanonicalVertexMap) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::TooFewVertices(points.len()));
        }

        let mut ring: Vec<Point3<f64>> = Vec::with_capacity(points.len());
        for p in points {
            let canonical = vertices.lookup(*p);
            if ring.last() != Some(&canonical) {
                ring.push(canonical);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        let mut seen: FxHashSet<[u64; 3]> = FxHashSet::default();
        for (index, p) in ring.iter().enumerate() {
            if !seen.insert([p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]) {
                return Err(Error::SelfIntersectingLoop { index });
            }
        }

        if ring.len() < 3 {
            return Err(Error::TooFewDistinctVertices(ring.len()));
        }
        Ok(Self { points: ring })
    }

    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Point3<f64>> {
        self.points
    }
}

/// The face being collected: accepted loops and the material at start
#[derive(Debug, Clone, Default)]
pub struct PendingFace {
    pub loops: Vec<BoundaryLoop>,
    pub material: Option<MaterialId>,
}

impl PendingFace {
    pub fn new(material: Option<MaterialId>) -> Self {
        Self {
            loops: Vec::new(),
            material,
        }
    }

    /// Seals the face; `None` when it has no loops
    pub fn seal(self) -> Option<TessellatedFace> {
        let mut loops = self.loops.into_iter().map(BoundaryLoop::into_points);
        let outer = loops.next()?;
        Some(TessellatedFace {
            outer,
            inner: loops.collect(),
            material: self.material,
        })
    }
}

/// A sealed face: outer loop first, holes after
#[derive(Debug, Clone, PartialEq)]
pub struct TessellatedFace {
    pub outer: Vec<Point3<f64>>,
    pub inner: Vec<Vec<Point3<f64>>>,
    pub material: Option<MaterialId>,
}

impl TessellatedFace {
    pub fn to_face_loops(&self) -> FaceLoops {
        FaceLoops::with_holes(self.outer.clone(), self.inner.clone())
    }

    pub fn loop_count(&self) -> usize {
        1 + self.inner.len()
    }
}
