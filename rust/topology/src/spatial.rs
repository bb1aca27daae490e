// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial index for tolerance-based vertex merging.
//!
//! A grid spatial hash with cubic cells of side `cell_size`; lookups scan the
//! 3x3x3 neighbourhood around the query point.

use rustc_hash::FxHashMap;

use crate::arena::BrepArena;
use crate::keys::VertexKey;

/// Grid hash over vertex positions
#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    grid: FxHashMap<(i64, i64, i64), Vec<VertexKey>>,
}

impl SpatialIndex {
    /// `cell_size` should be >= the tolerance used for queries.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            grid: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: VertexKey, x: f64, y: f64, z: f64) {
        let cell = self.cell_coords(x, y, z);
        self.grid.entry(cell).or_default().push(key);
    }

    /// Nearest vertex within `tolerance` of `(x, y, z)`
    pub fn find_near(
        &self,
        arena: &BrepArena,
        x: f64,
        y: f64,
        z: f64,
        tolerance: f64,
    ) -> Option<VertexKey> {
        let (cx, cy, cz) = self.cell_coords(x, y, z);
        let tol_sq = tolerance * tolerance;
        let mut best: Option<(VertexKey, f64)> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(keys) = self.grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &vk in keys {
                        let Some(v) = arena.vertex(vk) else {
                            continue;
                        };
                        let dist_sq = (v.x - x).powi(2) + (v.y - y).powi(2) + (v.z - z).powi(2);
                        if dist_sq <= tol_sq && best.map_or(true, |(_, d)| dist_sq < d) {
                            best = Some((vk, dist_sq));
                        }
                    }
                }
            }
        }

        best.map(|(vk, _)| vk)
    }

    fn cell_coords(&self, x: f64, y: f64, z: f64) -> (i64, i64, i64) {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
            (z / self.cell_size).floor() as i64,
        )
    }
}

impl BrepArena {
    /// Returns an existing vertex within `tolerance` of `(x, y, z)`, or
    /// creates a new one. This is the merge-or-create step of face sewing.
    pub fn find_or_add_vertex(
        &mut self,
        index: &mut SpatialIndex,
        x: f64,
        y: f64,
        z: f64,
        tolerance: f64,
    ) -> VertexKey {
        if let Some(existing) = index.find_near(self, x, y, z, tolerance) {
            return existing;
        }

        let key = self.add_vertex(x, y, z);
        index.insert(key, x, y, z);
        key
    }
}
