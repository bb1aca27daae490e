// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerance-ordered points and the canonical vertex map.
//!
//! [`FuzzyPoint`] orders points by X, then Y, then Z, treating coordinates
//! within `epsilon` as equal. That equality is not transitive: `a ~ b` and
//! `b ~ c` do not imply `a ~ c`, so chains of near points can drift. The
//! [`CanonicalVertexMap`] keeps the first point seen for each bucket and
//! accepts that approximation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use nalgebra::Point3;

/// A point compared within a fixed tolerance
#[derive(Debug, Clone, Copy)]
pub struct FuzzyPoint {
    point: Point3<f64>,
    epsilon: f64,
}

impl FuzzyPoint {
    #[inline]
    pub fn new(point: Point3<f64>, epsilon: f64) -> Self {
        Self { point, epsilon }
    }

    #[inline]
    pub fn point(&self) -> Point3<f64> {
        self.point
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

#[inline]
fn compare_axis(a: f64, b: f64, epsilon: f64) -> Ordering {
    if a < b - epsilon {
        Ordering::Less
    } else if a > b + epsilon {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl Ord for FuzzyPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        let eps = self.epsilon.max(other.epsilon);
        compare_axis(self.point.x, other.point.x, eps)
            .then_with(|| compare_axis(self.point.y, other.point.y, eps))
            .then_with(|| compare_axis(self.point.z, other.point.z, eps))
    }
}

impl PartialOrd for FuzzyPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FuzzyPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FuzzyPoint {}

/// Maps each fuzzy bucket to the first exact point inserted into it
#[derive(Debug, Clone)]
pub struct CanonicalVertexMap {
    epsilon: f64,
    points: BTreeMap<FuzzyPoint, Point3<f64>>,
}

impl CanonicalVertexMap {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            points: BTreeMap::new(),
        }
    }

    /// Canonical point for `point`, inserting it when no bucket matches
    pub fn lookup(&mut self, point: Point3<f64>) -> Point3<f64> {
        *self
            .points
            .entry(FuzzyPoint::new(point, self.epsilon))
            .or_insert(point)
    }

    /// Canonical point for `point` without inserting
    pub fn get(&self, point: &Point3<f64>) -> Option<Point3<f64>> {
        self.points
            .get(&FuzzyPoint::new(*point, self.epsilon))
            .copied()
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
