// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-view (footprint) curve collection.
//!
//! Curves parallel to the XY plane are kept at their elevation; others are
//! projected onto it. Points closer than the short-curve tolerance merge.

use nalgebra::{Point2, Point3};

use crate::error::{Error, Result};

/// A 2D polyline in plan
#[derive(Debug, Clone, PartialEq)]
pub struct PlanViewCurve {
    pub points: Vec<Point2<f64>>,
    /// Z of the source curve when it was already horizontal
    pub elevation: Option<f64>,
}

impl PlanViewCurve {
    /// True when the source curve had to be projected
    pub fn is_projected(&self) -> bool {
        self.elevation.is_none()
    }

    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanViewCurves {
    curves: Vec<PlanViewCurve>,
    tolerance: f64,
}

impl PlanViewCurves {
    pub fn new(short_curve_tolerance: f64) -> Self {
        Self {
            curves: Vec::new(),
            tolerance: short_curve_tolerance,
        }
    }

    /// Adds a curve, projecting it to XY when it is not horizontal.
    ///
    /// Fails with [`Error::DegenerateCurve`] when fewer than two points
    /// remain apart by more than the short-curve tolerance.
    pub fn add(&mut self, points: &[Point3<f64>]) -> Result<&PlanViewCurve> {
        let first = points.first().ok_or(Error::DegenerateCurve)?;
        let horizontal = points.iter().all(|p| (p.z - first.z).abs() <= self.tolerance);

        let mut projected: Vec<Point2<f64>> = Vec::with_capacity(points.len());
        for p in points {
            let q = Point2::new(p.x, p.y);
            match projected.last() {
                Some(last) if (q - *last).norm() <= self.tolerance => {}
                _ => projected.push(q),
            }
        }
        if projected.len() < 2 {
            return Err(Error::DegenerateCurve);
        }

        let index = self.curves.len();
        self.curves.push(PlanViewCurve {
            points: projected,
            elevation: horizontal.then_some(first.z),
        });
        Ok(&self.curves[index])
    }

    pub fn curves(&self) -> &[PlanViewCurve] {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn clear(&mut self) {
        self.curves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-3;

    #[test]
    fn horizontal_curve_is_kept_at_elevation() {
        let mut curves = PlanViewCurves::new(TOL);
        let curve = curves
            .add(&[
                Point3::new(0.0, 0.0, 3.0),
                Point3::new(4.0, 0.0, 3.0),
                Point3::new(4.0, 3.0, 3.0),
            ])
            .unwrap();
        assert!(!curve.is_projected());
        assert_eq!(curve.elevation, Some(3.0));
        assert_relative_eq!(curve.length(), 7.0);
    }

    #[test]
    fn sloped_curve_is_projected() {
        let mut curves = PlanViewCurves::new(TOL);
        let curve = curves
            .add(&[Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 2.0)])
            .unwrap();
        assert!(curve.is_projected());
        assert_relative_eq!(curve.length(), 5.0);
    }

    #[test]
    fn short_segments_merge() {
        let mut curves = PlanViewCurves::new(TOL);
        let curve = curves
            .add(&[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.5 * TOL, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
            ])
            .unwrap();
        assert_eq!(curve.points.len(), 2);
    }

    #[test]
    fn vertical_curve_collapses() {
        let mut curves = PlanViewCurves::new(TOL);
        let err = curves
            .add(&[Point3::new(1.0, 1.0, 0.0), Point3::new(1.0, 1.0, 5.0)])
            .unwrap_err();
        assert_eq!(err, Error::DegenerateCurve);
        assert!(err.is_recoverable());
        assert!(curves.is_empty());
    }
}
