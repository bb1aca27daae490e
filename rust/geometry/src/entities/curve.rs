// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded curves as polylines: IfcPolyline, IfcIndexedPolyCurve and
//! IfcCompositeCurve.

use ifc_shape_core::{AttributeValue, DecodedEntity, IfcType};
use nalgebra::Point3;

use super::placement::cartesian_point;
use super::session::{FromEntity, ImportSession};
use super::unexpected;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct IfcCurve {
    pub id: u32,
    pub points: Vec<Point3<f64>>,
}

impl IfcCurve {
    /// True when the first and last points coincide
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => self.points.len() > 2 && (a - b).norm() <= f64::EPSILON,
            _ => false,
        }
    }

    /// Points without the closing duplicate
    pub fn open_points(&self) -> &[Point3<f64>] {
        if self.is_closed() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }
}

impl FromEntity for IfcCurve {
    fn from_entity(session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        let points = match entity.ifc_type {
            IfcType::IfcPolyline => entity
                .reader()
                .required_ref_list(0, "Points")?
                .into_iter()
                .map(|p| cartesian_point(&mut session.decoder, p))
                .collect::<Result<Vec<_>>>()?,
            IfcType::IfcIndexedPolyCurve => indexed_poly_curve(session, entity)?,
            IfcType::IfcCompositeCurve => composite_curve(session, entity)?,
            ref other => return Err(Error::unhandled(entity.id, "curve", other)),
        };
        Ok(Self {
            id: entity.id,
            points,
        })
    }
}

fn indexed_poly_curve(
    session: &mut ImportSession<'_>,
    entity: &DecodedEntity,
) -> Result<Vec<Point3<f64>>> {
    let reader = entity.reader();
    let list = session.decode(reader.required_ref(0, "Points")?)?;
    if !matches!(
        list.ifc_type,
        IfcType::IfcCartesianPointList2D | IfcType::IfcCartesianPointList3D
    ) {
        return Err(unexpected(&list, "IfcCartesianPointList"));
    }

    let coords = list
        .get(0)
        .and_then(AttributeValue::as_list)
        .ok_or_else(|| unexpected(&list, "coordinate list"))?;
    let mut table = Vec::with_capacity(coords.len());
    for c in coords {
        match c.as_float_list().as_deref() {
            Some(&[x, y]) => table.push(Point3::new(x, y, 0.0)),
            Some(&[x, y, z, ..]) => table.push(Point3::new(x, y, z)),
            _ => return Err(unexpected(&list, "2D or 3D coordinates")),
        }
    }

    let segments = match entity.get(1) {
        Some(AttributeValue::List(segments)) => segments,
        _ => return Ok(table),
    };

    let mut points: Vec<Point3<f64>> = Vec::new();
    for segment in segments {
        // IfcLineIndex((i, j, ...)) or IfcArcIndex((i, j, k)), 1-based.
        // Arcs are taken as the chords through their three points.
        let indices = match segment {
            AttributeValue::Typed(_, args) => args.first().and_then(AttributeValue::as_list),
            other => other.as_list(),
        }
        .ok_or_else(|| unexpected(entity, "segment index list"))?;

        for index in indices {
            let point = index
                .as_int()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| table.get(i))
                .ok_or_else(|| unexpected(entity, "point index in range"))?;
            if points.last() != Some(point) {
                points.push(*point);
            }
        }
    }
    Ok(points)
}

fn composite_curve(
    session: &mut ImportSession<'_>,
    entity: &DecodedEntity,
) -> Result<Vec<Point3<f64>>> {
    let mut points: Vec<Point3<f64>> = Vec::new();
    for segment_id in entity.reader().required_ref_list(0, "Segments")? {
        let segment = session.decode(segment_id)?;
        if segment.ifc_type != IfcType::IfcCompositeCurveSegment {
            return Err(Error::unhandled(segment.id, "composite curve segment", &segment.ifc_type));
        }
        let reader = segment.reader();
        let same_sense = reader.required_bool(1, "SameSense")?;
        let parent = session.entity::<IfcCurve>(reader.required_ref(2, "ParentCurve")?)?;

        let mut segment_points = parent.points.clone();
        if !same_sense {
            segment_points.reverse();
        }
        for p in segment_points {
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
    }
    Ok(points)
}
