// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Points, directions and axis placements.

use ifc_shape_core::{DecodedEntity, EntityDecoder, IfcType};
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};

use super::unexpected;
use crate::error::{Error, Result};

/// IfcCartesianPoint; 2D points get z = 0
pub fn cartesian_point(decoder: &mut EntityDecoder, id: u32) -> Result<Point3<f64>> {
    let entity = decoder.decode_by_id(id)?;
    if entity.ifc_type != IfcType::IfcCartesianPoint {
        return Err(unexpected(&entity, "IfcCartesianPoint"));
    }
    let coords = entity.reader().required_float_list(0, "Coordinates")?;
    coords_to_point(&entity, &coords)
}

fn coords_to_point(entity: &DecodedEntity, coords: &[f64]) -> Result<Point3<f64>> {
    match *coords {
        [x, y] => Ok(Point3::new(x, y, 0.0)),
        [x, y, z, ..] => Ok(Point3::new(x, y, z)),
        _ => Err(unexpected(entity, "2D or 3D coordinates")),
    }
}

/// IfcDirection, normalized
pub fn direction(decoder: &mut EntityDecoder, id: u32) -> Result<Vector3<f64>> {
    let entity = decoder.decode_by_id(id)?;
    if entity.ifc_type != IfcType::IfcDirection {
        return Err(unexpected(&entity, "IfcDirection"));
    }
    let ratios = entity.reader().required_float_list(0, "DirectionRatios")?;
    let v = match *ratios {
        [x, y] => Vector3::new(x, y, 0.0),
        [x, y, z, ..] => Vector3::new(x, y, z),
        _ => return Err(unexpected(&entity, "2D or 3D direction ratios")),
    };
    v.try_normalize(f64::EPSILON)
        .ok_or_else(|| Error::InvalidPlacement(format!("#{id}: zero-length direction")))
}

/// IfcAxis2Placement3D as a local-to-parent transform.
///
/// Location defaults to the origin, Axis to +Z and RefDirection to +X. The
/// X axis is made orthogonal to Z; Y = Z × X.
pub fn axis2_placement_3d(decoder: &mut EntityDecoder, id: u32) -> Result<Matrix4<f64>> {
    let entity = decoder.decode_by_id(id)?;
    if entity.ifc_type != IfcType::IfcAxis2Placement3D {
        return Err(unexpected(&entity, "IfcAxis2Placement3D"));
    }
    let reader = entity.reader();

    let location = match reader.optional_ref(0, "Location")? {
        Some(p) => cartesian_point(decoder, p)?,
        None => Point3::origin(),
    };
    let z_axis = match reader.optional_ref(1, "Axis")? {
        Some(d) => direction(decoder, d)?,
        None => Vector3::z(),
    };
    let x_axis = match reader.optional_ref(2, "RefDirection")? {
        Some(d) => direction(decoder, d)?,
        None => Vector3::x(),
    };

    let x_orthogonal = x_axis - z_axis * x_axis.dot(&z_axis);
    let x_axis = match x_orthogonal.try_normalize(1e-6) {
        Some(x) => x,
        // Parallel axes: any perpendicular will do
        None if z_axis.z.abs() < 0.9 => Vector3::z().cross(&z_axis).normalize(),
        None => Vector3::x().cross(&z_axis).normalize(),
    };
    let y_axis = z_axis.cross(&x_axis).normalize();

    let mut transform = Matrix4::identity();
    transform.fixed_view_mut::<3, 1>(0, 0).copy_from(&x_axis);
    transform.fixed_view_mut::<3, 1>(0, 1).copy_from(&y_axis);
    transform.fixed_view_mut::<3, 1>(0, 2).copy_from(&z_axis);
    transform.fixed_view_mut::<3, 1>(0, 3).copy_from(&location.coords);
    Ok(transform)
}

/// IfcAxis2Placement2D as a homogeneous 2D transform
pub fn axis2_placement_2d(decoder: &mut EntityDecoder, id: u32) -> Result<Matrix3<f64>> {
    let entity = decoder.decode_by_id(id)?;
    if entity.ifc_type != IfcType::IfcAxis2Placement2D {
        return Err(unexpected(&entity, "IfcAxis2Placement2D"));
    }
    let reader = entity.reader();

    let location = match reader.optional_ref(0, "Location")? {
        Some(p) => {
            let p = cartesian_point(decoder, p)?;
            Point2::new(p.x, p.y)
        }
        None => Point2::origin(),
    };
    let x_axis = match reader.optional_ref(1, "RefDirection")? {
        Some(d) => {
            let d = direction(decoder, d)?;
            Vector2::new(d.x, d.y).try_normalize(1e-12).unwrap_or_else(Vector2::x)
        }
        None => Vector2::x(),
    };

    #[rustfmt::skip]
    let transform = Matrix3::new(
        x_axis.x, -x_axis.y, location.x,
        x_axis.y, x_axis.x, location.y,
        0.0, 0.0, 1.0,
    );
    Ok(transform)
}

/// IfcAxis1Placement as (location, unit axis)
pub fn axis1_placement(
    decoder: &mut EntityDecoder,
    id: u32,
) -> Result<(Point3<f64>, Vector3<f64>)> {
    let entity = decoder.decode_by_id(id)?;
    if entity.ifc_type != IfcType::IfcAxis1Placement {
        return Err(unexpected(&entity, "IfcAxis1Placement"));
    }
    let reader = entity.reader();
    let location = cartesian_point(decoder, reader.required_ref(0, "Location")?)?;
    let axis = match reader.optional_ref(1, "Axis")? {
        Some(d) => direction(decoder, d)?,
        None => Vector3::z(),
    };
    Ok((location, axis))
}
