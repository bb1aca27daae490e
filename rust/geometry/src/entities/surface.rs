// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face surfaces: elementary and swept variants.
//!
//! Faces are tessellated from their boundary loops, so a swept surface only
//! has to be recognized. Elementary surfaces are kept so boundaries can be
//! checked against them. Any subtype outside this set is an
//! [`Error::UnhandledSubtype`].

use ifc_shape_core::{DecodedEntity, IfcType};
use nalgebra::{Matrix4, Point3, Vector3};

use super::placement::{axis1_placement, axis2_placement_3d, direction};
use super::session::{FromEntity, ImportSession};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum IfcSurface {
    Plane {
        position: Matrix4<f64>,
    },
    Cylindrical {
        position: Matrix4<f64>,
        radius: f64,
    },
    LinearExtrusion,
    Revolution,
}

impl IfcSurface {
    /// Distance from `point` to an elementary surface; `None` for swept ones
    pub fn deviation(&self, point: &Point3<f64>) -> Option<f64> {
        let (origin, axis) = match self {
            IfcSurface::Plane { position } | IfcSurface::Cylindrical { position, .. } => (
                position.fixed_view::<3, 1>(0, 3).into_owned(),
                position.fixed_view::<3, 1>(0, 2).into_owned(),
            ),
            IfcSurface::LinearExtrusion | IfcSurface::Revolution => return None,
        };
        let offset: Vector3<f64> = point.coords - origin;
        let along = offset.dot(&axis);
        match self {
            IfcSurface::Cylindrical { radius, .. } => {
                Some(((offset - axis * along).norm() - radius).abs())
            }
            _ => Some(along.abs()),
        }
    }
}

impl FromEntity for IfcSurface {
    fn from_entity(session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        let reader = entity.reader();
        let decoder = &mut session.decoder;
        match entity.ifc_type {
            IfcType::IfcPlane => Ok(IfcSurface::Plane {
                position: axis2_placement_3d(decoder, reader.required_ref(0, "Position")?)?,
            }),
            IfcType::IfcCylindricalSurface => Ok(IfcSurface::Cylindrical {
                position: axis2_placement_3d(decoder, reader.required_ref(0, "Position")?)?,
                radius: reader.required_float(1, "Radius")?,
            }),
            // Swept surfaces are validated, not evaluated
            IfcType::IfcSurfaceOfLinearExtrusion => {
                reader.required_ref(0, "SweptCurve")?;
                direction(decoder, reader.required_ref(2, "ExtrudedDirection")?)?;
                reader.required_float(3, "Depth")?;
                Ok(IfcSurface::LinearExtrusion)
            }
            IfcType::IfcSurfaceOfRevolution => {
                reader.required_ref(0, "SweptCurve")?;
                axis1_placement(decoder, reader.required_ref(2, "AxisPosition")?)?;
                Ok(IfcSurface::Revolution)
            }
            ref other => Err(Error::unhandled(entity.id, "surface", other)),
        }
    }
}
