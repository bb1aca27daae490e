// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use ifc_shape_core::{DecodedEntity, IfcType};
use nalgebra::{Matrix4, Vector3};

use super::placement::{axis2_placement_3d, direction};
use super::profile::IfcProfileDef;
use super::session::{FromEntity, ImportSession};
use super::unexpected;
use crate::error::{Error, Result};
use crate::shape::{ExtrusionRequest, GeometryObject, ShapeEditScope};

/// IfcExtrudedAreaSolid with a positive depth
#[derive(Debug, Clone)]
pub struct IfcExtrudedAreaSolid {
    pub id: u32,
    pub profile: Arc<IfcProfileDef>,
    /// Solid position in the representation's coordinate system
    pub position: Matrix4<f64>,
    direction: Vector3<f64>,
    depth: f64,
}

impl FromEntity for IfcExtrudedAreaSolid {
    fn from_entity(session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        if entity.ifc_type != IfcType::IfcExtrudedAreaSolid {
            return Err(unexpected(entity, "IfcExtrudedAreaSolid"));
        }
        let id = entity.id;
        let reader = entity.reader();

        let mut depth = reader.required_float(3, "Depth")?;
        let mut extruded_direction = match reader.optional_ref(2, "ExtrudedDirection")? {
            Some(d) => direction(&mut session.decoder, d).map_err(|e| match e {
                Error::InvalidPlacement(msg) => Error::InvalidExtrusion(msg),
                other => other,
            })?,
            None => Vector3::z(),
        };
        if depth < 0.0 {
            session.log.warn(
                id,
                format!(
                    "negative extrusion depth {depth}, extruding {} in the opposite direction",
                    -depth
                ),
            );
            depth = -depth;
            extruded_direction = -extruded_direction;
        }
        if !(depth.is_finite() && depth > 0.0) {
            return Err(Error::InvalidExtrusion(format!("#{id}: depth {depth}")));
        }

        let position = match reader.optional_ref(1, "Position")? {
            Some(p) => axis2_placement_3d(&mut session.decoder, p)?,
            None => Matrix4::identity(),
        };
        let profile = session.entity::<IfcProfileDef>(reader.required_ref(0, "SweptArea")?)?;

        Ok(Self {
            id,
            profile,
            position,
            direction: extruded_direction,
            depth,
        })
    }
}

impl IfcExtrudedAreaSolid {
    /// Extrusion depth, always positive
    #[inline]
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Unit extrusion direction in the solid's position system
    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// Exact extrusion, or a mesh when the kernel rejects the profile and
    /// the scope's target allows one.
    pub fn create_geometry(
        &self,
        session: &mut ImportSession<'_>,
        scope: &mut ShapeEditScope,
    ) -> Result<Vec<GeometryObject>> {
        let request = ExtrusionRequest {
            profile: &self.profile.profile,
            direction: self.direction,
            depth: self.depth,
            transform: self.position,
            material: scope.current_material(),
            tolerance: session.vertex_tolerance(),
        };

        match session.kernel.create_extrusion(&request) {
            Ok(solid) => Ok(vec![GeometryObject::Solid(solid)]),
            Err(e) if !scope.target_policy().allows_mesh() => Err(e),
            Err(e) => {
                session
                    .log
                    .warn(self.id, format!("exact extrusion failed, using a mesh: {e}"));
                let mesh = session.kernel.create_mesh_by_extrusion(&request)?;
                Ok(vec![GeometryObject::Mesh(mesh)])
            }
        }
    }
}
