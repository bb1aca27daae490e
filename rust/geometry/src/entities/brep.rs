// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Manifold solid BReps and shell-based surface models.

use ifc_shape_core::{DecodedEntity, IfcType};

use super::session::{FromEntity, ImportSession};
use super::shell::IfcConnectedFaceSet;
use super::unexpected;
use crate::error::{Error, Result};
use crate::shape::{GeometryObject, ShapeEditScope, TargetPolicy};

/// IfcFacetedBrep, IfcAdvancedBrep and their with-voids forms
#[derive(Debug, Clone, PartialEq)]
pub struct IfcManifoldSolidBrep {
    pub id: u32,
    pub outer: u32,
    pub voids: Vec<u32>,
}

impl FromEntity for IfcManifoldSolidBrep {
    fn from_entity(_session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        if !entity.ifc_type.is_manifold_solid_brep() {
            return Err(unexpected(entity, "IfcManifoldSolidBrep"));
        }
        let reader = entity.reader();
        let voids = match entity.ifc_type {
            IfcType::IfcFacetedBrepWithVoids | IfcType::IfcAdvancedBrepWithVoids => {
                reader.required_ref_list(1, "Voids")?
            }
            _ => Vec::new(),
        };
        Ok(Self {
            id: entity.id,
            outer: reader.required_ref(0, "Outer")?,
            voids,
        })
    }
}

impl IfcManifoldSolidBrep {
    /// Builds the outer shell and voids under the scope's target policy.
    ///
    /// An outer shell without valid faces is fatal for the solid; a void
    /// that fails is logged and left out.
    pub fn create_geometry(
        &self,
        session: &mut ImportSession<'_>,
        scope: &mut ShapeEditScope,
    ) -> Result<Vec<GeometryObject>> {
        let outer = session.entity::<IfcConnectedFaceSet>(self.outer)?;
        let count = match outer.create_shape(session, scope) {
            Ok(count) => count,
            Err(e) => {
                if !e.is_usage() {
                    scope.discard();
                }
                return Err(e);
            }
        };
        if count == 0 {
            scope.discard();
            return Err(Error::NoValidFaces(self.id));
        }

        for &void_id in &self.voids {
            let created = match session.entity::<IfcConnectedFaceSet>(void_id) {
                Ok(shell) => shell.create_shape(session, scope),
                Err(e) => Err(e),
            };
            match created {
                Ok(0) => {
                    session.log.warn(void_id, "inner shell has no valid faces, skipped");
                }
                Ok(_) => {}
                Err(e) if e.is_usage() => return Err(e),
                Err(e) => {
                    scope.abandon_face_set();
                    session.log.warn(void_id, format!("inner shell skipped: {e}"));
                }
            }
        }

        let policy = scope.target_policy();
        session.build(scope, policy, self.id)
    }
}

/// IfcShellBasedSurfaceModel or IfcFaceBasedSurfaceModel
#[derive(Debug, Clone, PartialEq)]
pub struct IfcSurfaceModel {
    pub id: u32,
    pub shells: Vec<u32>,
}

impl FromEntity for IfcSurfaceModel {
    fn from_entity(_session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        let name = match entity.ifc_type {
            IfcType::IfcShellBasedSurfaceModel => "SbsmBoundary",
            IfcType::IfcFaceBasedSurfaceModel => "FbsmFaces",
            _ => return Err(unexpected(entity, "IfcShellBasedSurfaceModel")),
        };
        Ok(Self {
            id: entity.id,
            shells: entity.reader().required_ref_list(0, name)?,
        })
    }
}

impl IfcSurfaceModel {
    /// Builds each shell on its own; open shells become meshes
    pub fn create_geometry(
        &self,
        session: &mut ImportSession<'_>,
        scope: &mut ShapeEditScope,
    ) -> Result<Vec<GeometryObject>> {
        let mut geometry = Vec::new();
        for &shell_id in &self.shells {
            let created = match session.entity::<IfcConnectedFaceSet>(shell_id) {
                Ok(shell) => shell.create_shape(session, scope),
                Err(e) => Err(e),
            };
            match created {
                Ok(0) => {
                    scope.discard();
                    session.log.warn(shell_id, "shell has no valid faces, skipped");
                }
                Ok(_) => {
                    geometry.extend(session.build(scope, TargetPolicy::solid_or_mesh(), shell_id)?);
                }
                Err(e) if e.is_usage() => return Err(e),
                Err(e) => {
                    scope.discard();
                    session.log.warn(shell_id, format!("shell skipped: {e}"));
                }
            }
        }
        if geometry.is_empty() {
            return Err(Error::NoValidFaces(self.id));
        }
        Ok(geometry)
    }
}
