// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ifc_shape_core::{DecodedEntity, IfcType};

use super::face::IfcFace;
use super::session::{FromEntity, ImportSession};
use super::unexpected;
use crate::error::Result;
use crate::shape::ShapeEditScope;

/// IfcClosedShell or IfcOpenShell
#[derive(Debug, Clone, PartialEq)]
pub struct IfcConnectedFaceSet {
    pub id: u32,
    pub closed: bool,
    pub faces: Vec<u32>,
}

impl FromEntity for IfcConnectedFaceSet {
    fn from_entity(_session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        if !entity.ifc_type.is_shell() {
            return Err(unexpected(entity, "IfcConnectedFaceSet"));
        }
        Ok(Self {
            id: entity.id,
            closed: entity.ifc_type == IfcType::IfcClosedShell,
            faces: entity.reader().required_ref_list(0, "CfsFaces")?,
        })
    }
}

impl IfcConnectedFaceSet {
    /// Collects this shell as one face set and returns its face count.
    ///
    /// A face that fails is aborted, logged and skipped; only usage errors
    /// propagate.
    pub fn create_shape(
        &self,
        session: &mut ImportSession<'_>,
        scope: &mut ShapeEditScope,
    ) -> Result<usize> {
        scope.start_collecting_face_set(self.id)?;

        for &face_id in &self.faces {
            let created = match session.entity::<IfcFace>(face_id) {
                Ok(face) => face.create_shape(session, scope),
                Err(e) => Err(e),
            };
            match created {
                Ok(()) => {}
                Err(e) if e.is_usage() => return Err(e),
                Err(e) => {
                    scope.abort_current_face();
                    session.log.warn(face_id, format!("face skipped: {e}"));
                }
            }
        }

        let count = scope.stop_collecting_face_set()?;
        tracing::debug!(
            shell = self.id,
            faces = count,
            total = self.faces.len(),
            "shell collected"
        );
        Ok(count)
    }
}
