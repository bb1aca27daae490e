// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ifc_shape_core::{DecodedEntity, IfcType};

use super::loops::IfcFaceBound;
use super::session::{FromEntity, ImportSession};
use super::surface::IfcSurface;
use super::unexpected;
use crate::error::{Error, Result};
use crate::shape::ShapeEditScope;

/// IfcFace, IfcFaceSurface or IfcAdvancedFace
#[derive(Debug, Clone, PartialEq)]
pub struct IfcFace {
    pub id: u32,
    /// Bound ids, outer bound first
    pub bounds: Vec<u32>,
    pub surface: Option<u32>,
}

impl FromEntity for IfcFace {
    fn from_entity(session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        if !entity.ifc_type.is_face() {
            return Err(unexpected(entity, "IfcFace"));
        }
        let reader = entity.reader();

        let mut bounds = Vec::new();
        for id in reader.required_ref_list(0, "Bounds")? {
            let outer = session.decoder.type_of(id)? == IfcType::IfcFaceOuterBound;
            bounds.push((!outer, id));
        }
        // Stable: inner bounds keep their order
        bounds.sort_by_key(|&(inner, _)| inner);

        let surface = if entity.ifc_type == IfcType::IfcFace {
            None
        } else {
            Some(reader.required_ref(1, "FaceSurface")?)
        };

        Ok(Self {
            id: entity.id,
            bounds: bounds.into_iter().map(|(_, id)| id).collect(),
            surface,
        })
    }
}

impl IfcFace {
    /// Adds this face to the scope's open face set.
    ///
    /// Bad loops are logged and skipped. An unhandled surface, or no loop
    /// surviving validation, aborts the face and fails. Boundaries that leave
    /// an elementary face surface are kept with a warning.
    pub fn create_shape(
        &self,
        session: &mut ImportSession<'_>,
        scope: &mut ShapeEditScope,
    ) -> Result<()> {
        scope.start_collecting_face(scope.current_material())?;

        let surface = match self.surface {
            Some(id) => match session.entity::<IfcSurface>(id) {
                Ok(surface) => Some(surface),
                Err(e) => {
                    scope.abort_current_face();
                    return Err(e);
                }
            },
            None => None,
        };

        let mut stray = 0.0_f64;
        for &bound_id in &self.bounds {
            let added = session
                .entity::<IfcFaceBound>(bound_id)
                .and_then(|bound| bound.points())
                .and_then(|points| {
                    if let Some(surface) = &surface {
                        for p in &points {
                            stray = stray.max(surface.deviation(p).unwrap_or(0.0));
                        }
                    }
                    scope.add_loop(&points)
                });
            match added {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    let message = format!("boundary loop of face #{} skipped: {e}", self.id);
                    session.log.warn(bound_id, message);
                }
                Err(e) => {
                    scope.abort_current_face();
                    return Err(e);
                }
            }
        }

        if !scope.has_active_loops() {
            scope.abort_current_face();
            return Err(Error::NoValidBoundaries(self.id));
        }
        if stray > session.short_curve_tolerance() {
            session
                .log
                .warn(self.id, format!("boundary strays {stray:.3e} from the face surface"));
        }
        scope.stop_collecting_face()
    }
}
