// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ifc_shape_core::{DecodedEntity, IfcType};

use super::brep::{IfcManifoldSolidBrep, IfcSurfaceModel};
use super::curve::IfcCurve;
use super::extruded::IfcExtrudedAreaSolid;
use super::session::{FromEntity, ImportSession};
use super::unexpected;
use crate::error::{Error, Result};
use crate::shape::{GeometryObject, ShapeEditScope};

/// Identifier used when a representation does not name itself
pub const DEFAULT_IDENTIFIER: &str = "Body";

#[derive(Debug, Clone, PartialEq)]
pub struct IfcShapeRepresentation {
    pub id: u32,
    pub identifier: String,
    pub items: Vec<u32>,
}

impl FromEntity for IfcShapeRepresentation {
    fn from_entity(_session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        if entity.ifc_type != IfcType::IfcShapeRepresentation {
            return Err(unexpected(entity, "IfcShapeRepresentation"));
        }
        let reader = entity.reader();
        Ok(Self {
            id: entity.id,
            identifier: reader
                .optional_string(1, "RepresentationIdentifier")?
                .unwrap_or(DEFAULT_IDENTIFIER)
                .to_string(),
            items: reader.required_ref_list(3, "Items")?,
        })
    }
}

impl IfcShapeRepresentation {
    /// Builds every item of a `Body` representation, or feeds `FootPrint`
    /// curves to the scope's plan view.
    ///
    /// An item that fails is logged as an error and skipped; only usage
    /// errors propagate.
    pub fn create_geometry(
        &self,
        session: &mut ImportSession<'_>,
        scope: &mut ShapeEditScope,
    ) -> Result<Vec<GeometryObject>> {
        let layer = session.layer_material(self.id);
        let mut scope = scope.set_containing_representation(&self.identifier);
        let mut scope = scope.push_material(layer);

        let mut geometry = Vec::new();
        match self.identifier.as_str() {
            "Body" => {
                for &item in &self.items {
                    match create_item(session, &mut scope, item) {
                        Ok(objects) => geometry.extend(objects),
                        Err(e) if e.is_usage() => return Err(e),
                        Err(e) => {
                            scope.discard();
                            session.log.error(item, format!("geometry not created: {e}"));
                        }
                    }
                }
            }
            "FootPrint" if session.config.collect_footprints => {
                for &item in &self.items {
                    let added = session
                        .entity::<IfcCurve>(item)
                        .and_then(|curve| scope.add_plan_view_curve(&curve.points).map(|_| ()));
                    if let Err(e) = added {
                        session.log.warn(item, format!("footprint curve skipped: {e}"));
                    }
                }
            }
            other => {
                tracing::debug!(
                    representation = self.id,
                    identifier = other,
                    "representation skipped"
                );
            }
        }
        Ok(geometry)
    }
}

/// One body item under its layer and item styles
fn create_item(
    session: &mut ImportSession<'_>,
    scope: &mut ShapeEditScope,
    item: u32,
) -> Result<Vec<GeometryObject>> {
    let layer = session.layer_material(item);
    let style = session.item_material(item);
    let mut scope = scope.push_material(layer);
    let mut scope = scope.push_material(style);

    match session.decoder.type_of(item)? {
        t if t.is_manifold_solid_brep() => session
            .entity::<IfcManifoldSolidBrep>(item)?
            .create_geometry(session, &mut scope),
        IfcType::IfcExtrudedAreaSolid => session
            .entity::<IfcExtrudedAreaSolid>(item)?
            .create_geometry(session, &mut scope),
        IfcType::IfcShellBasedSurfaceModel | IfcType::IfcFaceBasedSurfaceModel => session
            .entity::<IfcSurfaceModel>(item)?
            .create_geometry(session, &mut scope),
        other => Err(Error::unhandled(item, "representation item", &other)),
    }
}

/// IfcProductDefinitionShape
#[derive(Debug, Clone, PartialEq)]
pub struct IfcProductDefinitionShape {
    pub id: u32,
    pub representations: Vec<u32>,
}

impl FromEntity for IfcProductDefinitionShape {
    fn from_entity(_session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        if entity.ifc_type != IfcType::IfcProductDefinitionShape {
            return Err(unexpected(entity, "IfcProductDefinitionShape"));
        }
        Ok(Self {
            id: entity.id,
            representations: entity.reader().required_ref_list(2, "Representations")?,
        })
    }
}
