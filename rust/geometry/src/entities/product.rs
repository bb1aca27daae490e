// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Product import driver.

use ifc_shape_core::{AttributeValue, IfcType};

use super::representation::{IfcProductDefinitionShape, IfcShapeRepresentation};
use super::session::ImportSession;
use crate::curves::PlanViewCurves;
use crate::error::Result;
use crate::shape::GeometryObject;

/// IfcProduct attribute holding its IfcProductDefinitionShape
const REPRESENTATION_ATTRIBUTE: usize = 6;

/// Everything built for one product
#[derive(Debug, Clone)]
pub struct ProductShape {
    pub product_id: u32,
    pub geometry: Vec<GeometryObject>,
    pub footprint: PlanViewCurves,
}

impl ProductShape {
    pub fn solid_count(&self) -> usize {
        self.geometry.iter().filter(|g| g.is_solid()).count()
    }

    pub fn mesh_count(&self) -> usize {
        self.geometry.iter().filter(|g| g.is_mesh()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty() && self.footprint.is_empty()
    }
}

/// Imports the shape of one product with a fresh edit scope.
///
/// Representations or items that fail are logged and skipped, so the
/// product imports with whatever geometry could be built.
pub fn import_product(session: &mut ImportSession<'_>, product_id: u32) -> Result<ProductShape> {
    let mut scope = session.edit_scope(product_id);
    let mut geometry = Vec::new();

    let product = session.decode(product_id)?;
    let shape_id = product
        .reader()
        .optional_ref(REPRESENTATION_ATTRIBUTE, "Representation")?;

    if let Some(shape_id) = shape_id {
        let shape = session.entity::<IfcProductDefinitionShape>(shape_id)?;
        for &rep_id in &shape.representations {
            let representation = match session.entity::<IfcShapeRepresentation>(rep_id) {
                Ok(rep) => rep,
                Err(e) => {
                    session.log.error(rep_id, format!("representation skipped: {e}"));
                    continue;
                }
            };
            geometry.extend(representation.create_geometry(session, &mut scope)?);
        }
    }

    tracing::debug!(
        product = product_id,
        objects = geometry.len(),
        footprint_curves = scope.plan_view_curves().len(),
        "product imported"
    );

    Ok(ProductShape {
        product_id,
        geometry,
        footprint: scope.take_plan_view_curves(),
    })
}

impl ImportSession<'_> {
    /// Step ids of entities whose representation attribute refers to an
    /// IfcProductDefinitionShape, in step-id order
    pub fn product_ids(&mut self) -> Vec<u32> {
        let mut products = Vec::new();
        for id in self.decoder.all_ids() {
            let Ok(entity) = self.decoder.decode_by_id(id) else {
                continue;
            };
            let Some(shape) = entity
                .get(REPRESENTATION_ATTRIBUTE)
                .and_then(AttributeValue::as_entity_ref)
            else {
                continue;
            };
            if matches!(
                self.decoder.type_of(shape),
                Ok(IfcType::IfcProductDefinitionShape)
            ) {
                products.push(id);
            }
        }
        products
    }

    /// Imports every product; a product that fails is logged and left out
    pub fn import_all_products(&mut self) -> Result<Vec<ProductShape>> {
        let mut shapes = Vec::new();
        for id in self.product_ids() {
            match import_product(self, id) {
                Ok(shape) => shapes.push(shape),
                Err(e) if e.is_usage() => return Err(e),
                Err(e) => {
                    self.log.error(id, format!("product not imported: {e}"));
                }
            }
        }
        Ok(shapes)
    }
}
