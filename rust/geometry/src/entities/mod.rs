// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC entity graph for shape import.
//!
//! Each entity is a closed set of variants built from its STEP record
//! through [`FromEntity`] and cached by the [`ImportSession`]. Construction
//! walks down the graph (representation, item, shell, face, loop) and drives
//! a [`ShapeEditScope`](crate::shape::ShapeEditScope).

use ifc_shape_core::{DecodedEntity, Error as CoreError};

use crate::error::Error;

mod brep;
mod curve;
mod extruded;
mod face;
mod loops;
pub mod placement;
mod product;
mod profile;
mod representation;
mod session;
mod shell;
mod style;
mod surface;

pub use brep::{IfcManifoldSolidBrep, IfcSurfaceModel};
pub use curve::IfcCurve;
pub use extruded::IfcExtrudedAreaSolid;
pub use face::IfcFace;
pub use loops::{IfcFaceBound, IfcLoop};
pub use product::{import_product, ProductShape};
pub use profile::IfcProfileDef;
pub use representation::{IfcProductDefinitionShape, IfcShapeRepresentation, DEFAULT_IDENTIFIER};
pub use session::{FromEntity, ImportSession};
pub use shell::IfcConnectedFaceSet;
pub use surface::IfcSurface;

/// A referenced entity of the wrong type
pub(crate) fn unexpected(entity: &DecodedEntity, expected: &'static str) -> Error {
    Error::Core(CoreError::UnexpectedEntityType {
        entity: entity.id,
        expected,
        found: entity.ifc_type.to_string(),
    })
}
