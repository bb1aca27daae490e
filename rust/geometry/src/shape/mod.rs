// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape assembly: boundary loops, face sets, target policy, kernel seam
//! and the edit scope that drives them.

mod builder;
mod face;
mod kernel;
mod policy;
mod scope;
mod solid;

pub use builder::{FaceSet, FaceSetBuilder};
pub use face::{BoundaryLoop, PendingFace, TessellatedFace};
pub use kernel::{BuildOutcome, ExtrusionRequest, GeometryKernel, TopologyKernel};
pub use policy::{FallbackKind, TargetKind, TargetPolicy};
pub use scope::{MaterialGuard, RepresentationGuard, ShapeEditScope, TargetGuard};
pub use solid::{GeometryObject, Solid};
