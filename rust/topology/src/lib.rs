// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Shape Topology
//!
//! Arena-based boundary-representation kernel for IFC shape import.
//!
//! Vertices, edges, loops, faces, shells and solids are stored in slot maps
//! with stable keys. Shells are built from raw face loops by tolerance-based
//! sewing ([`BrepArena::sew_shell`]): near-coincident vertices merge, edges
//! are shared between adjacent faces, and faces that cannot be represented
//! exactly are rejected individually. A shell bounds a solid only when it is
//! closed, consistently oriented and encloses a positive volume.

pub mod arena;
pub mod builders;
pub mod construction;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod spatial;
pub mod traversal;

pub use arena::BrepArena;
pub use builders::{box_faces, FaceLoops, SewnShell};
pub use error::{Error, Result};
pub use keys::{EdgeKey, FaceKey, LoopKey, ShellKey, SolidKey, VertexKey};
pub use spatial::SpatialIndex;
