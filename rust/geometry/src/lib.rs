// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Shape Reconstruction
//!
//! Rebuilds solids and meshes from IFC shape representations: faceted and
//! advanced BReps are assembled face by face through a [`ShapeEditScope`],
//! with vertices merged by a fuzzy [`CanonicalVertexMap`], then sewn into a
//! closed solid or, when the target policy allows it, tessellated into a
//! [`Mesh`]. Extruded area solids go straight to the kernel.
//!
//! ```rust
//! use ifc_shape_geometry::ImportSession;
//!
//! let content = "#1=IFCCARTESIANPOINT((0.,0.,0.));";
//! let mut session = ImportSession::new(content);
//! let shapes = session.import_all_products().unwrap();
//! assert!(shapes.is_empty());
//! ```

pub mod config;
pub mod curves;
pub mod entities;
pub mod error;
pub mod extrusion;
pub mod fuzzy;
pub mod log;
pub mod materials;
pub mod mesh;
pub mod profile;
pub mod shape;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

pub use config::ImportConfig;
pub use curves::{PlanViewCurve, PlanViewCurves};
pub use entities::{import_product, FromEntity, ImportSession, ProductShape};
pub use error::{Error, Result};
pub use extrusion::{extrude_profile, extrusion_faces};
pub use fuzzy::{CanonicalVertexMap, FuzzyPoint};
pub use log::{ImportLog, LogEntry};
pub use materials::{Material, MaterialId, MaterialRegistry, MaterialStack};
pub use mesh::Mesh;
pub use profile::Profile2D;
pub use shape::{
    FallbackKind, GeometryKernel, GeometryObject, ShapeEditScope, Solid, TargetKind, TargetPolicy,
    TopologyKernel,
};
