// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for BRep construction.

use crate::keys::{EdgeKey, FaceKey, LoopKey, ShellKey, SolidKey, VertexKey};

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the BRep kernel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A face outer loop has fewer than 3 distinct vertices or zero area.
    #[error("degenerate face: {0}")]
    DegenerateFace(&'static str),

    /// A shell must have at least one face.
    #[error("shell must have at least one face")]
    EmptyShell,

    /// The shell is not closed (has boundary or non-manifold edges).
    #[error("shell is not closed: {0} edges are not shared by exactly two faces")]
    OpenShell(usize),

    /// Some directed edge is traversed twice in the same direction.
    #[error("shell faces are not consistently oriented")]
    InconsistentOrientation,

    /// The enclosed volume is zero within tolerance.
    #[error("solid encloses no volume ({0:e})")]
    NonPositiveVolume(f64),

    /// Earcut failed on a face.
    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("vertex not found: {0:?}")]
    VertexNotFound(VertexKey),

    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeKey),

    #[error("loop not found: {0:?}")]
    LoopNotFound(LoopKey),

    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    #[error("shell not found: {0:?}")]
    ShellNotFound(ShellKey),

    #[error("solid not found: {0:?}")]
    SolidNotFound(SolidKey),
}
