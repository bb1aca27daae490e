// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::shape::{FallbackKind, TargetKind};

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during shape import
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Edit scope calls out of order (seal without start, build without a
    /// face set, nested faces).
    #[error("Invalid operation: {0}")]
    InvalidOperation(&'static str),

    #[error("Invalid target policy: {target:?} with fallback {fallback:?}")]
    InvalidPolicy {
        target: TargetKind,
        fallback: FallbackKind,
    },

    #[error("Loop has {0} points, at least 3 are required")]
    TooFewVertices(usize),

    #[error("Loop has {0} distinct vertices after merging, at least 3 are required")]
    TooFewDistinctVertices(usize),

    #[error("Self-intersecting loop: vertex {index} repeats an earlier vertex")]
    SelfIntersectingLoop { index: usize },

    #[error("#{0}: face has no valid boundary loops")]
    NoValidBoundaries(u32),

    #[error("#{0}: no valid faces")]
    NoValidFaces(u32),

    #[error("#{entity}: unhandled {kind} subtype {ifc_type}")]
    UnhandledSubtype {
        entity: u32,
        kind: &'static str,
        ifc_type: String,
    },

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid extrusion parameters: {0}")]
    InvalidExtrusion(String),

    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Curve collapses to fewer than two distinct points")]
    DegenerateCurve,

    #[error("Kernel error: {0}")]
    Kernel(#[from] ifc_shape_topology::Error),

    #[error("Core parser error: {0}")]
    Core(#[from] ifc_shape_core::Error),
}

impl Error {
    /// Programmer errors: fatal to the current operation, never retried
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidOperation(_) | Error::InvalidPolicy { .. })
    }

    /// Malformed geometry a container may log and skip
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::TooFewVertices(_)
                | Error::TooFewDistinctVertices(_)
                | Error::SelfIntersectingLoop { .. }
                | Error::NoValidBoundaries(_)
                | Error::UnhandledSubtype { .. }
                | Error::DegenerateCurve
                | Error::Kernel(_)
        )
    }

    pub(crate) fn unhandled(entity: u32, kind: &'static str, ifc_type: &impl ToString) -> Self {
        Error::UnhandledSubtype {
            entity,
            kind,
            ifc_type: ifc_type.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_disjoint() {
        let usage = Error::InvalidOperation("seal without start");
        assert!(usage.is_usage());
        assert!(!usage.is_recoverable());

        let local = Error::SelfIntersectingLoop { index: 2 };
        assert!(local.is_recoverable());
        assert!(!local.is_usage());

        let fatal = Error::InvalidExtrusion("depth 0".into());
        assert!(!fatal.is_usage());
        assert!(!fatal.is_recoverable());

        let placement = Error::InvalidPlacement("#9: zero-length direction".into());
        assert!(!placement.is_usage());
        assert!(!placement.is_recoverable());
    }

    #[test]
    fn kernel_errors_are_recoverable() {
        let err: Error = ifc_shape_topology::Error::EmptyShell.into();
        assert!(err.is_recoverable());
    }
}
