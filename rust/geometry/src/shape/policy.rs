// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::{Error, Result};

/// What a build is allowed to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// A solid if possible, otherwise a mesh
    AnySolidThenMesh,
    /// A closed solid or nothing
    SolidOnly,
}

/// What happens when the target cannot be met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackKind {
    Mesh,
    Abort,
}

/// A validated (target, fallback) pair.
///
/// Only `(AnySolidThenMesh, Mesh)` and `(SolidOnly, Abort)` exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetPolicy {
    target: TargetKind,
    fallback: FallbackKind,
}

impl TargetPolicy {
    pub fn new(target: TargetKind, fallback: FallbackKind) -> Result<Self> {
        match (target, fallback) {
            (TargetKind::AnySolidThenMesh, FallbackKind::Mesh)
            | (TargetKind::SolidOnly, FallbackKind::Abort) => Ok(Self { target, fallback }),
            _ => Err(Error::InvalidPolicy { target, fallback }),
        }
    }

    /// Solid when possible, mesh otherwise
    pub const fn solid_or_mesh() -> Self {
        Self {
            target: TargetKind::AnySolidThenMesh,
            fallback: FallbackKind::Mesh,
        }
    }

    /// Closed solid or nothing
    pub const fn closed_solid() -> Self {
        Self {
            target: TargetKind::SolidOnly,
            fallback: FallbackKind::Abort,
        }
    }

    #[inline]
    pub fn target(&self) -> TargetKind {
        self.target
    }

    #[inline]
    pub fn fallback(&self) -> FallbackKind {
        self.fallback
    }

    #[inline]
    pub fn allows_mesh(&self) -> bool {
        self.fallback == FallbackKind::Mesh
    }
}

impl Default for TargetPolicy {
    fn default() -> Self {
        Self::solid_or_mesh()
    }
}
