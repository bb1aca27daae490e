// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for STEP parsing and attribute access.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading IFC entities
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Entity #{0} not found")]
    EntityNotFound(u32),

    /// A required attribute is absent or `$`.
    #[error("#{entity} {ifc_type}: missing required attribute {name}")]
    MissingAttribute {
        entity: u32,
        ifc_type: String,
        name: &'static str,
    },

    /// An attribute is present but does not hold the expected kind of value.
    #[error("#{entity} {ifc_type}: attribute {name} is not a valid {expected}")]
    WrongAttributeType {
        entity: u32,
        ifc_type: String,
        name: &'static str,
        expected: &'static str,
    },

    /// A referenced entity exists but is not of an accepted IFC type.
    #[error("#{entity}: expected {expected}, found {found}")]
    UnexpectedEntityType {
        entity: u32,
        expected: &'static str,
        found: String,
    },
}

impl Error {
    /// Build a parse error
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            position,
            message: message.into(),
        }
    }

    /// True when the error is a missing required attribute
    pub fn is_missing_attribute(&self) -> bool {
        matches!(self, Error::MissingAttribute { .. })
    }
}
