// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Shape Core
//!
//! STEP/IFC entity access for shape import, built with [nom](https://docs.rs/nom).
//!
//! - **STEP Tokenization**: zero-copy parsing of `#id=TYPE(args);` records
//! - **Entity Indexing**: [memchr](https://docs.rs/memchr) scan from step id to byte range
//! - **Lazy Decoding**: on-demand attribute decoding with an `Arc` cache
//! - **Validated Attributes**: [`AttributeReader`] distinguishes missing from mistyped values
//!
//! ## Quick Start
//!
//! ```rust
//! use ifc_shape_core::{EntityDecoder, IfcType};
//!
//! let content = "#1=IFCCARTESIANPOINT((0.,0.,1.));\n#2=IFCPOLYLOOP((#1));";
//! let mut decoder = EntityDecoder::new(content);
//!
//! let polyloop = decoder.decode_by_id(2).unwrap();
//! assert_eq!(polyloop.ifc_type, IfcType::IfcPolyLoop);
//!
//! let points = polyloop.reader().required_ref_list(0, "Polygon").unwrap();
//! assert_eq!(points, vec![1]);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for [`IfcType`]

pub mod attributes;
pub mod decoder;
pub mod error;
pub mod parser;
pub mod schema;
pub mod units;

pub use attributes::{AttributeReader, AttributeValue, DecodedEntity};
pub use decoder::{build_entity_index, EntityDecoder, EntityIndex};
pub use error::{Error, Result};
pub use parser::{parse_entity, EntityScanner, Token};
pub use schema::IfcType;
pub use units::{extract_length_unit_scale, find_project, get_si_prefix_multiplier};
