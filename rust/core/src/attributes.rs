// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded attribute values and the validated attribute reader
//!
//! [`AttributeReader`] is the only way shape import code reads entity
//! attributes: every access names the attribute, and a missing required value
//! is reported differently from a value of the wrong kind.

use crate::error::{Error, Result};
use crate::parser::Token;
use crate::schema::IfcType;

/// IFC entity attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    EntityRef(u32),
    String(String),
    Integer(i64),
    Float(f64),
    /// Enumeration literal without the surrounding dots
    Enum(String),
    List(Vec<AttributeValue>),
    /// Typed value such as `IFCPOSITIVELENGTHMEASURE(2.5)`
    Typed(String, Vec<AttributeValue>),
    Null,
    Derived,
}

impl AttributeValue {
    /// Convert from Token
    pub fn from_token(token: &Token) -> Self {
        match token {
            Token::EntityRef(id) => AttributeValue::EntityRef(*id),
            Token::String(s) => AttributeValue::String(s.replace("''", "'")),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(e) => AttributeValue::Enum(e.to_string()),
            Token::List(items) => {
                AttributeValue::List(items.iter().map(Self::from_token).collect())
            }
            Token::TypedValue(name, args) => AttributeValue::Typed(
                name.to_string(),
                args.iter().map(Self::from_token).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }

    /// Strip a single-argument typed wrapper
    fn unwrap_typed(&self) -> &AttributeValue {
        match self {
            AttributeValue::Typed(_, args) if args.len() == 1 => &args[0],
            other => other,
        }
    }

    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self.unwrap_typed() {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self.unwrap_typed() {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Integers are accepted where reals are expected
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self.unwrap_typed() {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self.unwrap_typed() {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// STEP booleans and logicals: `.T.`, `.F.` (and spelled-out forms)
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_enum()? {
            "T" | "TRUE" => Some(true),
            "F" | "FALSE" => Some(false),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if null/derived
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }

    /// Numeric list such as the coordinates of a point
    pub fn as_float_list(&self) -> Option<Vec<f64>> {
        self.as_list()?.iter().map(|v| v.as_float()).collect()
    }
}

/// Decoded IFC entity with attributes
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntity {
    pub id: u32,
    pub ifc_type: IfcType,
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    pub fn new(id: u32, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> Self {
        Self {
            id,
            ifc_type,
            attributes,
        }
    }

    /// Get attribute by index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Validated access to this entity's attributes
    pub fn reader(&self) -> AttributeReader<'_> {
        AttributeReader { entity: self }
    }
}

/// Validated attribute access over one decoded entity
///
/// `required_*` methods fail with [`Error::MissingAttribute`] when the value
/// is absent, `$` or `*`, and with [`Error::WrongAttributeType`] when it holds
/// the wrong kind of value. `optional_*` methods return `Ok(None)` for absent
/// values but still reject wrong kinds.
#[derive(Clone, Copy)]
pub struct AttributeReader<'e> {
    entity: &'e DecodedEntity,
}

impl<'e> AttributeReader<'e> {
    pub fn entity(&self) -> &'e DecodedEntity {
        self.entity
    }

    fn missing(&self, name: &'static str) -> Error {
        Error::MissingAttribute {
            entity: self.entity.id,
            ifc_type: self.entity.ifc_type.to_string(),
            name,
        }
    }

    fn wrong(&self, name: &'static str, expected: &'static str) -> Error {
        Error::WrongAttributeType {
            entity: self.entity.id,
            ifc_type: self.entity.ifc_type.to_string(),
            name,
            expected,
        }
    }

    /// Present, non-null attribute value
    fn present(&self, index: usize) -> Option<&'e AttributeValue> {
        self.entity.get(index).filter(|v| !v.is_null())
    }

    fn optional<T>(
        &self,
        index: usize,
        name: &'static str,
        expected: &'static str,
        convert: impl FnOnce(&'e AttributeValue) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.present(index) {
            None => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| self.wrong(name, expected)),
        }
    }

    fn required<T>(
        &self,
        index: usize,
        name: &'static str,
        expected: &'static str,
        convert: impl FnOnce(&'e AttributeValue) -> Option<T>,
    ) -> Result<T> {
        self.optional(index, name, expected, convert)?
            .ok_or_else(|| self.missing(name))
    }

    pub fn optional_ref(&self, index: usize, name: &'static str) -> Result<Option<u32>> {
        self.optional(index, name, "entity reference", AttributeValue::as_entity_ref)
    }

    pub fn required_ref(&self, index: usize, name: &'static str) -> Result<u32> {
        self.required(index, name, "entity reference", AttributeValue::as_entity_ref)
    }

    pub fn optional_ref_list(
        &self,
        index: usize,
        name: &'static str,
    ) -> Result<Option<Vec<u32>>> {
        self.optional(index, name, "list of entity references", ref_list)
    }

    /// Required aggregate of references; an empty list is accepted
    pub fn required_ref_list(&self, index: usize, name: &'static str) -> Result<Vec<u32>> {
        self.required(index, name, "list of entity references", ref_list)
    }

    pub fn optional_float(&self, index: usize, name: &'static str) -> Result<Option<f64>> {
        self.optional(index, name, "real", AttributeValue::as_float)
    }

    pub fn required_float(&self, index: usize, name: &'static str) -> Result<f64> {
        self.required(index, name, "real", AttributeValue::as_float)
    }

    pub fn required_float_list(&self, index: usize, name: &'static str) -> Result<Vec<f64>> {
        self.required(index, name, "list of reals", AttributeValue::as_float_list)
    }

    pub fn optional_bool(&self, index: usize, name: &'static str) -> Result<Option<bool>> {
        self.optional(index, name, "boolean", AttributeValue::as_bool)
    }

    pub fn required_bool(&self, index: usize, name: &'static str) -> Result<bool> {
        self.required(index, name, "boolean", AttributeValue::as_bool)
    }

    pub fn optional_enum(&self, index: usize, name: &'static str) -> Result<Option<&'e str>> {
        self.optional(index, name, "enumeration", AttributeValue::as_enum)
    }

    pub fn required_enum(&self, index: usize, name: &'static str) -> Result<&'e str> {
        self.required(index, name, "enumeration", AttributeValue::as_enum)
    }

    pub fn optional_string(&self, index: usize, name: &'static str) -> Result<Option<&'e str>> {
        self.optional(index, name, "string", AttributeValue::as_string)
    }
}

fn ref_list(value: &AttributeValue) -> Option<Vec<u32>> {
    value.as_list()?.iter().map(|v| v.as_entity_ref()).collect()
}
