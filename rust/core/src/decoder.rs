// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity Decoder - On-demand entity parsing
//!
//! Entities are decoded lazily from byte offsets and cached behind `Arc` so
//! repeated visits of shared entities (points, loops, styles) are cheap.

use crate::attributes::{AttributeValue, DecodedEntity};
use crate::error::{Error, Result};
use crate::parser::{parse_entity, record_end, EntityScanner};
use crate::schema::IfcType;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Entity id -> byte range of its record
pub type EntityIndex = FxHashMap<u32, (usize, usize)>;

/// Build entity index from content - O(n) scan using memchr
pub fn build_entity_index(content: &str) -> EntityIndex {
    let bytes = content.as_bytes();
    let len = bytes.len();

    // Roughly 1 entity per 50 bytes
    let mut index = FxHashMap::with_capacity_and_hasher(len / 50, Default::default());

    let mut pos = 0;
    while let Some(offset) = memchr::memchr(b'#', &bytes[pos..]) {
        let start = pos + offset;
        pos = start + 1;

        let id_start = pos;
        while pos < len && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let id_end = pos;

        // Handles both `#45=` and `#45 = `
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        if id_end > id_start && pos < len && bytes[pos] == b'=' {
            match record_end(bytes, pos) {
                Some(end) => {
                    if let Ok(id) = content[id_start..id_end].parse::<u32>() {
                        index.insert(id, (start, end));
                    }
                    pos = end;
                }
                None => break, // unterminated record
            }
        }
    }

    index
}

/// Lazy entity decoder with an `Arc` cache
pub struct EntityDecoder<'a> {
    content: &'a str,
    cache: FxHashMap<u32, Arc<DecodedEntity>>,
    entity_index: Arc<EntityIndex>,
}

impl<'a> EntityDecoder<'a> {
    /// Create decoder, indexing the content once
    pub fn new(content: &'a str) -> Self {
        Self::with_index(content, build_entity_index(content))
    }

    /// Create decoder with pre-built index
    pub fn with_index(content: &'a str, index: EntityIndex) -> Self {
        Self {
            content,
            cache: FxHashMap::default(),
            entity_index: Arc::new(index),
        }
    }

    pub fn content(&self) -> &'a str {
        self.content
    }

    /// Number of indexed entities
    pub fn entity_count(&self) -> usize {
        self.entity_index.len()
    }

    pub fn contains(&self, entity_id: u32) -> bool {
        self.entity_index.contains_key(&entity_id)
    }

    fn decode_at(
        &mut self,
        entity_id: u32,
        start: usize,
        end: usize,
    ) -> Result<Arc<DecodedEntity>> {
        let line = &self.content[start..end];
        let (id, ifc_type, tokens) = parse_entity(line).map_err(|e| match e {
            Error::Parse { position, message } => Error::Parse {
                position: start + position,
                message,
            },
            other => other,
        })?;
        debug_assert_eq!(id, entity_id);

        let attributes = tokens.iter().map(AttributeValue::from_token).collect();
        let entity = Arc::new(DecodedEntity::new(id, ifc_type, attributes));
        self.cache.insert(entity_id, Arc::clone(&entity));
        Ok(entity)
    }

    /// Decode entity by ID - O(1) lookup using entity index
    pub fn decode_by_id(&mut self, entity_id: u32) -> Result<Arc<DecodedEntity>> {
        if let Some(entity) = self.cache.get(&entity_id) {
            return Ok(Arc::clone(entity));
        }

        let (start, end) = self
            .entity_index
            .get(&entity_id)
            .copied()
            .ok_or(Error::EntityNotFound(entity_id))?;

        self.decode_at(entity_id, start, end)
    }

    /// Decode an entity only to learn its type
    pub fn type_of(&mut self, entity_id: u32) -> Result<IfcType> {
        Ok(self.decode_by_id(entity_id)?.ifc_type.clone())
    }

    /// Resolve entity reference (follow #ID); `None` for null/derived values
    pub fn resolve_ref(&mut self, attr: &AttributeValue) -> Result<Option<Arc<DecodedEntity>>> {
        match attr.as_entity_ref() {
            Some(id) => Ok(Some(self.decode_by_id(id)?)),
            None => Ok(None),
        }
    }

    /// Resolve list of entity references, skipping non-reference items
    pub fn resolve_ref_list(&mut self, attr: &AttributeValue) -> Result<Vec<Arc<DecodedEntity>>> {
        let list = attr
            .as_list()
            .ok_or_else(|| Error::parse(0, "expected list of entity references"))?;

        let mut entities = Vec::with_capacity(list.len());
        for id in list.iter().filter_map(AttributeValue::as_entity_ref) {
            entities.push(self.decode_by_id(id)?);
        }
        Ok(entities)
    }

    /// Ids of every entity of the given type, in step-id order
    pub fn ids_of_type(&self, ifc_type: &IfcType) -> Vec<u32> {
        let mut ids: Vec<u32> = EntityScanner::new(self.content)
            .find_by_type(ifc_type.as_str())
            .into_iter()
            .map(|(id, _, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every indexed id, in step-id order
    pub fn all_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.entity_index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
