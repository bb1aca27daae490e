// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Import session: decoder, entity cache, diagnostics and kernel for one
//! IFC file.

use std::any::{Any, TypeId};
use std::sync::Arc;

use ifc_shape_core::{extract_length_unit_scale, find_project, DecodedEntity, EntityDecoder};
use rustc_hash::FxHashMap;

use super::style::StyleIndex;
use crate::config::ImportConfig;
use crate::error::Result;
use crate::log::ImportLog;
use crate::materials::MaterialRegistry;
use crate::shape::{GeometryKernel, GeometryObject, ShapeEditScope, TargetPolicy, TopologyKernel};

/// An entity type that can be constructed from its decoded STEP record
pub trait FromEntity: Sized + Send + Sync + 'static {
    fn from_entity(session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self>;
}

type CacheKey = (u32, TypeId);

/// State shared by every construction call of one import.
///
/// Entities are built once per step id and type, then served from the cache.
pub struct ImportSession<'a> {
    pub(crate) decoder: EntityDecoder<'a>,
    pub(crate) config: ImportConfig,
    pub(crate) log: ImportLog,
    pub(crate) kernel: Box<dyn GeometryKernel>,
    pub(crate) materials: MaterialRegistry,
    pub(crate) styles: StyleIndex,
    cache: FxHashMap<CacheKey, Arc<dyn Any + Send + Sync>>,
    length_scale: f64,
    vertex_tolerance: f64,
    short_curve_tolerance: f64,
}

impl<'a> ImportSession<'a> {
    pub fn new(content: &'a str) -> Self {
        Self::with_config(content, ImportConfig::default())
    }

    pub fn with_config(content: &'a str, config: ImportConfig) -> Self {
        Self::with_kernel(content, config, Box::new(TopologyKernel::new()))
    }

    /// Session with a caller-supplied geometry kernel
    pub fn with_kernel(
        content: &'a str,
        config: ImportConfig,
        kernel: Box<dyn GeometryKernel>,
    ) -> Self {
        let mut decoder = EntityDecoder::new(content);
        let mut log = ImportLog::new();

        let length_scale = match find_project(&decoder) {
            Some(project) => match extract_length_unit_scale(&mut decoder, project) {
                Ok(scale) if scale.is_finite() && scale > 0.0 => scale,
                Ok(scale) => {
                    let message = format!("unusable length unit scale {scale}, assuming metres");
                    log.warn(project, message);
                    1.0
                }
                Err(e) => {
                    let message = format!("length unit could not be read, assuming metres: {e}");
                    log.warn(project, message);
                    1.0
                }
            },
            None => 1.0,
        };

        let styles = StyleIndex::build(&mut decoder, &mut log);

        tracing::debug!(
            entities = decoder.entity_count(),
            length_scale,
            styled_items = styles.item_count(),
            "import session opened"
        );

        Self {
            decoder,
            vertex_tolerance: config.vertex_tolerance / length_scale,
            short_curve_tolerance: config.short_curve_tolerance / length_scale,
            config,
            log,
            kernel,
            materials: MaterialRegistry::new(),
            styles,
            cache: FxHashMap::default(),
            length_scale,
        }
    }

    /// Constructs (or returns the cached) entity `id` as `T`
    pub fn entity<T: FromEntity>(&mut self, id: u32) -> Result<Arc<T>> {
        let key = (id, TypeId::of::<T>());
        if let Some(cached) = self.cache.get(&key) {
            if let Ok(entity) = Arc::clone(cached).downcast::<T>() {
                return Ok(entity);
            }
        }

        let decoded = self.decoder.decode_by_id(id)?;
        let entity = Arc::new(T::from_entity(self, &decoded)?);
        self.cache.insert(key, Arc::clone(&entity) as Arc<dyn Any + Send + Sync>);
        Ok(entity)
    }

    pub(crate) fn decode(&mut self, id: u32) -> Result<Arc<DecodedEntity>> {
        Ok(self.decoder.decode_by_id(id)?)
    }

    /// Builds the scope's collected face sets with this session's kernel
    pub(crate) fn build(
        &mut self,
        scope: &mut ShapeEditScope,
        policy: TargetPolicy,
        entity_id: u32,
    ) -> Result<Vec<GeometryObject>> {
        scope.build_geometry(policy, self.kernel.as_ref(), &mut self.log, entity_id)
    }

    /// A fresh edit scope for `owner` with this session's tolerances
    pub fn edit_scope(&self, owner: u32) -> ShapeEditScope {
        ShapeEditScope::new(
            owner,
            self.vertex_tolerance,
            self.short_curve_tolerance,
            self.config.default_target,
        )
    }

    pub fn log(&self) -> &ImportLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ImportLog {
        &mut self.log
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn kernel(&self) -> &dyn GeometryKernel {
        self.kernel.as_ref()
    }

    /// Metres per model length unit
    #[inline]
    pub fn length_scale(&self) -> f64 {
        self.length_scale
    }

    /// Vertex tolerance in model units
    #[inline]
    pub fn vertex_tolerance(&self) -> f64 {
        self.vertex_tolerance
    }

    /// Short curve tolerance in model units
    #[inline]
    pub fn short_curve_tolerance(&self) -> f64 {
        self.short_curve_tolerance
    }

    /// Number of constructed entities held by the cache
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}
