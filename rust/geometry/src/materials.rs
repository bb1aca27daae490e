// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Materials derived from surface styles, and the current-material stack.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Index of a material in a [`MaterialRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Appearance taken from an `IfcSurfaceStyle`
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Step id of the surface style
    pub style_id: u32,
    pub name: Option<String>,
    /// Surface colour, RGB in 0..=1
    pub color: [f64; 3],
    /// 0 is opaque
    pub transparency: f64,
}

impl Material {
    pub fn new(style_id: u32) -> Self {
        Self {
            style_id,
            name: None,
            color: [0.8, 0.8, 0.8],
            transparency: 0.0,
        }
    }
}

/// One material per surface style
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    by_style: FxHashMap<u32, MaterialId>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a material, returning the existing id if its style is known
    pub fn register(&mut self, material: Material) -> MaterialId {
        if let Some(&id) = self.by_style.get(&material.style_id) {
            return id;
        }
        let id = MaterialId(self.materials.len() as u32);
        self.by_style.insert(material.style_id, id);
        self.materials.push(material);
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn by_style(&self, style_id: u32) -> Option<MaterialId> {
        self.by_style.get(&style_id).copied()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i as u32), m))
    }
}

/// LIFO stack of materials; the top is the current material.
///
/// Pushes and pops are paired by the scope guards on
/// [`ShapeEditScope`](crate::ShapeEditScope).
#[derive(Debug, Clone, Default)]
pub struct MaterialStack {
    stack: SmallVec<[MaterialId; 4]>,
}

impl MaterialStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, material: MaterialId) {
        self.stack.push(material);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<MaterialId> {
        self.stack.pop()
    }

    #[inline]
    pub fn current(&self) -> Option<MaterialId> {
        self.stack.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
