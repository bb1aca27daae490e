// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry objects produced by a build: exact solids and meshes.

use ifc_shape_topology::{BrepArena, FaceKey, SolidKey};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::materials::MaterialId;
use crate::mesh::Mesh;

/// A closed BRep solid that owns its arena
#[derive(Debug, Clone)]
pub struct Solid {
    arena: BrepArena,
    key: SolidKey,
    materials: FxHashMap<FaceKey, MaterialId>,
    volume: f64,
}

impl Solid {
    pub(crate) fn new(
        arena: BrepArena,
        key: SolidKey,
        materials: FxHashMap<FaceKey, MaterialId>,
    ) -> Result<Self> {
        let volume = arena.solid_volume(key)?;
        Ok(Self {
            arena,
            key,
            materials,
            volume,
        })
    }

    pub fn arena(&self) -> &BrepArena {
        &self.arena
    }

    pub fn key(&self) -> SolidKey {
        self.key
    }

    /// Faces of every shell of the solid, outer shell first
    pub fn faces(&self) -> Vec<FaceKey> {
        self.arena.solid_faces(self.key).unwrap_or_default()
    }

    pub fn face_count(&self) -> usize {
        self.faces().len()
    }

    /// Outer shell plus voids
    pub fn shell_count(&self) -> usize {
        self.arena.solid(self.key).map_or(0, |s| 1 + s.voids.len())
    }

    /// Enclosed volume, voids subtracted
    #[inline]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn face_material(&self, face: FaceKey) -> Option<MaterialId> {
        self.materials.get(&face).copied()
    }

    /// Every face with its material
    pub fn face_materials(&self) -> Vec<(FaceKey, Option<MaterialId>)> {
        self.faces()
            .into_iter()
            .map(|f| (f, self.face_material(f)))
            .collect()
    }

    /// Axis-aligned bounds of the solid's vertices
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut bounds: Option<(Point3<f64>, Point3<f64>)> = None;
        for face in self.faces() {
            for l in self.arena.face_loops(face).unwrap_or_default() {
                for p in self.arena.loop_points(l).unwrap_or_default() {
                    bounds = Some(match bounds {
                        Some((min, max)) => (min.inf(&p), max.sup(&p)),
                        None => (p, p),
                    });
                }
            }
        }
        bounds
    }

    /// Flat-shaded triangulation of every face
    pub fn to_mesh(&self) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        append_faces(&self.arena, self.face_materials(), &mut mesh)?;
        Ok(mesh)
    }
}

/// Triangulates arena faces into `mesh`, one flat normal per face
pub(crate) fn append_faces(
    arena: &BrepArena,
    faces: impl IntoIterator<Item = (FaceKey, Option<MaterialId>)>,
    mesh: &mut Mesh,
) -> Result<()> {
    for (face, material) in faces {
        let normal = arena.face_normal(face).unwrap_or_else(Vector3::z);
        for triangle in arena.triangulate_face(face)? {
            let base = mesh.vertex_count() as u32;
            for v in triangle {
                if let Some(p) = arena.vertex(v) {
                    mesh.add_vertex(*p, normal);
                }
            }
            mesh.add_triangle_with_material(base, base + 1, base + 2, material);
        }
    }
    Ok(())
}

/// One object produced by a build
#[derive(Debug, Clone)]
pub enum GeometryObject {
    Solid(Solid),
    Mesh(Mesh),
}

impl GeometryObject {
    pub fn is_solid(&self) -> bool {
        matches!(self, GeometryObject::Solid(_))
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self, GeometryObject::Mesh(_))
    }

    pub fn as_solid(&self) -> Option<&Solid> {
        match self {
            GeometryObject::Solid(s) => Some(s),
            GeometryObject::Mesh(_) => None,
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            GeometryObject::Mesh(m) => Some(m),
            GeometryObject::Solid(_) => None,
        }
    }

    /// Triangles of either kind of object
    pub fn to_mesh(&self) -> Result<Mesh> {
        match self {
            GeometryObject::Solid(s) => s.to_mesh(),
            GeometryObject::Mesh(m) => Ok(m.clone()),
        }
    }
}
