// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry kernel seam.
//!
//! The edit scope and entity graph only call a [`GeometryKernel`]: build a
//! tessellated shape under a target policy, create an exact extrusion, or
//! create a mesh by extrusion. [`TopologyKernel`] implements it on the
//! `ifc-shape-topology` BRep arena.

use ifc_shape_topology::{BrepArena, FaceKey, FaceLoops, ShellKey};
use nalgebra::{Matrix4, Vector3};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::extrusion::{extrude_profile, extrusion_faces};
use crate::materials::MaterialId;
use crate::mesh::Mesh;
use crate::profile::Profile2D;
use crate::shape::builder::FaceSet;
use crate::shape::policy::TargetPolicy;
use crate::shape::solid::{append_faces, GeometryObject, Solid};

/// Result of a tessellated build
#[derive(Debug, Default)]
pub struct BuildOutcome {
    /// Solid first when present, mesh second
    pub geometry: Vec<GeometryObject>,
    /// Non-fatal diagnostics for the caller to log
    pub notes: Vec<String>,
}

/// Parameters of an extrusion in the profile's local system
#[derive(Debug, Clone)]
pub struct ExtrusionRequest<'a> {
    pub profile: &'a Profile2D,
    pub direction: Vector3<f64>,
    pub depth: f64,
    /// Local system to model coordinates
    pub transform: Matrix4<f64>,
    pub material: Option<MaterialId>,
    pub tolerance: f64,
}

/// Shape construction capability used by the importer
pub trait GeometryKernel {
    /// Builds geometry from closed face sets.
    ///
    /// The first set bounds the solid; later sets are its voids. Fails only
    /// on internal errors: shapes that cannot be built yield an empty or
    /// mesh-only outcome with notes.
    fn build_tessellated(
        &self,
        face_sets: &[FaceSet],
        policy: TargetPolicy,
        tolerance: f64,
    ) -> Result<BuildOutcome>;

    /// Exact extruded solid
    fn create_extrusion(&self, request: &ExtrusionRequest<'_>) -> Result<Solid>;

    /// Triangulated extrusion
    fn create_mesh_by_extrusion(&self, request: &ExtrusionRequest<'_>) -> Result<Mesh>;
}

/// Kernel backed by [`BrepArena`] face sewing
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologyKernel;

/// One face set after sewing
struct SewnSet {
    index: usize,
    shell: ShellKey,
    faces: Vec<(FaceKey, Option<MaterialId>)>,
    closed: bool,
}

impl TopologyKernel {
    pub fn new() -> Self {
        Self
    }

    fn sew(
        arena: &mut BrepArena,
        face_sets: &[FaceSet],
        tolerance: f64,
        notes: &mut Vec<String>,
    ) -> Vec<SewnSet> {
        let mut sewn_sets = Vec::with_capacity(face_sets.len());
        for (index, set) in face_sets.iter().enumerate() {
            let loops: Vec<FaceLoops> = set.faces.iter().map(|f| f.to_face_loops()).collect();
            let sewn = match arena.sew_shell(&loops, tolerance) {
                Ok(sewn) => sewn,
                Err(e) => {
                    notes.push(format!("face set {index} could not be sewn: {e}"));
                    continue;
                }
            };
            for (face, reason) in &sewn.rejected {
                notes.push(format!("face {face} of face set {index} rejected: {reason}"));
            }

            let closed = match arena.check_closed_shell(sewn.shell) {
                Ok(()) => true,
                Err(e) => {
                    notes.push(format!("face set {index} does not bound a solid: {e}"));
                    false
                }
            };
            sewn_sets.push(SewnSet {
                index,
                shell: sewn.shell,
                faces: sewn
                    .faces
                    .iter()
                    .map(|&(i, key)| (key, set.faces[i].material))
                    .collect(),
                closed,
            });
        }
        sewn_sets
    }
}

impl GeometryKernel for TopologyKernel {
    fn build_tessellated(
        &self,
        face_sets: &[FaceSet],
        policy: TargetPolicy,
        tolerance: f64,
    ) -> Result<BuildOutcome> {
        let mut outcome = BuildOutcome::default();
        let mut arena = BrepArena::new();
        let sewn = Self::sew(&mut arena, face_sets, tolerance, &mut outcome.notes);
        if sewn.is_empty() {
            return Ok(outcome);
        }

        let mut fallback: Vec<&SewnSet> = Vec::new();
        let mut solid_key = None;

        match sewn.first() {
            Some(outer) if outer.index == 0 && outer.closed => {
                let (voids, open): (Vec<&SewnSet>, Vec<&SewnSet>) =
                    sewn[1..].iter().partition(|s| s.closed);
                fallback.extend(open);
                let void_keys: Vec<ShellKey> = voids.iter().map(|s| s.shell).collect();
                match arena.add_solid(outer.shell, &void_keys) {
                    Ok(key) => solid_key = Some(key),
                    Err(e) => {
                        outcome.notes.push(format!("solid rejected: {e}"));
                        fallback = sewn.iter().collect();
                    }
                }
            }
            _ => fallback = sewn.iter().collect(),
        }

        let mut mesh = Mesh::new();
        if policy.allows_mesh() {
            for set in &fallback {
                if let Err(e) = append_faces(&arena, set.faces.iter().copied(), &mut mesh) {
                    outcome
                        .notes
                        .push(format!("face set {} could not be tessellated: {e}", set.index));
                }
            }
        } else if !fallback.is_empty() {
            outcome
                .notes
                .push(format!("{} face set(s) discarded: solid required", fallback.len()));
        }

        if let Some(key) = solid_key {
            let materials: FxHashMap<FaceKey, MaterialId> = sewn
                .iter()
                .flat_map(|s| s.faces.iter())
                .filter_map(|&(face, material)| material.map(|m| (face, m)))
                .collect();
            outcome
                .geometry
                .push(GeometryObject::Solid(Solid::new(arena, key, materials)?));
        }
        if !mesh.is_empty() {
            outcome.geometry.push(GeometryObject::Mesh(mesh));
        }
        Ok(outcome)
    }

    fn create_extrusion(&self, request: &ExtrusionRequest<'_>) -> Result<Solid> {
        let faces = extrusion_faces(
            request.profile,
            &request.direction,
            request.depth,
            &request.transform,
        )?;

        let mut arena = BrepArena::new();
        let sewn = arena.sew_shell(&faces, request.tolerance)?;
        if let Some((_, reason)) = sewn.rejected.into_iter().next() {
            return Err(Error::Kernel(reason));
        }
        let key = arena.add_solid(sewn.shell, &[])?;

        let materials = match request.material {
            Some(m) => sewn.faces.iter().map(|&(_, face)| (face, m)).collect(),
            None => FxHashMap::default(),
        };
        Solid::new(arena, key, materials)
    }

    fn create_mesh_by_extrusion(&self, request: &ExtrusionRequest<'_>) -> Result<Mesh> {
        extrude_profile(
            request.profile,
            &request.direction,
            request.depth,
            Some(&request.transform),
            request.material,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::create_rectangle;
    use crate::shape::face::TessellatedFace;
    use approx::assert_relative_eq;
    use ifc_shape_topology::box_faces;

    fn face_set(owner: u32, min: [f64; 3], max: [f64; 3], reverse: bool) -> FaceSet {
        let mut set = FaceSet::new(owner);
        for f in box_faces(min, max) {
            let mut outer = f.outer;
            if reverse {
                outer.reverse();
            }
            set.faces.push(TessellatedFace {
                outer,
                inner: Vec::new(),
                material: Some(MaterialId(owner)),
            });
        }
        set
    }

    #[test]
    fn closed_cube_builds_one_solid() {
        let sets = [face_set(1, [0.0; 3], [1.0; 3], false)];
        let outcome = TopologyKernel
            .build_tessellated(&sets, TargetPolicy::solid_or_mesh(), 1e-6)
            .unwrap();
        assert_eq!(outcome.geometry.len(), 1);
        let solid = outcome.geometry[0].as_solid().unwrap();
        assert_relative_eq!(solid.volume(), 1.0, epsilon = 1e-9);
        assert!(outcome.notes.is_empty());
    }

    #[test]
    fn open_shell_falls_back_to_mesh() {
        let mut set = face_set(1, [0.0; 3], [1.0; 3], false);
        set.faces.pop();
        let outcome = TopologyKernel
            .build_tessellated(&[set.clone()], TargetPolicy::solid_or_mesh(), 1e-6)
            .unwrap();
        assert_eq!(outcome.geometry.len(), 1);
        assert_eq!(outcome.geometry[0].as_mesh().unwrap().triangle_count(), 10);
        assert!(!outcome.notes.is_empty());

        let strict = TopologyKernel
            .build_tessellated(&[set], TargetPolicy::closed_solid(), 1e-6)
            .unwrap();
        assert!(strict.geometry.is_empty());
    }

    #[test]
    fn void_shell_is_subtracted() {
        let sets = [
            face_set(1, [0.0; 3], [3.0; 3], false),
            face_set(2, [1.0; 3], [2.0; 3], true),
        ];
        let outcome = TopologyKernel
            .build_tessellated(&sets, TargetPolicy::closed_solid(), 1e-6)
            .unwrap();
        let solid = outcome.geometry[0].as_solid().unwrap();
        assert_eq!(solid.shell_count(), 2);
        assert_eq!(solid.face_count(), 12);
        assert_relative_eq!(solid.volume(), 26.0, epsilon = 1e-9);
    }

    #[test]
    fn open_void_goes_to_mesh_after_solid() {
        let mut void = face_set(2, [1.0; 3], [2.0; 3], true);
        void.faces.truncate(3);
        let sets = [face_set(1, [0.0; 3], [3.0; 3], false), void];
        let outcome = TopologyKernel
            .build_tessellated(&sets, TargetPolicy::solid_or_mesh(), 1e-6)
            .unwrap();
        assert_eq!(outcome.geometry.len(), 2);
        assert!(outcome.geometry[0].is_solid());
        assert!(outcome.geometry[1].is_mesh());
    }

    #[test]
    fn extrusion_solid_and_mesh_agree() {
        let profile = create_rectangle(2.0, 1.0);
        let request = ExtrusionRequest {
            profile: &profile,
            direction: Vector3::z(),
            depth: 3.0,
            transform: Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0)),
            material: Some(MaterialId(0)),
            tolerance: 1e-6,
        };
        let solid = TopologyKernel.create_extrusion(&request).unwrap();
        assert_eq!(solid.face_count(), 6);
        assert_relative_eq!(solid.volume(), 6.0, epsilon = 1e-9);
        assert_relative_eq!(solid.bounds().unwrap().0.x, 4.0, epsilon = 1e-12);

        let mesh = TopologyKernel.create_mesh_by_extrusion(&request).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 6.0, epsilon = 1e-4);
    }

    #[test]
    fn extrusion_with_repeated_profile_point_is_rejected() {
        let mut profile = create_rectangle(2.0, 1.0);
        let repeated = profile.outer[1];
        profile.outer.insert(1, repeated);
        let request = ExtrusionRequest {
            profile: &profile,
            direction: Vector3::z(),
            depth: 1.0,
            transform: Matrix4::identity(),
            material: None,
            tolerance: 1e-6,
        };
        assert!(matches!(
            TopologyKernel.create_extrusion(&request),
            Err(Error::Kernel(_))
        ));
        let mesh = TopologyKernel.create_mesh_by_extrusion(&request).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 2.0, epsilon = 1e-4);
    }
}
