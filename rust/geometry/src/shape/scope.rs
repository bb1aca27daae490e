// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The shape edit scope: per-product state for assembling geometry.
//!
//! Calls nest strictly: face set, then face, then loops. A face cannot be
//! started outside a face set, and a face set cannot be opened or closed
//! while a face is pending; violations fail with
//! [`Error::InvalidOperation`].

use std::ops::{Deref, DerefMut};

use nalgebra::Point3;

use crate::curves::{PlanViewCurve, PlanViewCurves};
use crate::error::{Error, Result};
use crate::fuzzy::CanonicalVertexMap;
use crate::log::ImportLog;
use crate::materials::{MaterialId, MaterialStack};
use crate::shape::builder::FaceSetBuilder;
use crate::shape::face::{BoundaryLoop, PendingFace};
use crate::shape::kernel::{BuildOutcome, GeometryKernel};
use crate::shape::policy::{FallbackKind, TargetKind, TargetPolicy};
use crate::shape::solid::GeometryObject;

#[derive(Debug)]
pub struct ShapeEditScope {
    owner: u32,
    tolerance: f64,
    vertices: CanonicalVertexMap,
    pending: Option<PendingFace>,
    face_sets: FaceSetBuilder,
    /// Face sets opened since the last build
    sets_opened: usize,
    materials: MaterialStack,
    target: TargetPolicy,
    representation: Option<String>,
    plan_view: PlanViewCurves,
}

impl ShapeEditScope {
    /// Scope for the product `owner`, with tolerances in model units
    pub fn new(
        owner: u32,
        vertex_tolerance: f64,
        short_curve_tolerance: f64,
        target: TargetPolicy,
    ) -> Self {
        Self {
            owner,
            tolerance: vertex_tolerance,
            vertices: CanonicalVertexMap::new(vertex_tolerance),
            pending: None,
            face_sets: FaceSetBuilder::new(),
            sets_opened: 0,
            materials: MaterialStack::new(),
            target,
            representation: None,
            plan_view: PlanViewCurves::new(short_curve_tolerance),
        }
    }

    pub fn owner(&self) -> u32 {
        self.owner
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    // ---- face sets ----

    /// Opens a face set for the shell `owner` and clears the vertex map
    pub fn start_collecting_face_set(&mut self, owner: u32) -> Result<()> {
        if self.pending.is_some() {
            return Err(Error::InvalidOperation(
                "cannot open a face set while a face is open",
            ));
        }
        self.face_sets.open(owner)?;
        self.sets_opened += 1;
        self.vertices.clear();
        Ok(())
    }

    /// Closes the open face set, returning its face count
    pub fn stop_collecting_face_set(&mut self) -> Result<usize> {
        if self.pending.is_some() {
            return Err(Error::InvalidOperation(
                "cannot close a face set while a face is open",
            ));
        }
        self.face_sets.close()
    }

    /// Drops the open face set and any pending face
    pub fn abandon_face_set(&mut self) {
        self.pending = None;
        if self.face_sets.abandon().is_some() {
            self.sets_opened = self.sets_opened.saturating_sub(1);
        }
        self.vertices.clear();
    }

    pub fn is_collecting_face_set(&self) -> bool {
        self.face_sets.is_open()
    }

    // ---- faces ----

    /// Starts a face; any loops of a previous unsealed face are dropped
    pub fn start_collecting_face(&mut self, material: Option<MaterialId>) -> Result<()> {
        if !self.face_sets.is_open() {
            return Err(Error::InvalidOperation("no face set is open"));
        }
        self.pending = Some(PendingFace::new(material));
        Ok(())
    }

    /// Validates a boundary loop and adds it to the pending face.
    ///
    /// A rejected loop leaves the face untouched.
    pub fn add_loop(&mut self, points: &[Point3<f64>]) -> Result<()> {
        let pending = self
            .pending
            .as_mut()
            .ok_or(Error::InvalidOperation("no face is open"))?;
        let boundary = BoundaryLoop::new(points, &mut self.vertices)?;
        pending.loops.push(boundary);
        Ok(())
    }

    pub fn has_active_loops(&self) -> bool {
        self.pending.as_ref().is_some_and(|f| !f.loops.is_empty())
    }

    /// Seals the pending face into the open face set
    pub fn stop_collecting_face(&mut self) -> Result<()> {
        let pending = self
            .pending
            .take()
            .ok_or(Error::InvalidOperation("no face is open"))?;
        let face = pending
            .seal()
            .ok_or(Error::InvalidOperation("face has no loops"))?;
        self.face_sets.add_face(face)?;
        self.vertices.clear();
        Ok(())
    }

    /// Drops the pending face, if any
    pub fn abort_current_face(&mut self) {
        self.pending = None;
    }

    pub fn is_collecting_face(&self) -> bool {
        self.pending.is_some()
    }

    /// Faces sealed into the open face set
    pub fn open_face_count(&self) -> usize {
        self.face_sets.open_face_count()
    }

    /// Drops every pending face and face set
    pub fn discard(&mut self) {
        self.pending = None;
        self.face_sets.clear();
        self.sets_opened = 0;
        self.vertices.clear();
    }

    // ---- building ----

    /// Builds the collected face sets with a (target, fallback) pair.
    ///
    /// Fails immediately on an invalid pair.
    pub fn create_geometry(
        &mut self,
        target: TargetKind,
        fallback: FallbackKind,
        kernel: &dyn GeometryKernel,
        log: &mut ImportLog,
        entity_id: u32,
    ) -> Result<Vec<GeometryObject>> {
        let policy = TargetPolicy::new(target, fallback)?;
        self.build_geometry(policy, kernel, log, entity_id)
    }

    /// Exactly one solid, or nothing
    pub fn create_closed_solid(
        &mut self,
        kernel: &dyn GeometryKernel,
        log: &mut ImportLog,
        entity_id: u32,
    ) -> Result<Option<GeometryObject>> {
        let geometry =
            self.build_geometry(TargetPolicy::closed_solid(), kernel, log, entity_id)?;
        Ok(geometry.into_iter().find(GeometryObject::is_solid))
    }

    /// Solid first when possible, then a mesh of what fell back
    pub fn create_solid_or_mesh(
        &mut self,
        kernel: &dyn GeometryKernel,
        log: &mut ImportLog,
        entity_id: u32,
    ) -> Result<Vec<GeometryObject>> {
        self.build_geometry(TargetPolicy::solid_or_mesh(), kernel, log, entity_id)
    }

    /// Closes any open face set, hands every collected set to `kernel` and
    /// clears the collected state before returning.
    pub fn build_geometry(
        &mut self,
        policy: TargetPolicy,
        kernel: &dyn GeometryKernel,
        log: &mut ImportLog,
        entity_id: u32,
    ) -> Result<Vec<GeometryObject>> {
        if self.pending.is_some() {
            return Err(Error::InvalidOperation("cannot build while a face is open"));
        }
        if self.face_sets.is_open() {
            self.face_sets.close()?;
        }
        if self.sets_opened == 0 {
            return Err(Error::InvalidOperation("no face set was collected"));
        }

        let sets = self.face_sets.take_closed();
        self.sets_opened = 0;
        self.vertices.clear();

        tracing::debug!(
            entity_id,
            face_sets = sets.len(),
            faces = sets.iter().map(|s| s.len()).sum::<usize>(),
            policy = ?policy,
            "building shape"
        );

        let outcome = if sets.is_empty() {
            BuildOutcome::default()
        } else {
            kernel.build_tessellated(&sets, policy, self.tolerance)?
        };

        for note in outcome.notes {
            log.warn(entity_id, note);
        }
        if outcome.geometry.is_empty() && policy.allows_mesh() {
            log.warn(entity_id, "no geometry could be built");
        }
        Ok(outcome.geometry)
    }

    // ---- scoped state ----

    #[inline]
    pub fn current_material(&self) -> Option<MaterialId> {
        self.materials.current()
    }

    pub fn material_depth(&self) -> usize {
        self.materials.depth()
    }

    /// Makes `material` current until the guard drops; `None` pushes nothing
    pub fn push_material(&mut self, material: Option<MaterialId>) -> MaterialGuard<'_> {
        if let Some(m) = material {
            self.materials.push(m);
        }
        MaterialGuard {
            scope: self,
            pushed: material.is_some(),
        }
    }

    #[inline]
    pub fn target_policy(&self) -> TargetPolicy {
        self.target
    }

    /// Replaces the target policy until the guard drops
    pub fn set_target(&mut self, policy: TargetPolicy) -> TargetGuard<'_> {
        let previous = std::mem::replace(&mut self.target, policy);
        TargetGuard {
            scope: self,
            previous,
        }
    }

    /// Identifier of the representation being processed
    pub fn containing_representation(&self) -> Option<&str> {
        self.representation.as_deref()
    }

    pub fn set_containing_representation(&mut self, identifier: &str) -> RepresentationGuard<'_> {
        let previous = self.representation.replace(identifier.to_string());
        RepresentationGuard {
            scope: self,
            previous,
        }
    }

    // ---- plan view ----

    pub fn add_plan_view_curve(&mut self, points: &[Point3<f64>]) -> Result<&PlanViewCurve> {
        self.plan_view.add(points)
    }

    pub fn plan_view_curves(&self) -> &PlanViewCurves {
        &self.plan_view
    }

    pub fn take_plan_view_curves(&mut self) -> PlanViewCurves {
        let tolerance = self.plan_view.tolerance();
        std::mem::replace(&mut self.plan_view, PlanViewCurves::new(tolerance))
    }
}

macro_rules! scope_guard {
    ($name:ident) => {
        impl Deref for $name<'_> {
            type Target = ShapeEditScope;

            fn deref(&self) -> &ShapeEditScope {
                self.scope
            }
        }

        impl DerefMut for $name<'_> {
            fn deref_mut(&mut self) -> &mut ShapeEditScope {
                self.scope
            }
        }
    };
}

/// Pops its material on drop
pub struct MaterialGuard<'a> {
    scope: &'a mut ShapeEditScope,
    pushed: bool,
}

impl Drop for MaterialGuard<'_> {
    fn drop(&mut self) {
        if self.pushed {
            self.scope.materials.pop();
        }
    }
}

/// Restores the previous target policy on drop
pub struct TargetGuard<'a> {
    scope: &'a mut ShapeEditScope,
    previous: TargetPolicy,
}

impl Drop for TargetGuard<'_> {
    fn drop(&mut self) {
        self.scope.target = self.previous;
    }
}

/// Restores the previous containing representation on drop
pub struct RepresentationGuard<'a> {
    scope: &'a mut ShapeEditScope,
    previous: Option<String>,
}

impl Drop for RepresentationGuard<'_> {
    fn drop(&mut self) {
        self.scope.representation = self.previous.take();
    }
}

scope_guard!(MaterialGuard);
scope_guard!(TargetGuard);
scope_guard!(RepresentationGuard);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::kernel::TopologyKernel;
    use approx::assert_relative_eq;
    use ifc_shape_topology::box_faces;

    const TOL: f64 = 1e-4;

    fn scope() -> ShapeEditScope {
        ShapeEditScope::new(100, TOL, 2.5 * TOL, TargetPolicy::solid_or_mesh())
    }

    fn add_cube(scope: &mut ShapeEditScope, min: [f64; 3], max: [f64; 3], skip: Option<usize>) {
        scope.start_collecting_face_set(1).unwrap();
        for (i, face) in box_faces(min, max).into_iter().enumerate() {
            scope.start_collecting_face(scope.current_material()).unwrap();
            let points = if Some(i) == skip {
                vec![face.outer[0], face.outer[1], face.outer[0]]
            } else {
                face.outer
            };
            match scope.add_loop(&points) {
                Ok(()) => scope.stop_collecting_face().unwrap(),
                Err(e) => {
                    assert!(e.is_recoverable());
                    scope.abort_current_face();
                }
            }
        }
        scope.stop_collecting_face_set().unwrap();
    }

    #[test]
    fn unit_cube_builds_single_solid() {
        let mut scope = scope();
        let mut log = ImportLog::new();
        add_cube(&mut scope, [0.0; 3], [1.0; 3], None);

        let geometry = scope
            .create_geometry(
                TargetKind::AnySolidThenMesh,
                FallbackKind::Mesh,
                &TopologyKernel,
                &mut log,
                1,
            )
            .unwrap();
        assert_eq!(geometry.len(), 1);
        let solid = geometry[0].as_solid().unwrap();
        assert_eq!(solid.face_count(), 6);
        assert_relative_eq!(solid.volume(), 1.0, epsilon = 1e-9);
        assert!(log.is_empty());
    }

    #[test]
    fn invalid_face_falls_back_to_mesh_of_remaining_faces() {
        let mut scope = scope();
        let mut log = ImportLog::new();
        add_cube(&mut scope, [0.0; 3], [1.0; 3], Some(3));

        let geometry = scope
            .create_solid_or_mesh(&TopologyKernel, &mut log, 1)
            .unwrap();
        assert_eq!(geometry.len(), 1);
        assert_eq!(geometry[0].as_mesh().unwrap().triangle_count(), 10);
        assert!(log.warning_count() > 0);
    }

    #[test]
    fn closed_solid_is_empty_when_shell_is_open() {
        let mut scope = scope();
        let mut log = ImportLog::new();
        add_cube(&mut scope, [0.0; 3], [1.0; 3], Some(0));
        assert!(scope
            .create_closed_solid(&TopologyKernel, &mut log, 1)
            .unwrap()
            .is_none());
    }

    #[test]
    fn invalid_policy_fails_before_touching_state() {
        let mut scope = scope();
        let mut log = ImportLog::new();
        let err = scope
            .create_geometry(
                TargetKind::SolidOnly,
                FallbackKind::Mesh,
                &TopologyKernel,
                &mut log,
                1,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPolicy { .. }));

        add_cube(&mut scope, [0.0; 3], [1.0; 3], None);
        assert!(scope
            .create_geometry(
                TargetKind::SolidOnly,
                FallbackKind::Mesh,
                &TopologyKernel,
                &mut log,
                1,
            )
            .is_err());
        // Faces survive the rejected call
        let geometry = scope.create_solid_or_mesh(&TopologyKernel, &mut log, 1).unwrap();
        assert_eq!(geometry.len(), 1);
    }

    #[test]
    fn build_clears_state_between_solids() {
        let mut scope = scope();
        let mut log = ImportLog::new();
        add_cube(&mut scope, [0.0; 3], [1.0; 3], None);
        scope.create_solid_or_mesh(&TopologyKernel, &mut log, 1).unwrap();

        add_cube(&mut scope, [5.0; 3], [7.0; 3], None);
        let second = scope.create_solid_or_mesh(&TopologyKernel, &mut log, 2).unwrap();
        assert_eq!(second.len(), 1);
        assert_relative_eq!(second[0].as_solid().unwrap().volume(), 8.0, epsilon = 1e-9);

        let err = scope.create_solid_or_mesh(&TopologyKernel, &mut log, 3).unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn misuse_is_reported() {
        let mut scope = scope();
        assert!(scope.start_collecting_face(None).unwrap_err().is_usage());
        assert!(scope.add_loop(&[Point3::origin(); 3]).unwrap_err().is_usage());
        assert!(scope.stop_collecting_face().unwrap_err().is_usage());
        assert!(scope.stop_collecting_face_set().unwrap_err().is_usage());

        scope.start_collecting_face_set(1).unwrap();
        scope.start_collecting_face(None).unwrap();
        assert!(scope.start_collecting_face_set(2).unwrap_err().is_usage());
        assert!(scope.stop_collecting_face_set().unwrap_err().is_usage());
        assert!(!scope.has_active_loops());
        assert!(scope.stop_collecting_face().unwrap_err().is_usage());

        let mut log = ImportLog::new();
        scope.start_collecting_face(None).unwrap();
        assert!(scope
            .create_solid_or_mesh(&TopologyKernel, &mut log, 1)
            .unwrap_err()
            .is_usage());
    }

    #[test]
    fn empty_face_set_warns_under_mesh_policy() {
        let mut scope = scope();
        let mut log = ImportLog::new();
        scope.start_collecting_face_set(1).unwrap();
        let geometry = scope.create_solid_or_mesh(&TopologyKernel, &mut log, 9).unwrap();
        assert!(geometry.is_empty());
        assert_eq!(log.for_entity(9).count(), 1);
    }

    #[test]
    fn guards_restore_on_drop() {
        let mut scope = scope();
        {
            let mut scope = scope.push_material(Some(MaterialId(1)));
            {
                let scope = scope.push_material(Some(MaterialId(2)));
                assert_eq!(scope.current_material(), Some(MaterialId(2)));
            }
            let scope = scope.push_material(None);
            assert_eq!(scope.current_material(), Some(MaterialId(1)));
            assert_eq!(scope.material_depth(), 1);
        }
        assert_eq!(scope.current_material(), None);

        {
            let mut scope = scope.set_target(TargetPolicy::closed_solid());
            assert_eq!(scope.target_policy(), TargetPolicy::closed_solid());
            let scope = scope.set_containing_representation("FootPrint");
            assert_eq!(scope.containing_representation(), Some("FootPrint"));
        }
        assert_eq!(scope.target_policy(), TargetPolicy::solid_or_mesh());
        assert_eq!(scope.containing_representation(), None);
    }

    #[test]
    fn guard_restores_on_early_return() {
        fn fails(scope: &mut ShapeEditScope) -> Result<()> {
            let mut scope = scope.push_material(Some(MaterialId(5)));
            scope.add_loop(&[])?;
            Ok(())
        }
        let mut scope = scope();
        assert!(fails(&mut scope).is_err());
        assert_eq!(scope.material_depth(), 0);
    }

    #[test]
    fn faces_record_current_material() {
        let mut scope = scope();
        let mut log = ImportLog::new();
        {
            let mut scope = scope.push_material(Some(MaterialId(3)));
            add_cube(&mut scope, [0.0; 3], [1.0; 3], None);
        }
        let geometry = scope.create_solid_or_mesh(&TopologyKernel, &mut log, 1).unwrap();
        let solid = geometry[0].as_solid().unwrap();
        assert!(solid
            .face_materials()
            .iter()
            .all(|(_, m)| *m == Some(MaterialId(3))));
    }

    #[test]
    fn plan_view_curves_are_collected() {
        let mut scope = scope();
        scope
            .add_plan_view_curve(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0)])
            .unwrap();
        assert_eq!(scope.plan_view_curves().len(), 1);
        let curves = scope.take_plan_view_curves();
        assert_eq!(curves.len(), 1);
        assert!(scope.plan_view_curves().is_empty());
    }
}
