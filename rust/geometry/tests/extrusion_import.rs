// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extruded area solids, footprints and target policies.

mod common;

use approx::assert_relative_eq;
use common::StepWriter;
use ifc_shape_geometry::entities::IfcExtrudedAreaSolid;
use ifc_shape_geometry::{
    import_product, Error, FallbackKind, ImportConfig, ImportLog, ImportSession, TargetKind,
    TopologyKernel, Vector3,
};

/// A 2 x 4 rectangle extruded along `direction` by `depth`
fn rectangle_extrusion(writer: &mut StepWriter, direction: &str, depth: &str) -> u32 {
    let profile = writer.add("IFCRECTANGLEPROFILEDEF(.AREA.,$,$,2.,4.)");
    let direction = writer.add(format!("IFCDIRECTION(({direction}))"));
    writer.add(format!("IFCEXTRUDEDAREASOLID(#{profile},$,#{direction},{depth})"))
}

#[test]
fn negative_depth_flips_direction() {
    let mut writer = StepWriter::new();
    let solid = rectangle_extrusion(&mut writer, "0.,0.,1.", "-5.");
    let product = writer.product(&[solid]);
    let content = writer.finish();

    let mut session = ImportSession::new(&content);
    let extrusion = session.entity::<IfcExtrudedAreaSolid>(solid).unwrap();
    assert_relative_eq!(extrusion.depth(), 5.0);
    assert_relative_eq!(extrusion.direction(), Vector3::new(0.0, 0.0, -1.0));

    let warnings: Vec<_> = session.log().for_entity(solid).collect();
    assert_eq!(warnings.len(), 1);
    assert!(!warnings[0].fatal);

    let shape = import_product(&mut session, product).unwrap();
    let built = shape.geometry[0].as_solid().unwrap();
    assert_relative_eq!(built.volume(), 40.0, epsilon = 1e-9);
    let (min, max) = built.bounds().unwrap();
    assert_relative_eq!(min.z, -5.0, epsilon = 1e-12);
    assert_relative_eq!(max.z, 0.0, epsilon = 1e-12);
    assert_eq!(session.log().error_count(), 0);
}

#[test]
fn zero_depth_is_fatal_for_the_item() {
    let mut writer = StepWriter::new();
    let solid = rectangle_extrusion(&mut writer, "0.,0.,1.", "0.");
    let product = writer.product(&[solid]);
    let content = writer.finish();

    let mut session = ImportSession::new(&content);
    assert!(matches!(
        session.entity::<IfcExtrudedAreaSolid>(solid),
        Err(Error::InvalidExtrusion(_))
    ));

    let shape = import_product(&mut session, product).unwrap();
    assert!(shape.geometry.is_empty());
    let errors: Vec<_> = session.log().errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].entity_id, solid);
}

#[test]
fn zero_length_direction_is_an_extrusion_error() {
    let mut writer = StepWriter::new();
    let solid = rectangle_extrusion(&mut writer, "0.,0.,0.", "2.");
    let content = writer.finish();

    let mut session = ImportSession::new(&content);
    assert!(matches!(
        session.entity::<IfcExtrudedAreaSolid>(solid),
        Err(Error::InvalidExtrusion(_))
    ));
}

#[test]
fn positioned_extrusion_is_moved() {
    let mut writer = StepWriter::new();
    let profile = writer.add("IFCRECTANGLEPROFILEDEF(.AREA.,$,$,2.,4.)");
    let location = writer.point([10.0, 0.0, 0.0]);
    let position = writer.add(format!("IFCAXIS2PLACEMENT3D(#{location},$,$)"));
    let solid = writer.add(format!("IFCEXTRUDEDAREASOLID(#{profile},#{position},$,3.)"));
    let product = writer.product(&[solid]);
    let content = writer.finish();

    let mut session = ImportSession::new(&content);
    let shape = import_product(&mut session, product).unwrap();
    let built = shape.geometry[0].as_solid().unwrap();
    let (min, max) = built.bounds().unwrap();
    assert_relative_eq!(min.x, 9.0, epsilon = 1e-12);
    assert_relative_eq!(max.z, 3.0, epsilon = 1e-12);
    assert_relative_eq!(built.volume(), 24.0, epsilon = 1e-9);
}

/// Square profile whose outline repeats a vertex
fn repeated_vertex_extrusion(writer: &mut StepWriter) -> u32 {
    let a = writer.point_2d(0.0, 0.0);
    let b = writer.point_2d(2.0, 0.0);
    let c = writer.point_2d(2.0, 2.0);
    let d = writer.point_2d(0.0, 2.0);
    let outline = writer.add(format!("IFCPOLYLINE((#{a},#{b},#{b},#{c},#{d},#{a}))"));
    let profile = writer.add(format!("IFCARBITRARYCLOSEDPROFILEDEF(.AREA.,$,#{outline})"));
    writer.add(format!("IFCEXTRUDEDAREASOLID(#{profile},$,$,1.)"))
}

#[test]
fn rejected_profile_falls_back_to_mesh() {
    let mut writer = StepWriter::new();
    let solid = repeated_vertex_extrusion(&mut writer);
    let product = writer.product(&[solid]);
    let content = writer.finish();

    let mut session = ImportSession::new(&content);
    let shape = import_product(&mut session, product).unwrap();
    let mesh = shape.geometry[0].as_mesh().expect("mesh fallback");
    assert_relative_eq!(mesh.signed_volume(), 4.0, epsilon = 1e-4);
    assert_eq!(session.log().for_entity(solid).count(), 1);
    assert_eq!(session.log().error_count(), 0);
}

#[test]
fn rejected_profile_is_fatal_under_strict_solids() {
    let mut writer = StepWriter::new();
    let solid = repeated_vertex_extrusion(&mut writer);
    let product = writer.product(&[solid]);
    let content = writer.finish();

    let mut session = ImportSession::with_config(&content, ImportConfig::strict());
    let shape = import_product(&mut session, product).unwrap();
    assert!(shape.geometry.is_empty());
    let errors: Vec<_> = session.log().errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Kernel error"), "{}", errors[0].message);
}

#[test]
fn footprint_curves_are_collected() {
    let mut writer = StepWriter::new();
    let p0 = writer.point([0.0, 0.0, 0.0]);
    let p1 = writer.point([4.0, 0.0, 0.0]);
    let p2 = writer.point([4.0, 3.0, 0.0]);
    let flat = writer.add(format!("IFCPOLYLINE((#{p0},#{p1},#{p2}))"));
    let q0 = writer.point([0.0, 0.0, 0.0]);
    let q1 = writer.point([3.0, 4.0, 2.0]);
    let sloped = writer.add(format!("IFCPOLYLINE((#{q0},#{q1}))"));
    let r0 = writer.point([1.0, 1.0, 0.0]);
    let r1 = writer.point([1.0, 1.0, 5.0]);
    let vertical = writer.add(format!("IFCPOLYLINE((#{r0},#{r1}))"));
    let solid = rectangle_extrusion(&mut writer, "0.,0.,1.", "1.");
    let product = writer.product_with(&[
        ("Body", [solid].as_slice()),
        ("FootPrint", [flat, sloped, vertical].as_slice()),
        ("Axis", [flat].as_slice()),
    ]);
    let content = writer.finish();

    let mut session = ImportSession::new(&content);
    let shape = import_product(&mut session, product).unwrap();
    assert_eq!(shape.solid_count(), 1);

    let curves = shape.footprint.curves();
    assert_eq!(curves.len(), 2);
    assert_eq!(curves[0].elevation, Some(0.0));
    assert!(curves[1].is_projected());
    assert_relative_eq!(curves[1].length(), 5.0, epsilon = 1e-12);
    assert_eq!(session.log().for_entity(vertical).count(), 1);
}

#[test]
fn footprints_can_be_disabled() {
    let mut writer = StepWriter::new();
    let p0 = writer.point([0.0, 0.0, 0.0]);
    let p1 = writer.point([4.0, 0.0, 0.0]);
    let flat = writer.add(format!("IFCPOLYLINE((#{p0},#{p1}))"));
    let product = writer.product_with(&[("FootPrint", [flat].as_slice())]);
    let content = writer.finish();

    let config = ImportConfig {
        collect_footprints: false,
        ..ImportConfig::default()
    };
    let mut session = ImportSession::with_config(&content, config);
    let shape = import_product(&mut session, product).unwrap();
    assert!(shape.is_empty());
}

#[test]
fn solid_only_with_mesh_fallback_is_rejected() {
    let content = "";
    let session = ImportSession::new(content);
    let mut scope = session.edit_scope(1);
    let mut log = ImportLog::new();
    let err = scope
        .create_geometry(TargetKind::SolidOnly, FallbackKind::Mesh, &TopologyKernel, &mut log, 1)
        .unwrap_err();
    assert!(err.is_usage());
    assert!(log.is_empty());
}
