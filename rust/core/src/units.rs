// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length unit extraction
//!
//! Import tolerances are given in metres and converted to model units once per
//! session using the project's length-unit prefix.

use crate::decoder::EntityDecoder;
use crate::error::Result;
use crate::schema::IfcType;

/// Multiplier for an IfcSIPrefix enumeration value
#[inline]
pub fn get_si_prefix_multiplier(prefix: &str) -> f64 {
    match prefix {
        "ATTO" => 1e-18,
        "FEMTO" => 1e-15,
        "PICO" => 1e-12,
        "NANO" => 1e-9,
        "MICRO" => 1e-6,
        "MILLI" => 1e-3,
        "CENTI" => 1e-2,
        "DECI" => 1e-1,
        "DECA" => 1e1,
        "HECTO" => 1e2,
        "KILO" => 1e3,
        "MEGA" => 1e6,
        "GIGA" => 1e9,
        "TERA" => 1e12,
        "PETA" => 1e15,
        "EXA" => 1e18,
        _ => 1.0,
    }
}

/// First IFCPROJECT in the file, if any
pub fn find_project(decoder: &EntityDecoder) -> Option<u32> {
    decoder.ids_of_type(&IfcType::IfcProject).first().copied()
}

/// Extract the length unit scale factor (model units -> metres)
///
/// Follows IFCPROJECT (UnitsInContext, attr 8) -> IFCUNITASSIGNMENT ->
/// IFCSIUNIT with UnitType `.LENGTHUNIT.`. Files without a usable length unit
/// are treated as metres.
pub fn extract_length_unit_scale(decoder: &mut EntityDecoder, project_id: u32) -> Result<f64> {
    let project = decoder.decode_by_id(project_id)?;
    if project.ifc_type != IfcType::IfcProject {
        return Ok(1.0);
    }

    let Some(units_id) = project.get(8).and_then(|a| a.as_entity_ref()) else {
        return Ok(1.0);
    };
    let assignment = decoder.decode_by_id(units_id)?;
    if assignment.ifc_type != IfcType::IfcUnitAssignment {
        return Ok(1.0);
    }

    let unit_ids: Vec<u32> = assignment
        .get(0)
        .and_then(|a| a.as_list())
        .map(|list| list.iter().filter_map(|u| u.as_entity_ref()).collect())
        .unwrap_or_default();

    for unit_id in unit_ids {
        // Conversion-based and derived units are skipped
        let Ok(unit) = decoder.decode_by_id(unit_id) else {
            continue;
        };
        if unit.ifc_type != IfcType::IfcSIUnit {
            continue;
        }

        // IFCSIUNIT(Dimensions, UnitType, Prefix, Name)
        if unit.get(1).and_then(|a| a.as_enum()) != Some("LENGTHUNIT") {
            continue;
        }

        return Ok(unit
            .get(2)
            .and_then(|a| a.as_enum())
            .map(get_si_prefix_multiplier)
            .unwrap_or(1.0));
    }

    Ok(1.0)
}
