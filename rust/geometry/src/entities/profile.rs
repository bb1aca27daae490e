// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Swept-area profiles.

use ifc_shape_core::{DecodedEntity, IfcType};
use nalgebra::Point2;

use super::curve::IfcCurve;
use super::placement::axis2_placement_2d;
use super::session::{FromEntity, ImportSession};
use crate::error::{Error, Result};
use crate::profile::{create_circle, create_rectangle, Profile2D};

/// A profile definition resolved to a placed 2D region
#[derive(Debug, Clone, PartialEq)]
pub struct IfcProfileDef {
    pub id: u32,
    pub name: Option<String>,
    pub profile: Profile2D,
}

impl FromEntity for IfcProfileDef {
    fn from_entity(session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        let reader = entity.reader();
        let id = entity.id;

        let mut profile = match entity.ifc_type {
            IfcType::IfcRectangleProfileDef => {
                let x = reader.required_float(3, "XDim")?;
                let y = reader.required_float(4, "YDim")?;
                if !(x > 0.0 && y > 0.0) {
                    return Err(Error::InvalidProfile(format!("#{id}: rectangle {x} x {y}")));
                }
                create_rectangle(x, y)
            }
            IfcType::IfcCircleProfileDef => {
                let radius = reader.required_float(3, "Radius")?;
                if !(radius > 0.0) {
                    return Err(Error::InvalidProfile(format!("#{id}: radius {radius}")));
                }
                create_circle(radius, None)
            }
            IfcType::IfcArbitraryClosedProfileDef | IfcType::IfcArbitraryProfileDefWithVoids => {
                let outer = ring(session, reader.required_ref(2, "OuterCurve")?)?;
                let mut profile = Profile2D::new(outer);
                if entity.ifc_type == IfcType::IfcArbitraryProfileDefWithVoids {
                    for inner in reader.required_ref_list(3, "InnerCurves")? {
                        profile.add_hole(ring(session, inner)?);
                    }
                }
                profile
            }
            ref other => return Err(Error::unhandled(id, "profile", other)),
        };

        // Parameterized profiles carry a Position; arbitrary ones are placed by their curves
        if matches!(
            entity.ifc_type,
            IfcType::IfcRectangleProfileDef | IfcType::IfcCircleProfileDef
        ) {
            if let Some(position) = reader.optional_ref(2, "Position")? {
                profile.transform(&axis2_placement_2d(&mut session.decoder, position)?);
            }
        }

        Ok(Self {
            id,
            name: reader.optional_string(1, "ProfileName")?.map(str::to_string),
            profile,
        })
    }
}

/// A closed curve as a 2D ring without its closing point
fn ring(session: &mut ImportSession<'_>, curve_id: u32) -> Result<Vec<Point2<f64>>> {
    let curve = session.entity::<IfcCurve>(curve_id)?;
    let points: Vec<Point2<f64>> = curve
        .open_points()
        .iter()
        .map(|p| Point2::new(p.x, p.y))
        .collect();
    if points.len() < 3 {
        return Err(Error::InvalidProfile(format!(
            "#{curve_id}: ring has {} points",
            points.len()
        )));
    }
    Ok(points)
}
