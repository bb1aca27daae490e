// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face boundary loops.

use std::sync::Arc;

use ifc_shape_core::{DecodedEntity, EntityDecoder, IfcType};
use nalgebra::Point3;

use super::placement::cartesian_point;
use super::session::{FromEntity, ImportSession};
use super::unexpected;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum IfcLoop {
    Poly { id: u32, points: Vec<Point3<f64>> },
    /// IfcEdgeLoop: the start vertex of each edge, in loop order. Curved
    /// edges are replaced by their chords.
    Edge { id: u32, points: Vec<Point3<f64>> },
    /// A single vertex; never a usable boundary
    Vertex { id: u32 },
}

impl IfcLoop {
    pub fn id(&self) -> u32 {
        match self {
            IfcLoop::Poly { id, .. } | IfcLoop::Edge { id, .. } | IfcLoop::Vertex { id } => *id,
        }
    }

    pub fn points(&self) -> Result<&[Point3<f64>]> {
        match self {
            IfcLoop::Poly { points, .. } | IfcLoop::Edge { points, .. } => Ok(points),
            IfcLoop::Vertex { .. } => Err(Error::TooFewVertices(1)),
        }
    }
}

impl FromEntity for IfcLoop {
    fn from_entity(session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        match entity.ifc_type {
            IfcType::IfcPolyLoop => {
                let ids = entity.reader().required_ref_list(0, "Polygon")?;
                let points = ids
                    .into_iter()
                    .map(|p| cartesian_point(&mut session.decoder, p))
                    .collect::<Result<Vec<_>>>()?;
                Ok(IfcLoop::Poly {
                    id: entity.id,
                    points,
                })
            }
            IfcType::IfcEdgeLoop => {
                let edges = entity.reader().required_ref_list(0, "EdgeList")?;
                let points = edges
                    .into_iter()
                    .map(|e| edge_start(&mut session.decoder, e))
                    .collect::<Result<Vec<_>>>()?;
                Ok(IfcLoop::Edge {
                    id: entity.id,
                    points,
                })
            }
            IfcType::IfcVertexLoop => Ok(IfcLoop::Vertex { id: entity.id }),
            ref other => Err(Error::unhandled(entity.id, "loop", other)),
        }
    }
}

/// Where an edge of an edge loop starts, in the loop's direction.
///
/// The start of an IfcOrientedEdge is derived from its edge element and
/// orientation unless it is given explicitly.
fn edge_start(decoder: &mut EntityDecoder, id: u32) -> Result<Point3<f64>> {
    let edge = decoder.decode_by_id(id)?;
    let reader = edge.reader();
    match edge.ifc_type {
        IfcType::IfcOrientedEdge => {
            if let Some(start) = reader.optional_ref(0, "EdgeStart")? {
                return vertex_point(decoder, start);
            }
            let element = decoder.decode_by_id(reader.required_ref(2, "EdgeElement")?)?;
            if !matches!(element.ifc_type, IfcType::IfcEdge | IfcType::IfcEdgeCurve) {
                return Err(Error::unhandled(element.id, "edge", &element.ifc_type));
            }
            let bounds = element.reader();
            let start = if reader.required_bool(3, "Orientation")? {
                bounds.required_ref(0, "EdgeStart")?
            } else {
                bounds.required_ref(1, "EdgeEnd")?
            };
            vertex_point(decoder, start)
        }
        IfcType::IfcEdge | IfcType::IfcEdgeCurve => {
            vertex_point(decoder, reader.required_ref(0, "EdgeStart")?)
        }
        ref other => Err(Error::unhandled(id, "edge", other)),
    }
}

/// IfcVertexPoint geometry
fn vertex_point(decoder: &mut EntityDecoder, id: u32) -> Result<Point3<f64>> {
    let vertex = decoder.decode_by_id(id)?;
    if vertex.ifc_type != IfcType::IfcVertexPoint {
        return Err(unexpected(&vertex, "IfcVertexPoint"));
    }
    cartesian_point(decoder, vertex.reader().required_ref(0, "VertexGeometry")?)
}

/// IfcFaceBound or IfcFaceOuterBound
#[derive(Debug, Clone)]
pub struct IfcFaceBound {
    pub id: u32,
    pub bound: Arc<IfcLoop>,
    /// False when the loop runs against the face's sense
    pub orientation: bool,
    pub outer: bool,
}

impl IfcFaceBound {
    /// Loop points in the face's sense
    pub fn points(&self) -> Result<Vec<Point3<f64>>> {
        let mut points = self.bound.points()?.to_vec();
        if !self.orientation {
            points.reverse();
        }
        Ok(points)
    }
}

impl FromEntity for IfcFaceBound {
    fn from_entity(session: &mut ImportSession<'_>, entity: &DecodedEntity) -> Result<Self> {
        let outer = match entity.ifc_type {
            IfcType::IfcFaceOuterBound => true,
            IfcType::IfcFaceBound => false,
            _ => return Err(unexpected(entity, "IfcFaceBound")),
        };
        let reader = entity.reader();
        let orientation = reader.required_bool(1, "Orientation")?;
        let bound = session.entity::<IfcLoop>(reader.required_ref(0, "Bound")?)?;
        Ok(Self {
            id: entity.id,
            bound,
            orientation,
            outer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Triangle 1-2-3 with the second edge stored backwards
    const EDGE_LOOP: &str = r#"
#1=IFCCARTESIANPOINT((0.,0.,0.));
#2=IFCCARTESIANPOINT((1.,0.,0.));
#3=IFCCARTESIANPOINT((0.,1.,0.));
#4=IFCVERTEXPOINT(#1);
#5=IFCVERTEXPOINT(#2);
#6=IFCVERTEXPOINT(#3);
#7=IFCEDGECURVE(#4,#5,$,.T.);
#8=IFCEDGECURVE(#6,#5,$,.T.);
#9=IFCEDGECURVE(#6,#4,$,.T.);
#10=IFCORIENTEDEDGE(*,*,#7,.T.);
#11=IFCORIENTEDEDGE(*,*,#8,.F.);
#12=IFCORIENTEDEDGE(*,*,#9,.T.);
#13=IFCEDGELOOP((#10,#11,#12));
#14=IFCFACEOUTERBOUND(#13,.F.);
#15=IFCEDGELOOP((#10,#1));
#16=IFCORIENTEDEDGE(*,*,#1,.T.);
#17=IFCEDGELOOP((#16));
"#;

    #[test]
    fn edge_loop_follows_edge_orientation() {
        let mut session = ImportSession::new(EDGE_LOOP);
        let edge_loop = session.entity::<IfcLoop>(13).unwrap();
        let points = edge_loop.points().unwrap();
        assert_eq!(points.len(), 3);
        assert_relative_eq!(points[0], Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(points[1], Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(points[2], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn reversed_bound_reverses_edge_loop() {
        let mut session = ImportSession::new(EDGE_LOOP);
        let bound = session.entity::<IfcFaceBound>(14).unwrap();
        assert!(bound.outer);
        let points = bound.points().unwrap();
        assert_relative_eq!(points[0], Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(points[2], Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn malformed_edges_are_rejected() {
        let mut session = ImportSession::new(EDGE_LOOP);
        assert!(session.entity::<IfcLoop>(15).is_err());
        assert!(matches!(
            session.entity::<IfcLoop>(17),
            Err(Error::UnhandledSubtype { kind: "edge", .. })
        ));
    }
}
