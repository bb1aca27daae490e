// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema Types
//!
//! Closed set of the IFC entity types the shape importer dispatches on.
//! Anything else decodes as [`IfcType::Unknown`] and keeps its name for
//! diagnostics.

use std::fmt;

macro_rules! ifc_types {
    ($( $variant:ident => $name:literal ),* $(,)?) => {
        /// IFC Entity Types
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum IfcType {
            $( $variant, )*
            /// Any type outside the handled set (upper-case STEP name)
            Unknown(Box<str>),
        }

        impl IfcType {
            /// Parse IFC type from its upper-case STEP keyword
            pub fn from_str(s: &str) -> Self {
                match s {
                    $( $name => Self::$variant, )*
                    other => Self::Unknown(other.into()),
                }
            }

            /// Upper-case STEP keyword
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $name, )*
                    Self::Unknown(name) => name,
                }
            }
        }
    };
}

ifc_types! {
    // Project and units
    IfcProject => "IFCPROJECT",
    IfcUnitAssignment => "IFCUNITASSIGNMENT",
    IfcSIUnit => "IFCSIUNIT",

    // Placement
    IfcCartesianPoint => "IFCCARTESIANPOINT",
    IfcDirection => "IFCDIRECTION",
    IfcAxis2Placement2D => "IFCAXIS2PLACEMENT2D",
    IfcAxis2Placement3D => "IFCAXIS2PLACEMENT3D",
    IfcAxis1Placement => "IFCAXIS1PLACEMENT",

    // Topology
    IfcPolyLoop => "IFCPOLYLOOP",
    IfcVertexLoop => "IFCVERTEXLOOP",
    IfcEdgeLoop => "IFCEDGELOOP",
    IfcOrientedEdge => "IFCORIENTEDEDGE",
    IfcEdge => "IFCEDGE",
    IfcEdgeCurve => "IFCEDGECURVE",
    IfcVertexPoint => "IFCVERTEXPOINT",
    IfcFaceBound => "IFCFACEBOUND",
    IfcFaceOuterBound => "IFCFACEOUTERBOUND",
    IfcFace => "IFCFACE",
    IfcFaceSurface => "IFCFACESURFACE",
    IfcAdvancedFace => "IFCADVANCEDFACE",
    IfcClosedShell => "IFCCLOSEDSHELL",
    IfcOpenShell => "IFCOPENSHELL",

    // Surfaces
    IfcPlane => "IFCPLANE",
    IfcCylindricalSurface => "IFCCYLINDRICALSURFACE",
    IfcSurfaceOfLinearExtrusion => "IFCSURFACEOFLINEAREXTRUSION",
    IfcSurfaceOfRevolution => "IFCSURFACEOFREVOLUTION",

    // Solids and surface models
    IfcFacetedBrep => "IFCFACETEDBREP",
    IfcFacetedBrepWithVoids => "IFCFACETEDBREPWITHVOIDS",
    IfcAdvancedBrep => "IFCADVANCEDBREP",
    IfcAdvancedBrepWithVoids => "IFCADVANCEDBREPWITHVOIDS",
    IfcShellBasedSurfaceModel => "IFCSHELLBASEDSURFACEMODEL",
    IfcFaceBasedSurfaceModel => "IFCFACEBASEDSURFACEMODEL",
    IfcExtrudedAreaSolid => "IFCEXTRUDEDAREASOLID",

    // Profiles
    IfcRectangleProfileDef => "IFCRECTANGLEPROFILEDEF",
    IfcCircleProfileDef => "IFCCIRCLEPROFILEDEF",
    IfcArbitraryClosedProfileDef => "IFCARBITRARYCLOSEDPROFILEDEF",
    IfcArbitraryProfileDefWithVoids => "IFCARBITRARYPROFILEDEFWITHVOIDS",
    IfcArbitraryOpenProfileDef => "IFCARBITRARYOPENPROFILEDEF",

    // Curves
    IfcPolyline => "IFCPOLYLINE",
    IfcIndexedPolyCurve => "IFCINDEXEDPOLYCURVE",
    IfcCartesianPointList2D => "IFCCARTESIANPOINTLIST2D",
    IfcCartesianPointList3D => "IFCCARTESIANPOINTLIST3D",
    IfcCompositeCurve => "IFCCOMPOSITECURVE",
    IfcCompositeCurveSegment => "IFCCOMPOSITECURVESEGMENT",

    // Representation
    IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",
    IfcProductDefinitionShape => "IFCPRODUCTDEFINITIONSHAPE",

    // Presentation
    IfcStyledItem => "IFCSTYLEDITEM",
    IfcPresentationStyleAssignment => "IFCPRESENTATIONSTYLEASSIGNMENT",
    IfcSurfaceStyle => "IFCSURFACESTYLE",
    IfcSurfaceStyleRendering => "IFCSURFACESTYLERENDERING",
    IfcSurfaceStyleShading => "IFCSURFACESTYLESHADING",
    IfcColourRgb => "IFCCOLOURRGB",
    IfcPresentationLayerAssignment => "IFCPRESENTATIONLAYERASSIGNMENT",
    IfcPresentationLayerWithStyle => "IFCPRESENTATIONLAYERWITHSTYLE",
}

impl IfcType {
    /// Shell entities usable as BRep boundaries
    pub fn is_shell(&self) -> bool {
        matches!(self, Self::IfcClosedShell | Self::IfcOpenShell)
    }

    /// Face entities (plain, surface-bound and advanced)
    pub fn is_face(&self) -> bool {
        matches!(
            self,
            Self::IfcFace | Self::IfcFaceSurface | Self::IfcAdvancedFace
        )
    }

    /// Manifold solid BRep subtypes
    pub fn is_manifold_solid_brep(&self) -> bool {
        matches!(
            self,
            Self::IfcFacetedBrep
                | Self::IfcFacetedBrepWithVoids
                | Self::IfcAdvancedBrep
                | Self::IfcAdvancedBrepWithVoids
        )
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
