// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Import configuration loaded from defaults or environment variables.

use crate::shape::TargetPolicy;

/// Host vertex tolerance, 0.0005 ft expressed in metres
pub const DEFAULT_VERTEX_TOLERANCE: f64 = 0.0005 * 0.3048;

/// Short curve tolerance as a multiple of the vertex tolerance
pub const SHORT_CURVE_FACTOR: f64 = 2.5;

/// Import configuration.
///
/// Tolerances are in metres; an [`ImportSession`](crate::ImportSession)
/// converts them to model units once and keeps them fixed.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Distance below which two vertices are the same point.
    pub vertex_tolerance: f64,
    /// Minimum length of a plan-view curve segment.
    pub short_curve_tolerance: f64,
    /// Target policy for solids built from faces.
    pub default_target: TargetPolicy,
    /// Whether `FootPrint` representations feed the plan-view collector.
    pub collect_footprints: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            vertex_tolerance: DEFAULT_VERTEX_TOLERANCE,
            short_curve_tolerance: DEFAULT_VERTEX_TOLERANCE * SHORT_CURVE_FACTOR,
            default_target: TargetPolicy::solid_or_mesh(),
            collect_footprints: true,
        }
    }
}

impl ImportConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let vertex_tolerance: f64 = std::env::var("IFC_SHAPE_VERTEX_TOLERANCE")
            .unwrap_or_else(|_| DEFAULT_VERTEX_TOLERANCE.to_string())
            .parse()
            .unwrap_or(DEFAULT_VERTEX_TOLERANCE);

        Self {
            vertex_tolerance,
            short_curve_tolerance: std::env::var("IFC_SHAPE_SHORT_CURVE_TOLERANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(vertex_tolerance * SHORT_CURVE_FACTOR),
            default_target: match std::env::var("IFC_SHAPE_STRICT_SOLIDS").as_deref() {
                Ok("1") | Ok("true") => TargetPolicy::closed_solid(),
                _ => TargetPolicy::solid_or_mesh(),
            },
            collect_footprints: std::env::var("IFC_SHAPE_FOOTPRINTS")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        }
    }

    /// Configuration requiring exact solids everywhere
    pub fn strict() -> Self {
        Self {
            default_target: TargetPolicy::closed_solid(),
            ..Self::default()
        }
    }
}
