// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inline STEP fixtures for import tests.

#![allow(dead_code)]

use std::collections::HashMap;

/// Corner order: bottom ring then top ring, counter-clockwise from min
const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1], // bottom
    [4, 5, 6, 7], // top
    [0, 1, 5, 4], // front
    [3, 7, 6, 2], // back
    [0, 4, 7, 3], // left
    [1, 2, 6, 5], // right
];

/// Outward normal of each face in `CUBE_FACES`
const CUBE_NORMALS: [[f64; 3]; 6] = [
    [0.0, 0.0, -1.0],
    [0.0, 0.0, 1.0],
    [0.0, -1.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
];

#[derive(Debug, Default, Clone)]
pub struct CubeFixture {
    pub min: [f64; 3],
    pub max: [f64; 3],
    /// Faces point into the cube, as for a void
    pub inward: bool,
    /// Face whose loop collapses to two distinct points
    pub broken_face: Option<usize>,
    /// Face carried by an IfcFaceSurface with this surface record
    pub surface: Option<(usize, String)>,
    /// IfcAdvancedFace bounded by edge loops over shared edge curves, each
    /// on its own plane
    pub advanced: bool,
}

impl CubeFixture {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    pub fn unit() -> Self {
        Self::new([0.0; 3], [1.0; 3])
    }
}

pub struct CubeShell {
    pub shell: u32,
    pub faces: Vec<u32>,
}

/// Builds a STEP data section one record at a time
#[derive(Debug, Default)]
pub struct StepWriter {
    lines: Vec<String>,
    next: u32,
}

impl StepWriter {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            next: 1,
        }
    }

    pub fn add(&mut self, record: impl AsRef<str>) -> u32 {
        let id = self.next;
        self.next += 1;
        self.lines.push(format!("#{id}={};", record.as_ref()));
        id
    }

    pub fn point(&mut self, p: [f64; 3]) -> u32 {
        self.add(format!("IFCCARTESIANPOINT(({:?},{:?},{:?}))", p[0], p[1], p[2]))
    }

    pub fn point_2d(&mut self, x: f64, y: f64) -> u32 {
        self.add(format!("IFCCARTESIANPOINT(({x:?},{y:?}))"))
    }

    pub fn direction(&mut self, d: [f64; 3]) -> u32 {
        self.add(format!("IFCDIRECTION(({:?},{:?},{:?}))", d[0], d[1], d[2]))
    }

    pub fn cube_shell(&mut self, cube: &CubeFixture) -> CubeShell {
        let (lo, hi) = (cube.min, cube.max);
        let corners = [
            [lo[0], lo[1], lo[2]],
            [hi[0], lo[1], lo[2]],
            [hi[0], hi[1], lo[2]],
            [lo[0], hi[1], lo[2]],
            [lo[0], lo[1], hi[2]],
            [hi[0], lo[1], hi[2]],
            [hi[0], hi[1], hi[2]],
            [lo[0], hi[1], hi[2]],
        ];
        let ids: Vec<u32> = corners.iter().map(|&c| self.point(c)).collect();
        if cube.advanced {
            return self.advanced_cube_shell(cube, &ids);
        }

        let mut faces = Vec::new();
        for (i, corner_indices) in CUBE_FACES.iter().enumerate() {
            let mut ring: Vec<u32> = corner_indices.iter().map(|&c| ids[c]).collect();
            if cube.inward {
                ring.reverse();
            }
            if cube.broken_face == Some(i) {
                ring = vec![ring[0], ring[1], ring[0]];
            }
            let refs: Vec<String> = ring.iter().map(|id| format!("#{id}")).collect();
            let polyloop = self.add(format!("IFCPOLYLOOP(({}))", refs.join(",")));
            let bound = self.add(format!("IFCFACEOUTERBOUND(#{polyloop},.T.)"));
            let face = match &cube.surface {
                Some((j, surface)) if *j == i => {
                    let surface = self.add(surface);
                    self.add(format!("IFCFACESURFACE((#{bound}),#{surface},.T.)"))
                }
                _ => self.add(format!("IFCFACE((#{bound}))")),
            };
            faces.push(face);
        }

        let refs: Vec<String> = faces.iter().map(|id| format!("#{id}")).collect();
        let shell = self.add(format!("IFCCLOSEDSHELL(({}))", refs.join(",")));
        CubeShell { shell, faces }
    }

    fn advanced_cube_shell(&mut self, cube: &CubeFixture, points: &[u32]) -> CubeShell {
        let vertices: Vec<u32> = points
            .iter()
            .map(|p| self.add(format!("IFCVERTEXPOINT(#{p})")))
            .collect();
        // Each edge curve is stored once, from its lower corner index
        let mut edges: HashMap<(usize, usize), u32> = HashMap::new();

        let mut faces = Vec::new();
        for (i, corner_indices) in CUBE_FACES.iter().enumerate() {
            let mut ring = corner_indices.to_vec();
            let mut normal = CUBE_NORMALS[i];
            if cube.inward {
                ring.reverse();
                normal = normal.map(|n| -n);
            }

            let mut oriented = Vec::new();
            for k in 0..ring.len() {
                let (a, b) = (ring[k], ring[(k + 1) % ring.len()]);
                let key = (a.min(b), a.max(b));
                let edge = match edges.get(&key) {
                    Some(&edge) => edge,
                    None => {
                        let (p, q) = (points[key.0], points[key.1]);
                        let line = self.add(format!("IFCPOLYLINE((#{p},#{q}))"));
                        let (v, w) = (vertices[key.0], vertices[key.1]);
                        let edge = self.add(format!("IFCEDGECURVE(#{v},#{w},#{line},.T.)"));
                        edges.insert(key, edge);
                        edge
                    }
                };
                let sense = if a == key.0 { ".T." } else { ".F." };
                oriented.push(self.add(format!("IFCORIENTEDEDGE(*,*,#{edge},{sense})")));
            }

            let refs: Vec<String> = oriented.iter().map(|id| format!("#{id}")).collect();
            let edge_loop = self.add(format!("IFCEDGELOOP(({}))", refs.join(",")));
            let bound = self.add(format!("IFCFACEOUTERBOUND(#{edge_loop},.T.)"));
            let axis = self.direction(normal);
            let placement = self.add(format!(
                "IFCAXIS2PLACEMENT3D(#{},#{axis},$)",
                points[ring[0]]
            ));
            let plane = self.add(format!("IFCPLANE(#{placement})"));
            faces.push(self.add(format!("IFCADVANCEDFACE((#{bound}),#{plane},.T.)")));
        }

        let refs: Vec<String> = faces.iter().map(|id| format!("#{id}")).collect();
        let shell = self.add(format!("IFCCLOSEDSHELL(({}))", refs.join(",")));
        CubeShell { shell, faces }
    }

    /// A product whose body representation holds `items`
    pub fn product(&mut self, items: &[u32]) -> u32 {
        self.product_with(&[("Body", items)])
    }

    pub fn product_with(&mut self, representations: &[(&str, &[u32])]) -> u32 {
        let context = self.add("IFCGEOMETRICREPRESENTATIONCONTEXT($,'Model',3,1.E-05,$,$)");
        let mut reps = Vec::new();
        for (identifier, items) in representations {
            let refs: Vec<String> = items.iter().map(|id| format!("#{id}")).collect();
            reps.push(self.add(format!(
                "IFCSHAPEREPRESENTATION(#{context},'{identifier}','Brep',({}))",
                refs.join(",")
            )));
        }
        let refs: Vec<String> = reps.iter().map(|id| format!("#{id}")).collect();
        let shape = self.add(format!("IFCPRODUCTDEFINITIONSHAPE($,$,({}))", refs.join(",")));
        self.add(format!("IFCBUILDINGELEMENTPROXY('guid',$,'P',$,$,$,#{shape},$,$)"))
    }

    /// A red surface style applied to `item`
    pub fn style_item(&mut self, item: u32) -> u32 {
        let colour = self.add("IFCCOLOURRGB($,1.,0.,0.)");
        let rendering = self.add(format!(
            "IFCSURFACESTYLERENDERING(#{colour},0.,$,$,$,$,$,$,.NOTDEFINED.)"
        ));
        let style = self.add(format!("IFCSURFACESTYLE('Red',.BOTH.,(#{rendering}))"));
        self.add(format!("IFCSTYLEDITEM(#{item},(#{style}),$)"));
        style
    }

    pub fn finish(&self) -> String {
        self.lines.join("\n")
    }
}
