// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface styles, styled items and styled presentation layers.

use ifc_shape_core::{EntityDecoder, IfcType};
use rustc_hash::FxHashMap;

use super::session::ImportSession;
use super::unexpected;
use crate::error::Result;
use crate::log::ImportLog;
use crate::materials::{Material, MaterialId};

/// Surface styles reachable from each styled item and each layer member
#[derive(Debug, Default)]
pub(crate) struct StyleIndex {
    items: FxHashMap<u32, Vec<u32>>,
    layers: FxHashMap<u32, Vec<u32>>,
}

impl StyleIndex {
    pub(crate) fn build(decoder: &mut EntityDecoder, log: &mut ImportLog) -> Self {
        let mut index = Self::default();

        for id in decoder.ids_of_type(&IfcType::IfcStyledItem) {
            if let Err(e) = index.add_styled_item(decoder, id) {
                log.warn(id, format!("styled item ignored: {e}"));
            }
        }
        for id in decoder.ids_of_type(&IfcType::IfcPresentationLayerWithStyle) {
            if let Err(e) = index.add_layer(decoder, id) {
                log.warn(id, format!("presentation layer ignored: {e}"));
            }
        }
        index
    }

    fn add_styled_item(&mut self, decoder: &mut EntityDecoder, id: u32) -> Result<()> {
        let styled = decoder.decode_by_id(id)?;
        let reader = styled.reader();
        // Styles attached to nothing are allowed and ignored
        let Some(item) = reader.optional_ref(0, "Item")? else {
            return Ok(());
        };
        let styles = surface_styles(decoder, &reader.required_ref_list(1, "Styles")?)?;
        self.items.entry(item).or_default().extend(styles);
        Ok(())
    }

    fn add_layer(&mut self, decoder: &mut EntityDecoder, id: u32) -> Result<()> {
        let layer = decoder.decode_by_id(id)?;
        let reader = layer.reader();
        let styles = surface_styles(decoder, &reader.required_ref_list(7, "LayerStyles")?)?;
        if styles.is_empty() {
            return Ok(());
        }
        for item in reader.required_ref_list(2, "AssignedItems")? {
            self.layers.entry(item).or_default().extend(styles.iter().copied());
        }
        Ok(())
    }

    pub(crate) fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Surface style ids among `styles`, looking through style assignments
fn surface_styles(decoder: &mut EntityDecoder, styles: &[u32]) -> Result<Vec<u32>> {
    let mut found = Vec::new();
    for &id in styles {
        match decoder.type_of(id)? {
            IfcType::IfcSurfaceStyle => found.push(id),
            IfcType::IfcPresentationStyleAssignment => {
                let assignment = decoder.decode_by_id(id)?;
                for style in assignment.reader().required_ref_list(0, "Styles")? {
                    if decoder.type_of(style)? == IfcType::IfcSurfaceStyle {
                        found.push(style);
                    }
                }
            }
            // Curve, fill and text styles do not colour faces
            _ => {}
        }
    }
    Ok(found)
}

/// Reads an IfcSurfaceStyle: name, colour and transparency
fn surface_style_material(decoder: &mut EntityDecoder, style_id: u32) -> Result<Material> {
    let style = decoder.decode_by_id(style_id)?;
    if style.ifc_type != IfcType::IfcSurfaceStyle {
        return Err(unexpected(&style, "IfcSurfaceStyle"));
    }
    let reader = style.reader();
    let mut material = Material::new(style_id);
    material.name = reader.optional_string(0, "Name")?.map(str::to_string);

    for element in reader.required_ref_list(2, "Styles")? {
        let shading = decoder.decode_by_id(element)?;
        if !matches!(
            shading.ifc_type,
            IfcType::IfcSurfaceStyleRendering | IfcType::IfcSurfaceStyleShading
        ) {
            continue;
        }
        let shading_reader = shading.reader();
        let colour = decoder.decode_by_id(shading_reader.required_ref(0, "SurfaceColour")?)?;
        if colour.ifc_type != IfcType::IfcColourRgb {
            return Err(unexpected(&colour, "IfcColourRgb"));
        }
        let rgb = colour.reader();
        material.color = [
            rgb.required_float(1, "Red")?,
            rgb.required_float(2, "Green")?,
            rgb.required_float(3, "Blue")?,
        ];
        material.transparency = shading_reader
            .optional_float(1, "Transparency")?
            .unwrap_or(0.0);
        break;
    }
    Ok(material)
}

impl ImportSession<'_> {
    /// Material of the first surface style applied to `item`
    pub fn item_material(&mut self, item: u32) -> Option<MaterialId> {
        let style = *self.styles.items.get(&item)?.first()?;
        self.style_material(style)
    }

    /// Material of the first styled layer containing `item`
    pub fn layer_material(&mut self, item: u32) -> Option<MaterialId> {
        let style = *self.styles.layers.get(&item)?.first()?;
        self.style_material(style)
    }

    /// Registers the surface style on first use
    fn style_material(&mut self, style: u32) -> Option<MaterialId> {
        if let Some(id) = self.materials.by_style(style) {
            return Some(id);
        }
        match surface_style_material(&mut self.decoder, style) {
            Ok(material) => Some(self.materials.register(material)),
            Err(e) => {
                self.log.warn(style, format!("surface style ignored: {e}"));
                None
            }
        }
    }
}
