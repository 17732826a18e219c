//! DWG metadata: layers, entity counts and drawing extents.
//!
//! Drawings are read with the `dxf` crate, so DXF-encoded files (ASCII or
//! binary) are understood; native binary DWG is reported as a parse failure.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::geometry::Rect;

/// One layer from the layer table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DwgLayerInfo {
    pub name: String,
    /// ACI colour index, `None` for BYLAYER/BYBLOCK.
    pub color: Option<u8>,
    /// Frozen/locked state, `None` when the reader does not expose it.
    pub frozen: Option<bool>,
    pub locked: Option<bool>,
    /// Layer is switched on.
    pub on: bool,
    /// Model-space entities that live on this layer.
    pub entity_count: usize,
}

/// Summary of a drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DwgInfo {
    pub path: PathBuf,
    pub layers: Vec<DwgLayerInfo>,
    /// Model-space entity count; paper-space layouts are not counted.
    pub total_entities: usize,
    /// Model-space entity counts keyed by DXF type name (`LINE`, `CIRCLE`, ...).
    pub entity_types: BTreeMap<String, usize>,
    pub extents: Option<Rect>,
    pub library: String,
}

impl DwgInfo {
    pub fn layer(&self, name: &str) -> Option<&DwgLayerInfo> {
        self.layers.iter().find(|l| l.name == name)
    }
}

#[cfg(feature = "dwg")]
pub(crate) use reader::read_dwg;

#[cfg(feature = "dwg")]
mod reader {
    use std::collections::{BTreeMap, HashMap};
    use std::path::Path;

    use dxf::entities::{Entity, EntityType};
    use dxf::Drawing;

    use super::{DwgInfo, DwgLayerInfo};
    use crate::error::LoadError;
    use crate::geometry::{BoundsBuilder, Point, Rect};

    /// Header extents at or beyond this magnitude are unset placeholders.
    const UNSET_EXTENT: f64 = 1e19;

    pub(crate) fn read_dwg(path: &Path) -> Result<DwgInfo, LoadError> {
        let drawing = Drawing::load_file(path).map_err(|e| LoadError::ParseFailed {
            path: path.to_path_buf(),
            message: "Failed to load DWG".to_string(),
            detail: Some(e.to_string()),
        })?;

        let mut per_layer: HashMap<&str, usize> = HashMap::new();
        let mut entity_types: BTreeMap<String, usize> = BTreeMap::new();
        let mut bounds = BoundsBuilder::new();
        let mut total_entities = 0;

        for entity in drawing.entities().filter(|e| !e.common.is_in_paper_space) {
            total_entities += 1;
            *per_layer.entry(entity.common.layer.as_str()).or_default() += 1;
            *entity_types
                .entry(type_name(&entity.specific).to_string())
                .or_default() += 1;
            add_bounds(entity, &mut bounds);
        }

        let layers: Vec<DwgLayerInfo> = drawing
            .layers()
            .map(|layer| DwgLayerInfo {
                name: layer.name.clone(),
                color: layer.color.index(),
                frozen: None,
                locked: None,
                on: layer.is_layer_on,
                entity_count: per_layer.get(layer.name.as_str()).copied().unwrap_or(0),
            })
            .collect();

        let extents = header_extents(&drawing).or_else(|| bounds.build());
        if extents.is_none() {
            tracing::debug!("{}: no usable extents", path.display());
        }

        tracing::info!(
            "Loaded DWG {}: {} layers, {} entities",
            path.display(),
            layers.len(),
            total_entities
        );

        Ok(DwgInfo {
            path: path.to_path_buf(),
            layers,
            total_entities,
            entity_types,
            extents,
            library: "dxf".to_string(),
        })
    }

    /// `$EXTMIN`/`$EXTMAX`, when both are set and span a non-empty area.
    fn header_extents(drawing: &Drawing) -> Option<Rect> {
        let min = &drawing.header.minimum_drawing_extents;
        let max = &drawing.header.maximum_drawing_extents;
        let set = |v: f64| v.is_finite() && v.abs() < UNSET_EXTENT;
        if !(set(min.x) && set(min.y) && set(max.x) && set(max.y)) {
            return None;
        }
        if max.x <= min.x || max.y <= min.y {
            return None;
        }
        Some(Rect::new(Point::new(min.x, min.y), Point::new(max.x, max.y)))
    }

    fn add_bounds(entity: &Entity, bounds: &mut BoundsBuilder) {
        match &entity.specific {
            EntityType::Line(line) => {
                bounds.add(Point::new(line.p1.x, line.p1.y));
                bounds.add(Point::new(line.p2.x, line.p2.y));
            }
            EntityType::Circle(circle) => {
                let (c, r) = (&circle.center, circle.radius.abs());
                bounds.add(Point::new(c.x - r, c.y - r));
                bounds.add(Point::new(c.x + r, c.y + r));
            }
            EntityType::Arc(arc) => {
                // Whole circle; cheap and never too small.
                let (c, r) = (&arc.center, arc.radius.abs());
                bounds.add(Point::new(c.x - r, c.y - r));
                bounds.add(Point::new(c.x + r, c.y + r));
            }
            EntityType::LwPolyline(polyline) => {
                for v in &polyline.vertices {
                    bounds.add(Point::new(v.x, v.y));
                }
            }
            EntityType::Polyline(polyline) => {
                for v in polyline.vertices() {
                    bounds.add(Point::new(v.location.x, v.location.y));
                }
            }
            _ => {}
        }
    }

    fn type_name(specific: &EntityType) -> &'static str {
        match specific {
            EntityType::Line(_) => "LINE",
            EntityType::Circle(_) => "CIRCLE",
            EntityType::Arc(_) => "ARC",
            EntityType::LwPolyline(_) => "LWPOLYLINE",
            EntityType::Polyline(_) => "POLYLINE",
            EntityType::Text(_) => "TEXT",
            EntityType::MText(_) => "MTEXT",
            EntityType::Insert(_) => "INSERT",
            EntityType::Ellipse(_) => "ELLIPSE",
            EntityType::Spline(_) => "SPLINE",
            EntityType::Solid(_) => "SOLID",
            _ => "OTHER",
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use dxf::entities::{Circle, Line};
        use dxf::tables::Layer;
        use pretty_assertions::assert_eq;

        fn write_drawing(dir: &Path) -> std::path::PathBuf {
            let mut drawing = Drawing::new();
            drawing.add_layer(Layer {
                name: "WALLS".to_string(),
                ..Default::default()
            });
            drawing.add_layer(Layer {
                name: "CONDUIT".to_string(),
                is_layer_on: false,
                ..Default::default()
            });

            let mut wall = Entity::new(EntityType::Line(Line::new(
                dxf::Point::new(0.0, 0.0, 0.0),
                dxf::Point::new(400.0, 0.0, 0.0),
            )));
            wall.common.layer = "WALLS".to_string();
            drawing.add_entity(wall);

            let mut wall = Entity::new(EntityType::Line(Line::new(
                dxf::Point::new(400.0, 0.0, 0.0),
                dxf::Point::new(400.0, 300.0, 0.0),
            )));
            wall.common.layer = "WALLS".to_string();
            drawing.add_entity(wall);

            let mut outlet = Entity::new(EntityType::Circle(Circle::new(
                dxf::Point::new(100.0, 100.0, 0.0),
                10.0,
            )));
            outlet.common.layer = "CONDUIT".to_string();
            drawing.add_entity(outlet);

            let path = dir.join("plan.dxf");
            drawing.save_file(&path).unwrap();
            path
        }

        #[test]
        fn test_read_counts_layers_and_types() {
            let dir = tempfile::tempdir().unwrap();
            let info = read_dwg(&write_drawing(dir.path())).unwrap();

            assert_eq!(info.total_entities, 3);
            assert_eq!(info.entity_types.get("LINE"), Some(&2));
            assert_eq!(info.entity_types.get("CIRCLE"), Some(&1));
            assert_eq!(info.layer("WALLS").unwrap().entity_count, 2);
            assert_eq!(info.library, "dxf");

            let conduit = info.layer("CONDUIT").unwrap();
            assert_eq!(conduit.entity_count, 1);
            assert!(!conduit.on);
            assert_eq!(conduit.frozen, None);
            assert_eq!(conduit.locked, None);
            assert!(info.layer("WALLS").unwrap().on);
        }

        #[test]
        fn test_paper_space_is_not_counted() {
            let dir = tempfile::tempdir().unwrap();
            let mut drawing = Drawing::new();
            drawing.add_entity(Entity::new(EntityType::Line(Line::new(
                dxf::Point::new(0.0, 0.0, 0.0),
                dxf::Point::new(10.0, 0.0, 0.0),
            ))));
            let mut title_block = Entity::new(EntityType::Line(Line::new(
                dxf::Point::new(0.0, 0.0, 0.0),
                dxf::Point::new(5000.0, 5000.0, 0.0),
            )));
            title_block.common.is_in_paper_space = true;
            drawing.add_entity(title_block);
            let path = dir.path().join("layout.dxf");
            drawing.save_file(&path).unwrap();

            let info = read_dwg(&path).unwrap();
            assert_eq!(info.total_entities, 1);
            assert_eq!(info.entity_types.get("LINE"), Some(&1));
            assert_eq!(
                info.extents,
                Some(Rect::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)))
            );
        }

        #[test]
        fn test_extents_cover_entities() {
            let dir = tempfile::tempdir().unwrap();
            let info = read_dwg(&write_drawing(dir.path())).unwrap();
            let extents = info.extents.unwrap();
            assert!(extents.contains(Point::new(0.0, 0.0)));
            assert!(extents.contains(Point::new(400.0, 300.0)));
        }

        #[test]
        fn test_garbage_is_parse_failure() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("broken.dwg");
            std::fs::write(&path, b"AC1032\x00\x01\x02 not a dxf").unwrap();
            let err = read_dwg(&path).unwrap_err();
            assert!(matches!(err, LoadError::ParseFailed { detail: Some(_), .. }));
            assert_eq!(err.message(), "Failed to load DWG");
        }
    }
}
