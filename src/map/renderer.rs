//! Choropleth Renderer
//! Rasterises region shapes colored by value with plotters' bitmap backend.
//!
//! The result is an `image::RgbImage` that the GUI uploads as a texture and
//! the exporter writes as PNG.

use super::geojson::RegionShapes;
use super::projection::{project_all, Viewport};
use crate::charts::{ColorTheme, ValueScale, NO_DATA_COLOR};
use image::RgbImage;
use log::{debug, warn};
use plotters::element::Polygon as FillPolygon;
use plotters::prelude::{BitMapBackend, Color, IntoDrawingArea, PathElement, RGBColor, WHITE};
use std::collections::HashMap;
use thiserror::Error;

const OUTLINE: RGBColor = RGBColor(60, 60, 60);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No shapes to draw")]
    Empty,
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Image buffer has the wrong size")]
    Buffer,
}

/// A rendered map plus what is needed to hit-test it.
#[derive(Clone)]
pub struct RenderedMap {
    pub image: RgbImage,
    pub viewport: Viewport,
    pub matched: usize,
    pub unmatched: usize,
}

pub struct ChoroplethRenderer;

impl ChoroplethRenderer {
    /// Draw every region, filled by its value on `scale`, or grey when it has none.
    pub fn render(
        shapes: &RegionShapes,
        values: &HashMap<String, f64>,
        scale: ValueScale,
        theme: ColorTheme,
        (width, height): (u32, u32),
    ) -> Result<RenderedMap, RenderError> {
        let bounds = shapes.bounds().ok_or(RenderError::Empty)?;
        if width == 0 || height == 0 {
            return Err(RenderError::Empty);
        }

        let viewport = Viewport::fit(bounds, width, height);
        let mut projected = project_all(shapes, &viewport);
        // Large regions first so enclaves inside their holes stay visible
        projected.sort_by(|a, b| b.area.total_cmp(&a.area));

        let mut matched = 0;
        let mut unmatched = 0;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(|e| RenderError::Drawing(e.to_string()))?;

            for region in &projected {
                let fill = match values.get(&region.name) {
                    Some(v) => {
                        matched += 1;
                        theme.sample_rgb(scale.normalize(*v))
                    }
                    None => {
                        unmatched += 1;
                        let [r, g, b] = NO_DATA_COLOR;
                        RGBColor(r, g, b)
                    }
                };

                for rings in &region.polygons {
                    let Some((exterior, holes)) = rings.split_first() else {
                        continue;
                    };
                    root.draw(&FillPolygon::new(exterior.clone(), fill.filled()))
                        .map_err(|e| RenderError::Drawing(e.to_string()))?;
                    // Holes go back to background; enclaves are drawn later
                    for hole in holes {
                        root.draw(&FillPolygon::new(hole.clone(), WHITE.filled()))
                            .map_err(|e| RenderError::Drawing(e.to_string()))?;
                    }
                }
            }

            for region in &projected {
                for ring in region.polygons.iter().flatten() {
                    let mut path = ring.clone();
                    if let Some(&first) = ring.first() {
                        path.push(first);
                    }
                    root.draw(&PathElement::new(path, OUTLINE.stroke_width(1)))
                        .map_err(|e| RenderError::Drawing(e.to_string()))?;
                }
            }

            root.present()
                .map_err(|e| RenderError::Drawing(e.to_string()))?;
        }

        if unmatched > 0 {
            warn!("{} regions have no value for this selection", unmatched);
        }
        debug!(
            "Rendered {}x{} map: {} matched, {} unmatched",
            width, height, matched, unmatched
        );

        let image = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)?;
        Ok(RenderedMap {
            image,
            viewport,
            matched,
            unmatched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::geojson::{Polygon, Region};
    use crate::map::hit_test;

    fn two_squares() -> RegionShapes {
        let square = |x: f64| Polygon {
            exterior: vec![[x, 0.0], [x + 10.0, 0.0], [x + 10.0, 10.0], [x, 10.0]],
            holes: vec![],
        };
        RegionShapes {
            regions: vec![
                Region {
                    name: "Links".into(),
                    polygons: vec![square(0.0)],
                },
                Region {
                    name: "Rechts".into(),
                    polygons: vec![square(10.0)],
                },
            ],
            skipped: 0,
        }
    }

    #[test]
    fn fills_regions_by_value_and_greys_unmatched() {
        let shapes = two_squares();
        let values = HashMap::from([("Links".to_string(), 10.0)]);
        let map = ChoroplethRenderer::render(
            &shapes,
            &values,
            ValueScale::new(0.0, 10.0),
            ColorTheme::Viridis,
            (216, 116),
        )
        .unwrap();

        assert_eq!(map.matched, 1);
        assert_eq!(map.unmatched, 1);
        assert_eq!(map.image.dimensions(), (216, 116));

        // Centre of each square, well away from outlines
        let (lx, ly) = map.viewport.to_pixel([5.0, 5.0]);
        let (rx, ry) = map.viewport.to_pixel([15.0, 5.0]);
        assert_eq!(map.image.get_pixel(lx as u32, ly as u32).0, ColorTheme::Viridis.sample(1.0));
        assert_eq!(map.image.get_pixel(rx as u32, ry as u32).0, NO_DATA_COLOR);
        // Margin stays background
        assert_eq!(map.image.get_pixel(1, 1).0, [255, 255, 255]);
    }

    #[test]
    fn holes_stay_background_unless_an_enclave_fills_them() {
        let square = |x: f64, y: f64, size: f64| {
            vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size]]
        };
        let shapes = RegionShapes {
            regions: vec![
                Region {
                    name: "Meer".into(),
                    polygons: vec![Polygon {
                        exterior: square(0.0, 0.0, 30.0),
                        holes: vec![square(5.0, 10.0, 10.0), square(18.0, 10.0, 10.0)],
                    }],
                },
                Region {
                    name: "Eiland".into(),
                    polygons: vec![Polygon {
                        exterior: square(18.0, 10.0, 10.0),
                        holes: vec![],
                    }],
                },
            ],
            skipped: 0,
        };
        let values = HashMap::from([("Meer".to_string(), 10.0), ("Eiland".to_string(), 0.0)]);
        let map = ChoroplethRenderer::render(
            &shapes,
            &values,
            ValueScale::new(0.0, 10.0),
            ColorTheme::Viridis,
            (316, 316),
        )
        .unwrap();

        let pixel = |world| {
            let (x, y) = map.viewport.to_pixel(world);
            map.image.get_pixel(x as u32, y as u32).0
        };
        // Solid part, empty hole, enclave inside the second hole
        assert_eq!(pixel([2.0, 2.0]), ColorTheme::Viridis.sample(1.0));
        assert_eq!(pixel([10.0, 15.0]), [255, 255, 255]);
        assert_eq!(pixel([23.0, 15.0]), ColorTheme::Viridis.sample(0.0));

        // Hover agrees with the picture
        assert_eq!(hit_test(&shapes, [10.0, 15.0]), None);
        assert_eq!(hit_test(&shapes, [23.0, 15.0]), Some("Eiland"));
    }

    #[test]
    fn empty_shapes_are_an_error() {
        let result = ChoroplethRenderer::render(
            &RegionShapes::default(),
            &HashMap::new(),
            ValueScale::new(0.0, 1.0),
            ColorTheme::Blues,
            (100, 100),
        );
        assert!(matches!(result, Err(RenderError::Empty)));
    }
}
