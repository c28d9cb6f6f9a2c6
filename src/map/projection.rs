//! Map Projection Module
//! Fits shapes into a pixel box and hit-tests world points against polygons.

use super::geojson::{Bounds, Polygon, Position, RegionShapes};
use rayon::prelude::*;

/// Fits world coordinates into a `width × height` pixel box, y axis flipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    bounds: Bounds,
    /// Horizontal shrink for lon/lat input
    x_factor: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const MARGIN: f64 = 8.0;

    pub fn fit(bounds: Bounds, width: u32, height: u32) -> Self {
        let x_factor = if bounds.looks_geographic() {
            let mid_lat = (bounds.min_y + bounds.max_y) / 2.0;
            mid_lat.to_radians().cos()
        } else {
            1.0
        };

        let world_w = bounds.width() * x_factor;
        let world_h = bounds.height();
        let avail_w = (width as f64 - 2.0 * Self::MARGIN).max(1.0);
        let avail_h = (height as f64 - 2.0 * Self::MARGIN).max(1.0);

        let scale = match (world_w > 0.0, world_h > 0.0) {
            (true, true) => (avail_w / world_w).min(avail_h / world_h),
            (true, false) => avail_w / world_w,
            (false, true) => avail_h / world_h,
            (false, false) => 1.0,
        };

        Self {
            bounds,
            x_factor,
            scale,
            offset_x: (width as f64 - world_w * scale) / 2.0,
            offset_y: (height as f64 - world_h * scale) / 2.0,
            width,
            height,
        }
    }

    pub fn to_pixel(&self, [x, y]: Position) -> (f64, f64) {
        (
            self.offset_x + (x - self.bounds.min_x) * self.x_factor * self.scale,
            self.offset_y + (self.bounds.max_y - y) * self.scale,
        )
    }

    pub fn to_world(&self, (px, py): (f64, f64)) -> Position {
        [
            self.bounds.min_x + (px - self.offset_x) / (self.scale * self.x_factor),
            self.bounds.max_y - (py - self.offset_y) / self.scale,
        ]
    }
}

/// A region's rings in pixel coordinates.
#[derive(Debug, Clone)]
pub struct ProjectedRegion {
    pub name: String,
    /// Per polygon: exterior ring first, then holes
    pub polygons: Vec<Vec<Vec<(i32, i32)>>>,
    /// Largest exterior area in world units, used for draw order
    pub area: f64,
}

/// Project every region into the viewport.
pub fn project_all(shapes: &RegionShapes, viewport: &Viewport) -> Vec<ProjectedRegion> {
    shapes
        .regions
        .par_iter()
        .map(|region| ProjectedRegion {
            name: region.name.clone(),
            polygons: region
                .polygons
                .iter()
                .map(|polygon| {
                    polygon
                        .rings()
                        .map(|ring| {
                            ring.iter()
                                .map(|&p| {
                                    let (x, y) = viewport.to_pixel(p);
                                    (x.round() as i32, y.round() as i32)
                                })
                                .collect()
                        })
                        .collect()
                })
                .collect(),
            area: region
                .polygons
                .iter()
                .map(Polygon::area)
                .fold(0.0, f64::max),
        })
        .collect()
}

fn ring_crossings(ring: &[Position], [px, py]: Position) -> bool {
    let mut inside = false;
    let n = ring.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Even-odd containment over the exterior ring and holes.
pub fn contains(polygon: &Polygon, point: Position) -> bool {
    polygon
        .rings()
        .filter(|ring| ring_crossings(ring, point))
        .count()
        % 2
        == 1
}

/// Name of the region under a world point.
pub fn hit_test(shapes: &RegionShapes, point: Position) -> Option<&str> {
    shapes
        .regions
        .iter()
        .find(|region| region.polygons.iter().any(|p| contains(p, point)))
        .map(|region| region.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::geojson::Region;

    fn square(x: f64, y: f64, size: f64) -> Vec<Position> {
        vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]]
    }

    fn shapes() -> RegionShapes {
        RegionShapes {
            regions: vec![
                Region {
                    name: "Ring".into(),
                    polygons: vec![Polygon {
                        exterior: square(0.0, 0.0, 10.0),
                        holes: vec![square(4.0, 4.0, 2.0)],
                    }],
                },
                Region {
                    name: "Enclave".into(),
                    polygons: vec![Polygon {
                        exterior: square(4.0, 4.0, 2.0),
                        holes: vec![],
                    }],
                },
            ],
            skipped: 0,
        }
    }

    #[test]
    fn fit_preserves_aspect_and_centres() {
        // Planar 200 × 100 box into 416 × 416 px (400 usable)
        let bounds = Bounds {
            min_x: 100_000.0,
            min_y: 400_000.0,
            max_x: 100_200.0,
            max_y: 400_100.0,
        };
        let vp = Viewport::fit(bounds, 416, 416);
        assert_eq!(vp.to_pixel([100_000.0, 400_100.0]), (8.0, 108.0));
        assert_eq!(vp.to_pixel([100_200.0, 400_000.0]), (408.0, 308.0));
    }

    #[test]
    fn pixel_and_world_are_inverse() {
        let bounds = Bounds {
            min_x: 3.3,
            min_y: 50.7,
            max_x: 7.2,
            max_y: 53.6,
        };
        let vp = Viewport::fit(bounds, 640, 480);
        let world = [5.1, 52.0];
        let back = vp.to_world(vp.to_pixel(world));
        assert!((back[0] - world[0]).abs() < 1e-9);
        assert!((back[1] - world[1]).abs() < 1e-9);
    }

    #[test]
    fn geographic_input_is_narrowed() {
        let bounds = Bounds {
            min_x: 0.0,
            min_y: 59.0,
            max_x: 2.0,
            max_y: 61.0,
        };
        // cos(60°) = 0.5, so the 2° wide box is drawn half as wide as it is tall
        let vp = Viewport::fit(bounds, 216, 216);
        let (left, _) = vp.to_pixel([0.0, 60.0]);
        let (right, _) = vp.to_pixel([2.0, 60.0]);
        assert!(((right - left) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn holes_are_excluded_from_containment() {
        let shapes = shapes();
        let ring = &shapes.regions[0].polygons[0];
        assert!(contains(ring, [1.0, 1.0]));
        assert!(!contains(ring, [5.0, 5.0]));
        assert!(!contains(ring, [11.0, 5.0]));
    }

    #[test]
    fn hit_test_finds_enclave_inside_hole() {
        let shapes = shapes();
        assert_eq!(hit_test(&shapes, [5.0, 5.0]), Some("Enclave"));
        assert_eq!(hit_test(&shapes, [2.0, 8.0]), Some("Ring"));
        assert_eq!(hit_test(&shapes, [-1.0, 0.5]), None);
    }

    #[test]
    fn projection_keeps_ring_structure() {
        let shapes = shapes();
        let vp = Viewport::fit(shapes.bounds().unwrap(), 100, 100);
        let projected = project_all(&shapes, &vp);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].polygons[0].len(), 2);
        assert_eq!(projected[0].area, 100.0);
        assert_eq!(projected[1].area, 4.0);
    }
}
