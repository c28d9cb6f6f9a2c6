//! Map module - GeoJSON shapes, projection and choropleth rasterisation

mod geojson;
mod projection;
mod renderer;

pub use geojson::{GeoJsonError, RegionShapes};
pub use projection::hit_test;
pub use renderer::{ChoroplethRenderer, RenderedMap};
