pub mod map_renderer;
pub mod overlay;
pub mod pipeline;
pub mod zoom;

pub use map_renderer::{FigureSettings, MapRenderer};
pub use overlay::{Label, MapOverlay, Marker};
pub use pipeline::{render_station_map, RenderOptions, RenderSummary};
pub use zoom::{raw_zoom, zoom_for_extent, zoom_for_span};
