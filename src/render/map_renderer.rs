use crate::error::{MapError, Result};
use crate::models::BoundingExtent;
use crate::render::overlay::{MapOverlay, Marker};
use crate::tiles::Basemap;
use crate::utils::constants::{
    DEFAULT_FIGURE_HEIGHT, DEFAULT_FIGURE_WIDTH, DEFAULT_TITLE, MAP_TICK_COUNT,
};
use crate::utils::coordinates::{format_latitude, format_longitude};
use image::{Rgb, RgbImage};
use plotters::element::BitMapElement;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// Sizes in pixels for a 100 dpi figure (1pt = 100/72 px)
const TITLE_FONT_PX: f64 = 22.0;
const TICK_FONT_PX: f64 = 19.0;
const LABEL_FONT_PX: f64 = 11.0;
const LEGEND_FONT_PX: f64 = 14.0;
const MARKER_RADIUS: i32 = 7;
const LABEL_PADDING: i32 = 3;

const MARKER_COLOR: RGBColor = RGBColor(0xb3, 0x09, 0x09);
const LABEL_EDGE: RGBColor = RGBColor(0x12, 0x12, 0x12);
const LABEL_FILL: RGBColor = RGBColor(0xfa, 0xde, 0xde);
const STATION_LEGEND: &str = "ASOS Station";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for FigureSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIGURE_WIDTH,
            height: DEFAULT_FIGURE_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Draws the basemap, gridlines, station markers and labels into a PNG.
pub struct MapRenderer {
    figure: FigureSettings,
}

impl MapRenderer {
    pub fn new(figure: FigureSettings) -> Self {
        Self { figure }
    }

    pub fn figure(&self) -> &FigureSettings {
        &self.figure
    }

    pub fn render(
        &self,
        basemap: &Basemap,
        extent: &BoundingExtent,
        overlay: &MapOverlay,
        output: &Path,
    ) -> Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let root =
            BitMapBackend::new(output, (self.figure.width, self.figure.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.figure.title, ("sans-serif", TITLE_FONT_PX))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(extent.min_lon..extent.max_lon, extent.min_lat..extent.max_lat)?;

        // Basemap first, everything else is drawn over it
        let (area_width, area_height) = chart.plotting_area().dim_in_pixel();
        let mut raster = basemap.reproject(extent, area_width, area_height)?;
        debug!("Basemap reprojected to {}x{}", area_width, area_height);
        paint_markers(&mut raster, extent, &overlay.markers);
        let tiles: BitMapElement<_> = BitMapElement::with_owned_buffer(
            (extent.min_lon, extent.max_lat),
            (area_width, area_height),
            raster.into_raw(),
        )
        .ok_or_else(|| MapError::Plot("basemap raster does not match the plot area".into()))?;
        chart.draw_series(std::iter::once(tiles))?;

        chart
            .configure_mesh()
            .x_labels(MAP_TICK_COUNT)
            .y_labels(MAP_TICK_COUNT)
            .x_label_formatter(&|lon: &f64| format_longitude(*lon))
            .y_label_formatter(&|lat: &f64| format_latitude(*lat))
            .label_style(("sans-serif", TICK_FONT_PX))
            .bold_line_style(BLACK.mix(0.3))
            .light_line_style(BLACK.mix(0.1))
            .draw()?;

        // Markers are already in the raster; this series only carries the legend entry
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label(STATION_LEGEND)
            .legend(|(x, y)| Circle::new((x, y), MARKER_RADIUS, MARKER_COLOR.filled()));

        let label_style = TextStyle::from(("sans-serif", LABEL_FONT_PX).into_font()).color(&BLACK);
        for label in &overlay.labels {
            let (w, h) = root.estimate_text_size(&label.text, &label_style)?;
            let (w, h) = (w as i32, h as i32);

            // Centred horizontally, box bottom resting on the anchor point
            let corners = [
                (-w / 2 - LABEL_PADDING, -h - 2 * LABEL_PADDING),
                (w / 2 + LABEL_PADDING, 0),
            ];
            chart.draw_series(std::iter::once(
                EmptyElement::at((label.lon, label.lat))
                    + Rectangle::new(corners, LABEL_FILL.filled())
                    + Rectangle::new(corners, LABEL_EDGE.stroke_width(1))
                    + Text::new(
                        label.text.clone(),
                        (-w / 2, -h - LABEL_PADDING),
                        label_style.clone(),
                    ),
            ))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", LEGEND_FONT_PX))
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        info!(
            "Map with {} markers and {} labels written to {}",
            overlay.markers.len(),
            overlay.labels.len(),
            output.display()
        );

        Ok(())
    }
}

/// Paint a filled disc per marker into a raster that spans exactly `extent`.
///
/// Pixels falling outside the raster are dropped, so markers beyond the map
/// edge are clipped and never reach the figure margins.
pub fn paint_markers(raster: &mut RgbImage, extent: &BoundingExtent, markers: &[Marker]) {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let x_scale = width as f64 / extent.lon_span();
    let y_scale = height as f64 / extent.lat_span();
    let radius = MARKER_RADIUS as f64;
    let color = Rgb([MARKER_COLOR.0, MARKER_COLOR.1, MARKER_COLOR.2]);

    for marker in markers {
        let cx = (marker.lon - extent.min_lon) * x_scale;
        let cy = (extent.max_lat - marker.lat) * y_scale;
        if !(cx.is_finite() && cy.is_finite()) {
            continue;
        }

        let x_start = ((cx - radius).floor().max(0.0)) as i64;
        let x_end = ((cx + radius).ceil()).min(width as f64 - 1.0) as i64;
        let y_start = ((cy - radius).floor().max(0.0)) as i64;
        let y_end = ((cy + radius).ceil()).min(height as f64 - 1.0) as i64;

        for py in y_start..=y_end {
            for px in x_start..=x_end {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    raster.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new(FigureSettings::default())
    }
}
