use crate::braille::BrailleCanvas;
use crate::engine::{Marker, RenderParams};
use crate::map::geometry::{draw_disc, draw_line};
use crate::map::projection::Viewport;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Map width (in reference pixels) that marker diameters are designed for
const REFERENCE_WIDTH: f64 = 1200.0;

/// Canvases for one frame
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub markers: BrailleCanvas,
}

/// Draws the basemap and the proportional symbols of a render result
pub struct MapRenderer {
    coastlines: Vec<LineString>,
}

impl MapRenderer {
    pub fn new(coastlines: Vec<LineString>) -> Self {
        Self { coastlines }
    }

    /// Marker radius in braille dots at the current zoom
    pub fn marker_radius(marker: &Marker, viewport: &Viewport) -> f64 {
        marker.diameter() / 2.0 * viewport.width as f64 / REFERENCE_WIDTH * viewport.zoom
    }

    /// Render into canvases of `width` x `height` characters
    pub fn render(&self, width: usize, height: usize, viewport: &Viewport, params: &RenderParams) -> MapLayers {
        let mut coastlines = BrailleCanvas::new(width, height);
        for line in &self.coastlines {
            draw_linestring(&mut coastlines, line, viewport);
        }

        let mut markers = BrailleCanvas::new(width, height);
        // Largest first so small markers stay on top
        let mut order: Vec<&Marker> = params.markers.iter().filter(|m| m.opacity > 0.0).collect();
        order.sort_by(|a, b| b.area.total_cmp(&a.area));

        for marker in order {
            let (px, py) = viewport.project(marker.lon, marker.lat);
            let radius = Self::marker_radius(marker, viewport);
            if viewport.is_visible(px, py, radius.ceil() as i32 + 1) {
                draw_disc(&mut markers, (px, py), radius, marker.opacity as f32);
            }
        }

        MapLayers { coastlines, markers }
    }

    /// Index of the marker under (or closest to) a canvas pixel
    pub fn marker_at(params: &RenderParams, viewport: &Viewport, px: i32, py: i32) -> Option<usize> {
        params
            .markers
            .iter()
            .enumerate()
            .filter_map(|(idx, marker)| {
                let (mx, my) = viewport.project(marker.lon, marker.lat);
                let dist = (mx as f64 - px as f64).hypot(my as f64 - py as f64);
                let reach = Self::marker_radius(marker, viewport) + 3.0;
                (dist <= reach).then_some((idx, dist))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
    }
}

/// Draw a linestring, skipping off-screen and antimeridian-wrapping segments
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let p = viewport.project(lon, lat);
        if let Some(q) = prev {
            let dist = ((p.0 - q.0).abs() + (p.1 - q.1).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible(q, p) {
                draw_line(canvas, q, p);
            }
        }
        prev = Some(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, Observation};
    use crate::engine::{Engine, Metric, Normalization, Selection};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn render_params(population_a: f64) -> RenderParams {
        let d1 = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2020, 5, 2).unwrap();
        let ds = Dataset::new(vec![
            Observation::from_counts("West", d1, [10.0, 0.0, 0.0, 10.0], population_a, (0.0, -60.0)),
            Observation::from_counts("West", d2, [1000.0, 0.0, 0.0, 1000.0], population_a, (0.0, -60.0)),
            Observation::from_counts("East", d1, [10.0, 0.0, 0.0, 10.0], 5.0, (0.0, 60.0)),
            Observation::from_counts("East", d2, [20.0, 0.0, 0.0, 20.0], 5.0, (0.0, 60.0)),
        ])
        .unwrap();
        Engine::new(Arc::new(ds)).render(&Selection {
            metric: Metric::ConfirmedCases,
            normalization: Normalization::Absolute,
            day_offset: 0,
            population_filter: false,
        })
    }

    #[test]
    fn test_markers_drawn_with_opacity_shade() {
        let params = render_params(5.0);
        let viewport = Viewport::new(0.0, 0.0, 1.0, 200, 100);
        let renderer = MapRenderer::new(Vec::new());
        let layers = renderer.render(100, 25, &viewport, &params);

        assert_eq!(layers.coastlines.cells().count(), 0);
        let shades: Vec<f32> = layers.markers.cells().map(|c| c.3).collect();
        assert!(!shades.is_empty());
        // The largest marker is the faintest
        let min = shades.iter().cloned().fold(f32::INFINITY, f32::min);
        assert!((min - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_marker_at_picks_nearest() {
        let params = render_params(5.0);
        let viewport = Viewport::new(0.0, 0.0, 1.0, 200, 100);
        let (wx, wy) = viewport.project(-60.0, 0.0);
        let idx = MapRenderer::marker_at(&params, &viewport, wx + 1, wy).unwrap();
        assert_eq!(params.markers[idx].hover.country, "West");
        assert_eq!(MapRenderer::marker_at(&params, &viewport, 100, 0), None);
    }

    #[test]
    fn test_marker_at_far_pixel_at_max_zoom() {
        let params = render_params(5.0);
        let viewport = Viewport::new(0.0, 0.0, 40.0, 4000, 1000);
        assert_eq!(MapRenderer::marker_at(&params, &viewport, 60_000, -60_000), None);
    }

    #[test]
    fn test_basemap_lines_drawn() {
        let params = render_params(5.0);
        let viewport = Viewport::new(0.0, 0.0, 1.0, 200, 100);
        let renderer = MapRenderer::new(vec![vec![(-10.0, 0.0), (10.0, 0.0)]]);
        let layers = renderer.render(100, 25, &viewport, &params);
        assert!(layers.coastlines.cells().count() > 0);
    }
}
