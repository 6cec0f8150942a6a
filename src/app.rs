use crate::engine::{slider_marks, Engine, Marker, Normalization, RenderParams, Selection};
use crate::map::{MapRenderer, Viewport};

/// Width of the stat panel, in terminal cells
pub const PANEL_WIDTH: u16 = 38;
/// Rows below the map: slider (2) and status bar (1)
pub const FOOTER_HEIGHT: u16 = 3;

/// Map area inside its border for a terminal of the given size, in cells
pub fn map_inner_size(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(PANEL_WIDTH as usize + 2);
    let inner_height = height.saturating_sub(FOOTER_HEIGHT as usize + 2);
    (inner_width, inner_height)
}

/// Application state
pub struct App {
    pub engine: Engine,
    pub selection: Selection,
    /// Output for the current selection, recomputed on every change
    pub params: RenderParams,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub slider_marks: Vec<(u32, String)>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for hover lookups
    pub mouse_pos: Option<(u16, u16)>,
    map_cells: (usize, usize),
}

impl App {
    pub fn new(engine: Engine, selection: Selection, map_renderer: MapRenderer, width: usize, height: usize) -> Self {
        let dataset = engine.dataset();
        let slider_marks = slider_marks(dataset.begin_date(), dataset.total_days());
        let params = engine.render(&selection);
        let map_cells = map_inner_size(width, height);

        Self {
            viewport: Viewport::overview(map_cells.0 * 2, map_cells.1 * 4),
            engine,
            selection,
            params,
            map_renderer,
            slider_marks,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            map_cells,
        }
    }

    pub fn total_days(&self) -> u32 {
        self.engine.dataset().total_days()
    }

    /// Re-run the engine for the current selection
    fn refresh(&mut self) {
        self.params = self.engine.render(&self.selection);
    }

    pub fn cycle_metric(&mut self) {
        self.selection.metric = self.selection.metric.next();
        self.refresh();
    }

    pub fn toggle_rate(&mut self) {
        self.selection.normalization = match self.selection.normalization {
            Normalization::Absolute => Normalization::Rate,
            Normalization::Rate => Normalization::Absolute,
        };
        self.refresh();
    }

    pub fn toggle_population_filter(&mut self) {
        self.selection.population_filter = !self.selection.population_filter;
        self.refresh();
    }

    /// Move the day slider; stays within `0..=total_days`
    pub fn step_day(&mut self, delta: i64) {
        let day = (self.selection.day_offset as i64 + delta).clamp(0, self.total_days() as i64) as u32;
        if day != self.selection.day_offset {
            self.selection.day_offset = day;
            self.refresh();
        }
    }

    pub fn first_day(&mut self) {
        self.step_day(-(self.selection.day_offset as i64));
    }

    pub fn last_day(&mut self) {
        self.step_day(self.total_days() as i64 - self.selection.day_offset as i64);
    }

    /// Update viewport size when the terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        self.map_cells = map_inner_size(width, height);
        self.viewport.width = self.map_cells.0 * 2;
        self.viewport.height = self.map_cells.1 * 4;
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom towards a terminal cell
    pub fn zoom_at(&mut self, col: u16, row: u16, zoom_in: bool) {
        if let Some((px, py)) = self.cell_to_pixel(col, row) {
            self.viewport.zoom_at(px, py, zoom_in);
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Pan by the drag distance since the last mouse event
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            let scale = if self.viewport.zoom < 2.0 { 2 } else { 4 };
            self.pan(dx * scale, dy * scale);
        }
        self.last_mouse = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Terminal cell to braille pixel inside the map border; None outside the map
    fn cell_to_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let (cx, cy) = (col.checked_sub(1)? as usize, row.checked_sub(1)? as usize);
        if cx >= self.map_cells.0 || cy >= self.map_cells.1 {
            return None;
        }
        Some((cx as i32 * 2 + 1, cy as i32 * 4 + 2))
    }

    /// Marker under the mouse cursor
    pub fn hovered_marker(&self) -> Option<&Marker> {
        let (col, row) = self.mouse_pos?;
        let (px, py) = self.cell_to_pixel(col, row)?;
        let idx = MapRenderer::marker_at(&self.params, &self.viewport, px, py)?;
        self.params.markers.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::demo_dataset;
    use crate::engine::Metric;
    use std::sync::Arc;

    fn app() -> App {
        let engine = Engine::new(Arc::new(demo_dataset().unwrap()));
        let total = engine.dataset().total_days();
        let selection = Selection {
            metric: Metric::ConfirmedCases,
            normalization: Normalization::Absolute,
            day_offset: total,
            population_filter: false,
        };
        App::new(engine, selection, MapRenderer::new(Vec::new()), 160, 48)
    }

    #[test]
    fn test_day_slider_stays_in_range() {
        let mut app = app();
        let total = app.total_days();
        app.step_day(5);
        assert_eq!(app.selection.day_offset, total);
        app.first_day();
        assert_eq!(app.selection.day_offset, 0);
        app.step_day(-1);
        assert_eq!(app.selection.day_offset, 0);
        assert_eq!(app.params.date, Some(app.engine.dataset().begin_date()));
        app.last_day();
        assert_eq!(app.params.date, Some(app.engine.dataset().end_date()));
    }

    #[test]
    fn test_toggles_recompute() {
        let mut app = app();
        let markers = app.params.markers.len();

        app.toggle_population_filter();
        assert!(app.params.markers.len() < markers);

        app.cycle_metric();
        app.toggle_rate();
        assert_eq!(app.params.target_column.name(), "deaths_rate");
    }

    #[test]
    fn test_mouse_outside_map_hovers_nothing() {
        let mut app = app();
        app.set_mouse_pos(0, 0);
        assert!(app.hovered_marker().is_none());
        app.set_mouse_pos(159, 10);
        assert!(app.hovered_marker().is_none());
    }
}
