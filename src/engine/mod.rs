mod format;
mod hover;
mod metric;
mod stats;

pub use format::{date_label, group_thousands, human_format, percent, signed_percent, slider_marks};
pub use hover::{HoverData, HoverTemplate};
pub use metric::{MarkerColor, Metric, Normalization};
pub use stats::{BadgedLabel, HeadlineStats, Ratio, StatLabels, UndefinedReason, AGGREGATE_COLUMNS};

use crate::data::{Column, Dataset, Observation};
use chrono::NaiveDate;
use std::sync::Arc;

/// Diameter (reference pixels) of a marker showing the scale maximum
pub const MAX_MARKER_DIAMETER: f64 = 60.0;
/// Opacity of the smallest markers
pub const OPACITY_MAX: f64 = 0.9;
/// Opacity lost between the smallest and the largest marker
pub const OPACITY_SPAN: f64 = 0.7;

/// One UI state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub metric: Metric,
    pub normalization: Normalization,
    /// Days since the dataset's begin date, expected in `0..=total_days`
    pub day_offset: u32,
    /// Hide countries below the population threshold
    pub population_filter: bool,
}

impl Selection {
    pub fn target_column(&self) -> Column {
        self.metric.target_column(self.normalization)
    }
}

/// Area-proportional sizing against a fixed maximum.
///
/// Marker area is `value / sizeref` with `sizeref = 2 * max / 60²`, so the
/// maximum maps to half the area of a 60px square and sizes stay comparable
/// across days.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerScale {
    pub max: f64,
    pub sizeref: f64,
}

impl MarkerScale {
    pub fn new(max: f64) -> Self {
        Self {
            max,
            sizeref: 2.0 * max / (MAX_MARKER_DIAMETER * MAX_MARKER_DIAMETER),
        }
    }

    /// No positive maximum to scale against
    pub fn is_degenerate(&self) -> bool {
        !(self.max.is_finite() && self.max > 0.0)
    }

    /// Value limited to `[0, max]`; NaN counts as 0
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() || self.is_degenerate() {
            0.0
        } else {
            value.clamp(0.0, self.max)
        }
    }

    /// Marker area in square reference pixels
    pub fn area(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.clamp(value) / self.sizeref
    }

    /// Fades from 0.9 for the smallest values to 0.2 at the maximum
    pub fn opacity(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        OPACITY_MAX - OPACITY_SPAN * (self.clamp(value) / self.max).sqrt()
    }
}

/// One plotted country
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    /// Target column value clamped to the scale
    pub value: f64,
    pub area: f64,
    pub opacity: f64,
    pub hover: HoverData,
}

impl Marker {
    /// Diameter of a circle with the marker's area
    pub fn diameter(&self) -> f64 {
        (4.0 * self.area / std::f64::consts::PI).sqrt()
    }
}

/// Everything needed to draw one frame
#[derive(Clone, Debug, PartialEq)]
pub struct RenderParams {
    pub selection: Selection,
    /// None when the offset runs past the last representable date
    pub date: Option<NaiveDate>,
    pub target_column: Column,
    pub scale: MarkerScale,
    pub color: MarkerColor,
    pub hover_template: HoverTemplate,
    pub markers: Vec<Marker>,
    pub stats: HeadlineStats,
    pub labels: StatLabels,
}

impl RenderParams {
    pub fn degenerate_scale(&self) -> bool {
        self.scale.is_degenerate()
    }

    /// Rendered hover lines of a marker
    pub fn hover_lines(&self, marker: &Marker) -> Vec<String> {
        self.hover_template.render(&marker.hover)
    }
}

/// Stateless evaluator over a shared snapshot
#[derive(Clone)]
pub struct Engine {
    dataset: Arc<Dataset>,
}

impl Engine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Compute markers, headline statistics and labels for a selection
    pub fn render(&self, selection: &Selection) -> RenderParams {
        let target_column = selection.target_column();
        let date = self.dataset.date_for_offset(selection.day_offset);

        let slice = date
            .map(|date| self.dataset.slice_for_date(date, selection.population_filter))
            .unwrap_or_default();
        // Scale over large countries only, whatever the filter says
        let scale = MarkerScale::new(self.dataset.global_max(target_column));
        if scale.is_degenerate() {
            tracing::debug!(column = target_column.name(), "degenerate marker scale");
        }

        let markers = slice
            .iter()
            .map(|obs| self.marker(obs, selection.metric, target_column, &scale))
            .collect::<Vec<_>>();

        let stats = match date {
            Some(date) => self.day_over_day(date),
            None => HeadlineStats::missing(None),
        };
        let labels = StatLabels::new(&stats);

        tracing::debug!(
            date = ?date,
            column = target_column.name(),
            markers = markers.len(),
            max = scale.max,
            "rendered selection"
        );

        RenderParams {
            selection: *selection,
            date,
            target_column,
            scale,
            color: selection.metric.color(),
            hover_template: HoverTemplate::for_metric(selection.metric),
            markers,
            stats,
            labels,
        }
    }

    /// Headline statistics of a day against the day before
    fn day_over_day(&self, date: NaiveDate) -> HeadlineStats {
        let previous = date.pred_opt();
        let totals = self
            .dataset
            .aggregate_range(previous.unwrap_or(date), date, &AGGREGATE_COLUMNS);
        HeadlineStats::compare(date, totals.get(&date), previous.and_then(|p| totals.get(&p)))
    }

    fn marker(&self, obs: &Observation, metric: Metric, column: Column, scale: &MarkerScale) -> Marker {
        let raw = obs.value(column);
        Marker {
            lat: obs.lat,
            lon: obs.lon,
            value: scale.clamp(raw),
            area: scale.area(raw),
            opacity: scale.opacity(raw),
            hover: HoverData::new(obs, metric),
        }
    }
}
