mod basemap;
mod error;
mod loader;
mod sample;

pub use basemap::{generate_simple_world, load_coastlines};
pub use error::DatasetError;
pub use loader::{load_csv, read_csv};
pub use sample::demo_dataset;

use chrono::{Days, Duration, NaiveDate};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::ops::Range;

/// Population (in millions) above which a country counts as "large"
pub const POPULATION_THRESHOLD_MILLIONS: f64 = 0.3;

/// A numeric column of the observation table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    ConfirmedCases,
    Deaths,
    Recovered,
    Active,
    ConfirmedCasesRate,
    DeathsRate,
    RecoveredRate,
    ActiveRate,
    Population,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::ConfirmedCases => "confirmed_cases",
            Column::Deaths => "deaths",
            Column::Recovered => "recovered",
            Column::Active => "active",
            Column::ConfirmedCasesRate => "confirmed_cases_rate",
            Column::DeathsRate => "deaths_rate",
            Column::RecoveredRate => "recovered_rate",
            Column::ActiveRate => "active_rate",
            Column::Population => "population",
        }
    }
}

/// One country on one day
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub country: String,
    pub date: NaiveDate,
    pub confirmed_cases: f64,
    pub deaths: f64,
    pub recovered: f64,
    pub active: f64,
    /// Cases per million inhabitants
    pub confirmed_cases_rate: f64,
    /// Deaths as a fraction of confirmed cases (same for the two below)
    pub deaths_rate: f64,
    pub recovered_rate: f64,
    pub active_rate: f64,
    /// Population in millions
    pub population: f64,
    pub lat: f64,
    pub lon: f64,
    pub above_population_threshold: bool,
}

impl Observation {
    /// Build an observation from raw counts, deriving the rate columns and the
    /// population flag the way the upstream export precomputes them.
    pub fn from_counts(
        country: &str,
        date: NaiveDate,
        counts: [f64; 4],
        population: f64,
        (lat, lon): (f64, f64),
    ) -> Self {
        let [confirmed_cases, deaths, recovered, active] = counts;
        let per_case = |v: f64| if confirmed_cases > 0.0 { v / confirmed_cases } else { 0.0 };

        Self {
            country: country.to_string(),
            date,
            confirmed_cases,
            deaths,
            recovered,
            active,
            confirmed_cases_rate: if population > 0.0 { confirmed_cases / population } else { 0.0 },
            deaths_rate: per_case(deaths),
            recovered_rate: per_case(recovered),
            active_rate: per_case(active),
            population,
            lat,
            lon,
            above_population_threshold: population >= POPULATION_THRESHOLD_MILLIONS,
        }
    }

    #[inline(always)]
    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::ConfirmedCases => self.confirmed_cases,
            Column::Deaths => self.deaths,
            Column::Recovered => self.recovered,
            Column::Active => self.active,
            Column::ConfirmedCasesRate => self.confirmed_cases_rate,
            Column::DeathsRate => self.deaths_rate,
            Column::RecoveredRate => self.recovered_rate,
            Column::ActiveRate => self.active_rate,
            Column::Population => self.population,
        }
    }
}

/// Per-date sums of a set of columns
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayTotals {
    sums: Vec<(Column, f64)>,
}

impl DayTotals {
    /// Summed value of a column, 0 if the column was not requested
    pub fn get(&self, column: Column) -> f64 {
        self.sums
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }
}

/// Immutable snapshot of the whole time series.
///
/// Rows are kept sorted by (date, country) with a per-date index range, so a
/// day slice is a contiguous sub-slice.
pub struct Dataset {
    observations: Vec<Observation>,
    by_date: BTreeMap<NaiveDate, Range<usize>>,
    begin_date: NaiveDate,
    end_date: NaiveDate,
}

impl Dataset {
    pub fn new(mut observations: Vec<Observation>) -> Result<Self, DatasetError> {
        observations.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.country.cmp(&b.country)));

        for pair in observations.windows(2) {
            if pair[0].date == pair[1].date && pair[0].country == pair[1].country {
                return Err(DatasetError::Duplicate {
                    country: pair[1].country.clone(),
                    date: pair[1].date,
                });
            }
        }

        let mut by_date = BTreeMap::new();
        let mut start = 0;
        for i in 1..=observations.len() {
            if i == observations.len() || observations[i].date != observations[start].date {
                by_date.insert(observations[start].date, start..i);
                start = i;
            }
        }

        let (first, last) = match (by_date.keys().next(), by_date.keys().next_back()) {
            (Some(&first), Some(&last)) if by_date.len() >= 2 => (first, last),
            _ => return Err(DatasetError::TooFewDates(by_date.len())),
        };

        let span = (last - first).num_days() as usize + 1;
        if span != by_date.len() {
            tracing::warn!(
                missing = span - by_date.len(),
                "date sequence has gaps between {} and {}",
                first,
                last
            );
        }

        tracing::info!(
            rows = observations.len(),
            days = by_date.len(),
            "dataset ready ({} .. {})",
            first,
            last
        );

        Ok(Self {
            observations,
            by_date,
            // The first day has no predecessor to compare against
            begin_date: first + Duration::days(1),
            end_date: last,
        })
    }

    pub fn begin_date(&self) -> NaiveDate {
        self.begin_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Largest valid day offset (the offset of `end_date`)
    pub fn total_days(&self) -> u32 {
        (self.end_date - self.begin_date).num_days() as u32
    }

    /// Date selected by a day offset. Offsets past `total_days` are not
    /// clamped; they resolve to dates without rows, or to None past the
    /// calendar's end.
    pub fn date_for_offset(&self, offset: u32) -> Option<NaiveDate> {
        self.begin_date.checked_add_days(Days::new(offset.into()))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// All observations of one day, optionally restricted to countries above
    /// the population threshold. Empty for dates outside the snapshot.
    pub fn slice_for_date(&self, date: NaiveDate, population_filter: bool) -> Vec<&Observation> {
        let Some(range) = self.by_date.get(&date) else {
            return Vec::new();
        };
        self.observations[range.clone()]
            .iter()
            .filter(|o| !population_filter || o.above_population_threshold)
            .collect()
    }

    /// Maximum of a column over every date, counting only countries above the
    /// population threshold. Non-finite values are ignored; 0 when nothing
    /// qualifies.
    pub fn global_max(&self, column: Column) -> f64 {
        let max = self
            .observations
            .par_iter()
            .filter(|o| o.above_population_threshold)
            .map(|o| o.value(column))
            .filter(|v| v.is_finite())
            .reduce(|| f64::NEG_INFINITY, f64::max);

        if max.is_finite() {
            max
        } else {
            0.0
        }
    }

    /// Sum the given columns per date over the inclusive range. Dates without
    /// rows are absent from the result.
    pub fn aggregate_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        columns: &[Column],
    ) -> BTreeMap<NaiveDate, DayTotals> {
        if start > end {
            return BTreeMap::new();
        }

        self.by_date
            .range(start..=end)
            .map(|(&date, range)| {
                let rows = &self.observations[range.clone()];
                let sums = columns
                    .iter()
                    .map(|&c| (c, rows.iter().map(|o| o.value(c)).filter(|v| v.is_finite()).sum()))
                    .collect();
                (date, DayTotals { sums })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
    }

    fn obs(country: &str, date: NaiveDate, cases: f64, population: f64) -> Observation {
        Observation::from_counts(country, date, [cases, cases * 0.1, 0.0, cases * 0.9], population, (0.0, 0.0))
    }

    fn fixture() -> Dataset {
        Dataset::new(vec![
            obs("Aland", day(1), 10.0, 5.0),
            obs("Borduria", day(1), 4.0, 0.1),
            obs("Aland", day(2), 20.0, 5.0),
            obs("Borduria", day(2), 900.0, 0.1),
            obs("Aland", day(3), 40.0, 5.0),
            obs("Borduria", day(3), 8.0, 0.1),
        ])
        .unwrap()
    }

    #[test]
    fn test_date_bounds() {
        let ds = fixture();
        assert_eq!(ds.begin_date(), day(2));
        assert_eq!(ds.end_date(), day(3));
        assert_eq!(ds.total_days(), 1);
        assert_eq!(ds.date_for_offset(0), Some(day(2)));
        assert_eq!(ds.date_for_offset(ds.total_days()), Some(ds.end_date()));
        assert_eq!(ds.date_for_offset(u32::MAX), None);
        // The predecessor of offset 0 is still loaded
        assert_eq!(ds.slice_for_date(ds.begin_date() - Duration::days(1), false).len(), 2);
    }

    #[test]
    fn test_slice_respects_population_filter() {
        let ds = fixture();
        assert_eq!(ds.slice_for_date(day(2), false).len(), 2);
        let filtered = ds.slice_for_date(day(2), true);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].country, "Aland");
        assert!(ds.slice_for_date(day(9), false).is_empty());
    }

    #[test]
    fn test_global_max_ignores_small_countries_across_dates() {
        let ds = fixture();
        // Borduria's 900 is below the threshold; Aland peaks on the last day
        assert_eq!(ds.global_max(Column::ConfirmedCases), 40.0);
        assert_eq!(ds.global_max(Column::ConfirmedCasesRate), 8.0);
    }

    #[test]
    fn test_global_max_without_flagged_rows_is_zero() {
        let ds = Dataset::new(vec![obs("Tiny", day(1), 3.0, 0.01), obs("Tiny", day(2), 5.0, 0.01)]).unwrap();
        assert_eq!(ds.global_max(Column::ConfirmedCases), 0.0);
    }

    #[test]
    fn test_aggregate_range_sums_per_date() {
        let ds = fixture();
        let totals = ds.aggregate_range(day(1), day(2), &[Column::ConfirmedCases, Column::Population]);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&day(1)].get(Column::ConfirmedCases), 14.0);
        assert_eq!(totals[&day(2)].get(Column::ConfirmedCases), 920.0);
        assert!((totals[&day(2)].get(Column::Population) - 5.1).abs() < 1e-9);
        // Columns that were not requested read as zero
        assert_eq!(totals[&day(2)].get(Column::Deaths), 0.0);
        assert!(ds.aggregate_range(day(3), day(1), &[Column::Deaths]).is_empty());
    }

    #[test]
    fn test_rejects_duplicates_and_single_day() {
        let dup = Dataset::new(vec![obs("Aland", day(1), 1.0, 1.0), obs("Aland", day(1), 2.0, 1.0)]);
        assert!(matches!(dup, Err(DatasetError::Duplicate { .. })));

        let single = Dataset::new(vec![obs("Aland", day(1), 1.0, 1.0)]);
        assert!(matches!(single, Err(DatasetError::TooFewDates(1))));
    }

    #[test]
    fn test_derived_rates() {
        let o = Observation::from_counts("Aland", day(1), [200.0, 10.0, 50.0, 140.0], 2.0, (1.0, 2.0));
        assert_eq!(o.confirmed_cases_rate, 100.0);
        assert_eq!(o.deaths_rate, 0.05);
        assert_eq!(o.recovered_rate, 0.25);
        assert!(o.above_population_threshold);

        let empty = Observation::from_counts("Void", day(1), [0.0; 4], 0.0, (0.0, 0.0));
        assert_eq!(empty.confirmed_cases_rate, 0.0);
        assert_eq!(empty.deaths_rate, 0.0);
        assert!(!empty.above_population_threshold);
    }
}
