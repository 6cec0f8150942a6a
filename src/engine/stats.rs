use crate::data::{Column, DayTotals};
use crate::engine::format::{date_label, human_format, percent, signed_percent};
use chrono::NaiveDate;

/// Columns summed for the headline statistics
pub const AGGREGATE_COLUMNS: [Column; 5] = [
    Column::ConfirmedCases,
    Column::Deaths,
    Column::Recovered,
    Column::Active,
    Column::Population,
];

/// Why a ratio could not be computed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndefinedReason {
    /// The selected day has no rows
    MissingDay,
    /// The previous day has no rows or a zero total
    NoPreviousValue,
    ZeroPopulation,
    NoCases,
}

/// A derived ratio that is either a finite number or explicitly undefined
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ratio {
    Defined(f64),
    Undefined(UndefinedReason),
}

impl Ratio {
    /// `numerator / denominator` when the denominator is positive
    pub fn of(numerator: f64, denominator: f64, reason: UndefinedReason) -> Self {
        let value = numerator / denominator;
        if denominator > 0.0 && value.is_finite() {
            Ratio::Defined(value)
        } else {
            Ratio::Undefined(reason)
        }
    }

    /// Relative change `current / previous - 1`
    pub fn change(current: f64, previous: f64) -> Self {
        match Self::of(current, previous, UndefinedReason::NoPreviousValue) {
            Ratio::Defined(r) => Ratio::Defined(r - 1.0),
            undefined => undefined,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(v),
            Ratio::Undefined(_) => None,
        }
    }

    /// Render with `fmt`, or "n/a" when undefined
    pub fn display_with(self, fmt: impl Fn(f64) -> String) -> String {
        self.value().map(fmt).unwrap_or_else(|| "n/a".to_string())
    }
}

/// Day-level figures shown next to the map
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlineStats {
    pub date: Option<NaiveDate>,
    pub cases: f64,
    pub deaths: f64,
    pub recovered: f64,
    pub active: f64,
    pub cases_variance: Ratio,
    /// Cases per million inhabitants
    pub cases_per_exposure: Ratio,
    pub death_variance: Ratio,
    /// Deaths as a fraction of cases
    pub death_rate: Ratio,
}

impl HeadlineStats {
    /// A day without rows: zero totals and every ratio undefined
    pub fn missing(date: Option<NaiveDate>) -> Self {
        let undefined = Ratio::Undefined(UndefinedReason::MissingDay);
        Self {
            date,
            cases: 0.0,
            deaths: 0.0,
            recovered: 0.0,
            active: 0.0,
            cases_variance: undefined,
            cases_per_exposure: undefined,
            death_variance: undefined,
            death_rate: undefined,
        }
    }

    /// Compare the totals of the selected day with those of the day before.
    /// Either side may be missing; affected ratios are then undefined.
    pub fn compare(date: NaiveDate, current: Option<&DayTotals>, previous: Option<&DayTotals>) -> Self {
        let Some(current) = current else {
            return Self::missing(Some(date));
        };

        let cases = current.get(Column::ConfirmedCases);
        let deaths = current.get(Column::Deaths);
        let population = current.get(Column::Population);
        let previous_cases = previous.map(|p| p.get(Column::ConfirmedCases)).unwrap_or(0.0);
        let previous_deaths = previous.map(|p| p.get(Column::Deaths)).unwrap_or(0.0);

        Self {
            date: Some(date),
            cases,
            deaths,
            recovered: current.get(Column::Recovered),
            active: current.get(Column::Active),
            cases_variance: Ratio::change(cases, previous_cases),
            cases_per_exposure: Ratio::of(cases, population, UndefinedReason::ZeroPopulation),
            death_variance: Ratio::change(deaths, previous_deaths),
            death_rate: Ratio::of(deaths, cases, UndefinedReason::NoCases),
        }
    }
}

/// A stat line with a day-over-day variance badge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgedLabel {
    pub text: String,
    pub badge: String,
}

impl BadgedLabel {
    pub const BADGE_TOOLTIP: &'static str = "Variance over previous day";
}

/// The five strings of the stat card
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatLabels {
    pub date: String,
    pub cases: BadgedLabel,
    pub per_capita: String,
    pub deaths: BadgedLabel,
    pub death_rate: String,
}

impl StatLabels {
    pub fn new(stats: &HeadlineStats) -> Self {
        Self {
            date: stats.date.map(date_label).unwrap_or_else(|| "n/a".to_string()),
            cases: BadgedLabel {
                text: format!("Cases : {}", human_format(stats.cases)),
                badge: stats.cases_variance.display_with(signed_percent),
            },
            per_capita: format!("per (million) capita: {}", stats.cases_per_exposure.display_with(human_format)),
            deaths: BadgedLabel {
                text: format!("Deaths : {}", human_format(stats.deaths)),
                badge: stats.death_variance.display_with(signed_percent),
            },
            death_rate: format!("as % cases: {}", stats.death_rate.display_with(percent)),
        }
    }
}
