use crate::data::Column;
use std::fmt;
use std::str::FromStr;

/// The four plotted quantities
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    ConfirmedCases,
    Deaths,
    Recovered,
    Active,
}

/// Whether markers show raw counts or the paired rate column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Normalization {
    #[default]
    Absolute,
    /// Per million inhabitants for cases, share of cases for the rest
    Rate,
}

/// Fixed marker color of a metric
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerColor {
    pub name: &'static str,
    pub rgb: (u8, u8, u8),
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::ConfirmedCases, Metric::Deaths, Metric::Recovered, Metric::Active];

    pub fn column(self) -> Column {
        match self {
            Metric::ConfirmedCases => Column::ConfirmedCases,
            Metric::Deaths => Column::Deaths,
            Metric::Recovered => Column::Recovered,
            Metric::Active => Column::Active,
        }
    }

    pub fn rate_column(self) -> Column {
        match self {
            Metric::ConfirmedCases => Column::ConfirmedCasesRate,
            Metric::Deaths => Column::DeathsRate,
            Metric::Recovered => Column::RecoveredRate,
            Metric::Active => Column::ActiveRate,
        }
    }

    /// Column plotted under the given normalization
    pub fn target_column(self, normalization: Normalization) -> Column {
        match normalization {
            Normalization::Absolute => self.column(),
            Normalization::Rate => self.rate_column(),
        }
    }

    /// Label shown in the metric selector
    pub fn label(self) -> &'static str {
        match self {
            Metric::ConfirmedCases => "Confirmed Cases",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
            Metric::Active => "Active Cases",
        }
    }

    /// Label of the normalization toggle, which changes meaning per metric
    pub fn rate_toggle_label(self) -> &'static str {
        match self {
            Metric::ConfirmedCases => "Per (million) Capita",
            _ => "As Rate on Cases",
        }
    }

    pub fn color(self) -> MarkerColor {
        match self {
            Metric::ConfirmedCases => MarkerColor { name: "purple", rgb: (128, 0, 128) },
            Metric::Deaths => MarkerColor { name: "red", rgb: (255, 0, 0) },
            Metric::Recovered => MarkerColor { name: "green", rgb: (0, 128, 0) },
            Metric::Active => MarkerColor { name: "orange", rgb: (255, 165, 0) },
        }
    }

    /// Next metric in selector order (wraps)
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column().name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.column().name() == s)
            .ok_or_else(|| format!("unknown metric {s:?} (expected confirmed_cases, deaths, recovered or active)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_column() {
        assert_eq!(Metric::Deaths.target_column(Normalization::Rate), Column::DeathsRate);
        assert_eq!(Metric::Active.target_column(Normalization::Absolute), Column::Active);
        assert_eq!(Metric::ConfirmedCases.target_column(Normalization::Rate).name(), "confirmed_cases_rate");
    }

    #[test]
    fn test_colors_are_distinct() {
        let colors: Vec<_> = Metric::ALL.iter().map(|m| m.color().name).collect();
        assert_eq!(colors, ["purple", "red", "green", "orange"]);
    }

    #[test]
    fn test_parse_and_cycle() {
        assert_eq!("recovered".parse::<Metric>(), Ok(Metric::Recovered));
        assert!("cases".parse::<Metric>().is_err());
        assert_eq!(Metric::Active.next(), Metric::ConfirmedCases);
        assert_eq!(Metric::ConfirmedCases.to_string(), "confirmed_cases");
    }
}
