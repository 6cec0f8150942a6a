use crate::data::Observation;
use crate::engine::format::{group_thousands, percent};
use crate::engine::metric::Metric;

/// Per-marker fields interpolated into the hover template
#[derive(Clone, Debug, PartialEq)]
pub struct HoverData {
    pub country: String,
    /// Millions
    pub population: f64,
    /// Absolute value of the selected metric
    pub value: f64,
    /// The metric's rate column
    pub rate: f64,
    pub confirmed_cases: f64,
}

impl HoverData {
    pub fn new(obs: &Observation, metric: Metric) -> Self {
        Self {
            country: obs.country.clone(),
            population: obs.population,
            value: obs.value(metric.column()),
            rate: obs.value(metric.rate_column()),
            confirmed_cases: obs.confirmed_cases,
        }
    }
}

/// Which hover layout a metric uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTemplate {
    /// Cases, population and cases per million
    Cases,
    /// A non-case metric alongside cases and its share of cases
    ShareOfCases(Metric),
}

impl HoverTemplate {
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::ConfirmedCases => HoverTemplate::Cases,
            other => HoverTemplate::ShareOfCases(other),
        }
    }

    /// Template with `{field}` placeholders, for renderers that interpolate
    /// hover text themselves
    pub fn pattern(self) -> String {
        match self {
            HoverTemplate::Cases => {
                "{country}\nCases : {value}\nPopulation : {population} mio\nPer capita : {rate}".to_string()
            }
            HoverTemplate::ShareOfCases(metric) => format!(
                "{{country}}\n{} : {{value}}\nCases : {{confirmed_cases}}\n% of cases : {{rate}}",
                metric.label()
            ),
        }
    }

    /// Hover lines for one marker
    pub fn render(self, data: &HoverData) -> Vec<String> {
        match self {
            HoverTemplate::Cases => vec![
                data.country.clone(),
                format!("Cases : {}", group_thousands(data.value, 0)),
                format!("Population : {} mio", group_thousands(data.population, 1)),
                format!("Per capita : {}", group_thousands(data.rate, 0)),
            ],
            HoverTemplate::ShareOfCases(metric) => vec![
                data.country.clone(),
                format!("{} : {}", metric.label(), group_thousands(data.value, 0)),
                format!("Cases : {}", group_thousands(data.confirmed_cases, 0)),
                format!("% of cases : {}", percent(data.rate)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn italy() -> Observation {
        let date = NaiveDate::from_ymd_opt(2020, 3, 20).unwrap();
        Observation::from_counts("Italy", date, [47_021.0, 4_032.0, 5_129.0, 37_860.0], 60.46, (41.9, 12.6))
    }

    #[test]
    fn test_cases_template() {
        let obs = italy();
        let template = HoverTemplate::for_metric(Metric::ConfirmedCases);
        let lines = template.render(&HoverData::new(&obs, Metric::ConfirmedCases));
        assert_eq!(lines, ["Italy", "Cases : 47,021", "Population : 60.5 mio", "Per capita : 778"]);
    }

    #[test]
    fn test_share_template() {
        let obs = italy();
        let template = HoverTemplate::for_metric(Metric::Deaths);
        assert_eq!(template, HoverTemplate::ShareOfCases(Metric::Deaths));

        let data = HoverData::new(&obs, Metric::Deaths);
        assert_eq!(data.value, 4_032.0);
        let lines = template.render(&data);
        assert_eq!(lines, ["Italy", "Deaths : 4,032", "Cases : 47,021", "% of cases : 8.6%"]);
        assert!(template.pattern().starts_with("{country}\nDeaths : {value}"));
    }
}
