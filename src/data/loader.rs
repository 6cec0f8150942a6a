use crate::data::{Dataset, DatasetError, Observation, POPULATION_THRESHOLD_MILLIONS};
use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Day-first formats tried in order; ISO dates are accepted as well
const DATE_FORMATS: [&str; 5] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%d/%m/%y"];

/// One row of the exported table
#[derive(Debug, Deserialize)]
struct Record {
    date: String,
    country_area: String,
    #[serde(default)]
    confirmed_cases: Option<f64>,
    #[serde(default)]
    deaths: Option<f64>,
    #[serde(default)]
    recovered: Option<f64>,
    #[serde(default)]
    active: Option<f64>,
    #[serde(default)]
    population: Option<f64>,
    lat: f64,
    long: f64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pop_flag: Option<bool>,
    #[serde(default)]
    confirmed_cases_rate: Option<f64>,
    #[serde(default)]
    deaths_rate: Option<f64>,
    #[serde(default)]
    recovered_rate: Option<f64>,
    #[serde(default)]
    active_rate: Option<f64>,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => match s.to_ascii_lowercase().as_str() {
            "1" | "1.0" | "true" | "yes" => Ok(Some(true)),
            "0" | "0.0" | "false" | "no" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("invalid pop_flag {other:?}"))),
        },
    }
}

/// Parse a date using the day-first convention
fn parse_day_first(value: &str) -> Option<NaiveDate> {
    // Drop a trailing time component ("2020-03-01 00:00:00")
    let value = value.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

impl Record {
    fn into_observation(self, line: u64) -> Result<Observation, DatasetError> {
        let date = parse_day_first(&self.date).ok_or_else(|| DatasetError::BadDate {
            line,
            value: self.date.clone(),
        })?;

        let population = self.population.unwrap_or(0.0);
        let counts = [
            self.confirmed_cases.unwrap_or(0.0),
            self.deaths.unwrap_or(0.0),
            self.recovered.unwrap_or(0.0),
            self.active.unwrap_or(0.0),
        ];

        // Start from derived values and keep whatever the export precomputed
        let mut obs = Observation::from_counts(&self.country_area, date, counts, population, (self.lat, self.long));
        if let Some(rate) = self.confirmed_cases_rate {
            obs.confirmed_cases_rate = rate;
        }
        if let Some(rate) = self.deaths_rate {
            obs.deaths_rate = rate;
        }
        if let Some(rate) = self.recovered_rate {
            obs.recovered_rate = rate;
        }
        if let Some(rate) = self.active_rate {
            obs.active_rate = rate;
        }
        obs.above_population_threshold = self
            .pop_flag
            .unwrap_or(population >= POPULATION_THRESHOLD_MILLIONS);

        Ok(obs)
    }
}

/// Read observation rows from any CSV source
pub fn read_csv<R: Read>(source: R) -> Result<Vec<Observation>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut observations = Vec::new();
    for (idx, result) in reader.deserialize::<Record>().enumerate() {
        let record = result?;
        // +2: one-based, plus the header line
        observations.push(record.into_observation(idx as u64 + 2)?);
    }
    Ok(observations)
}

/// Load and validate the snapshot from a CSV file
pub fn load_csv(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let observations = read_csv(file)?;
    tracing::debug!(rows = observations.len(), "parsed {}", path.display());
    Dataset::new(observations)
}
