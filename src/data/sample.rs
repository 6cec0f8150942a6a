use crate::data::{Dataset, DatasetError, Observation};
use crate::hash::{hash2, unit_noise};
use chrono::{Duration, NaiveDate};

/// (name, lat, lon, population in millions, outbreak onset day)
const COUNTRIES: [(&str, f64, f64, f64, i64); 14] = [
    ("China", 35.9, 104.2, 1439.3, 0),
    ("South Korea", 35.9, 127.8, 51.3, 20),
    ("Iran", 32.4, 53.7, 84.0, 28),
    ("Italy", 41.9, 12.6, 60.5, 30),
    ("Spain", 40.5, -3.7, 46.8, 38),
    ("Germany", 51.2, 10.5, 83.8, 38),
    ("France", 46.2, 2.2, 65.3, 39),
    ("United Kingdom", 55.4, -3.4, 67.9, 42),
    ("United States", 37.1, -95.7, 331.0, 44),
    ("Brazil", -14.2, -51.9, 212.6, 50),
    ("India", 20.6, 79.0, 1380.0, 52),
    ("South Africa", -30.6, 22.9, 59.3, 55),
    ("Australia", -25.3, 133.8, 25.5, 46),
    ("Monaco", 43.7, 7.4, 0.039, 40),
];

const DAYS: i64 = 90;

/// Synthetic outbreak used when no CSV export is available
pub fn demo_dataset() -> Result<Dataset, DatasetError> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap_or_default();
    let mut observations = Vec::with_capacity(COUNTRIES.len() * DAYS as usize);

    for (idx, &(name, lat, lon, population, onset)) in COUNTRIES.iter().enumerate() {
        let idx = idx as u64;
        // Per-country parameters, stable across runs
        let attack = 0.0005 + unit_noise(hash2(idx, 1)) * 0.004;
        let growth = 0.12 + unit_noise(hash2(idx, 2)) * 0.15;
        let fatality = 0.01 + unit_noise(hash2(idx, 3)) * 0.09;
        let ceiling = population * 1e6 * attack;

        let cumulative = |day: i64| -> f64 {
            if day < onset {
                return 0.0;
            }
            let t = (day - onset) as f64;
            (ceiling / (1.0 + (-growth * (t - 30.0)).exp())).floor()
        };

        for day in 0..DAYS {
            let cases = cumulative(day);
            let deaths = (cases * fatality).floor();
            let recovered = (cumulative(day - 14) * (1.0 - fatality)).floor().min(cases - deaths);
            let active = cases - deaths - recovered;

            observations.push(Observation::from_counts(
                name,
                start + Duration::days(day),
                [cases, deaths, recovered, active],
                population,
                (lat, lon),
            ));
        }
    }

    Dataset::new(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    #[test]
    fn test_demo_dataset_shape() {
        let ds = demo_dataset().unwrap();
        assert_eq!(ds.len(), COUNTRIES.len() * DAYS as usize);
        assert_eq!(ds.total_days(), DAYS as u32 - 2);

        let last = ds.slice_for_date(ds.end_date(), false);
        assert_eq!(last.len(), COUNTRIES.len());
        for o in &last {
            assert!(o.active >= 0.0, "{} has negative active count", o.country);
            assert_eq!(o.confirmed_cases, o.deaths + o.recovered + o.active);
        }
        // Monaco sits below the population threshold
        assert_eq!(ds.slice_for_date(ds.end_date(), true).len(), COUNTRIES.len() - 1);
        assert!(ds.global_max(Column::ConfirmedCases) > 0.0);
    }
}
