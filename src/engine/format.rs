use chrono::{Datelike, Duration, NaiveDate};

const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Round to a number of significant digits
fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let exponent = digits - 1 - value.abs().log10().floor() as i32;
    // Always divide or multiply by an exact power of ten
    if exponent >= 0 {
        let factor = 10f64.powi(exponent);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-exponent);
        (value / factor).round() * factor
    }
}

/// Strip trailing zeros (and a dangling point) from a fixed-point rendering
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Three significant digits with a K/M/B/T suffix: 1234 -> "1.23K",
/// 2_500_000 -> "2.5M", 0 -> "0".
pub fn human_format(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let mut value = round_significant(value, 3);
    let mut magnitude = 0;
    while value.abs() >= 1000.0 && magnitude < SUFFIXES.len() - 1 {
        value /= 1000.0;
        magnitude += 1;
    }

    let text = format!("{value:.6}");
    let text = match trim_fraction(&text) {
        "-0" => "0",
        t => t,
    };
    format!("{}{}", text, SUFFIXES[magnitude])
}

/// Signed whole percentage: 0.052 -> "+5%"
pub fn signed_percent(ratio: f64) -> String {
    format!("{:+.0}%", ratio * 100.0)
}

/// Percentage with one decimal: 0.0342 -> "3.4%"
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Fixed-point number with comma thousands separators: 1234567.8 -> "1,234,567.8"
pub fn group_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Stat card heading, e.g. "March 5"
pub fn date_label(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

/// Slider tick marks: the first offset and each 1st of a month carry the
/// month abbreviation, the 15th of each month its day number.
pub fn slider_marks(begin_date: NaiveDate, total_days: u32) -> Vec<(u32, String)> {
    (0..=total_days)
        .filter_map(|offset| {
            let date = begin_date + Duration::days(offset as i64);
            if offset == 0 || date.day() == 1 {
                Some((offset, date.format("%b").to_string()))
            } else if date.day() == 15 {
                Some((offset, date.format("%d").to_string()))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_format() {
        assert_eq!(human_format(0.0), "0");
        assert_eq!(human_format(7.0), "7");
        assert_eq!(human_format(999.0), "999");
        assert_eq!(human_format(1234.0), "1.23K");
        assert_eq!(human_format(999_600.0), "1M");
        assert_eq!(human_format(2_500_000.0), "2.5M");
        assert_eq!(human_format(7_800_000_000.0), "7.8B");
        assert_eq!(human_format(-45_600.0), "-45.6K");
        assert_eq!(human_format(0.01234), "0.0123");
        assert_eq!(human_format(f64::NAN), "n/a");
    }

    #[test]
    fn test_percentages() {
        assert_eq!(signed_percent(0.052), "+5%");
        assert_eq!(signed_percent(-0.25), "-25%");
        assert_eq!(signed_percent(0.0), "+0%");
        assert_eq!(percent(0.0342), "3.4%");
        assert_eq!(percent(1.0), "100.0%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0, 0), "0");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(1_234_567.84, 1), "1,234,567.8");
        assert_eq!(group_thousands(-12_345.0, 0), "-12,345");
    }

    #[test]
    fn test_date_label() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 5).unwrap();
        assert_eq!(date_label(date), "March 5");
    }

    #[test]
    fn test_slider_marks() {
        let begin = NaiveDate::from_ymd_opt(2020, 1, 23).unwrap();
        let marks = slider_marks(begin, 40);
        assert_eq!(marks[0], (0, "Jan".to_string()));
        // Feb 1 is offset 9, Feb 15 is offset 23
        assert_eq!(marks[1], (9, "Feb".to_string()));
        assert_eq!(marks[2], (23, "15".to_string()));
        assert_eq!(marks[3], (38, "Mar".to_string()));
        assert_eq!(marks.len(), 4);
    }
}
