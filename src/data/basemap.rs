use crate::map::LineString;
use anyhow::Result;
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

/// Coastline files in order of preference (coarsest first; a terminal rarely
/// has the resolution for more)
const COASTLINE_FILES: [&str; 3] = ["ne_110m_coastline.json", "natural-earth.json", "ne_50m_coastline.json"];

/// Load the first readable Natural Earth coastline file from `data_dir`.
/// Unreadable files are logged and skipped; returns an empty list if none load.
pub fn load_coastlines(data_dir: &Path) -> Vec<LineString> {
    for filename in COASTLINE_FILES {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        match read_lines(&path) {
            Ok(lines) if !lines.is_empty() => {
                tracing::info!(lines = lines.len(), "loaded coastlines from {}", path.display());
                return lines;
            }
            Ok(_) => tracing::warn!("no line features in {}", path.display()),
            Err(e) => tracing::warn!("failed to load {}: {}", filename, e),
        }
    }
    Vec::new()
}

fn read_lines(path: &Path) -> Result<Vec<LineString>> {
    let mut bytes = fs::read(path)?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes)?;
    let mut lines = Vec::new();
    collect_lines(&geojson, &mut lines);
    Ok(lines)
}

fn collect_lines(geojson: &GeoJson, out: &mut Vec<LineString>) {
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    collect_geometry_lines(geometry, out);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                collect_geometry_lines(geometry, out);
            }
        }
        GeoJson::Geometry(geometry) => collect_geometry_lines(geometry, out),
    }
}

fn collect_geometry_lines(geometry: &Geometry, out: &mut Vec<LineString>) {
    let to_line = |coords: &Vec<Vec<f64>>| -> LineString { coords.iter().map(|c| (c[0], c[1])).collect() };

    match &geometry.value {
        Value::LineString(coords) => out.push(to_line(coords)),
        Value::MultiLineString(lines) => out.extend(lines.iter().map(to_line)),
        Value::Polygon(rings) => out.extend(rings.first().map(to_line)),
        Value::MultiPolygon(polygons) => out.extend(polygons.iter().filter_map(|rings| rings.first().map(to_line))),
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry_lines(g, out);
            }
        }
        _ => {}
    }
}

/// Coarse continent outlines for when no coastline file is available
pub fn generate_simple_world() -> Vec<LineString> {
    vec![
        // North America
        vec![
            (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
            (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 25.0),
            (-97.0, 25.0), (-97.0, 28.0), (-82.0, 24.0), (-80.0, 25.0),
            (-81.0, 31.0), (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0),
            (-65.0, 47.0), (-55.0, 47.0), (-52.0, 47.0), (-55.0, 52.0),
            (-58.0, 55.0), (-64.0, 60.0), (-73.0, 62.0), (-80.0, 63.0),
            (-95.0, 62.0), (-110.0, 68.0), (-130.0, 70.0), (-145.0, 70.0),
            (-168.0, 65.0),
        ],
        // South America
        vec![
            (-80.0, 10.0), (-75.0, 5.0), (-70.0, 5.0), (-60.0, 5.0),
            (-50.0, 0.0), (-35.0, -5.0), (-35.0, -10.0), (-38.0, -15.0),
            (-40.0, -22.0), (-48.0, -25.0), (-55.0, -34.0), (-58.0, -38.0),
            (-65.0, -42.0), (-68.0, -50.0), (-75.0, -52.0), (-75.0, -45.0),
            (-72.0, -40.0), (-72.0, -30.0), (-70.0, -20.0), (-70.0, -15.0),
            (-80.0, -5.0), (-80.0, 0.0), (-80.0, 10.0),
        ],
        // Europe
        vec![
            (-10.0, 36.0), (-5.0, 36.0), (0.0, 38.0), (5.0, 43.0),
            (10.0, 44.0), (15.0, 45.0), (20.0, 40.0), (25.0, 37.0),
            (30.0, 40.0), (35.0, 42.0), (40.0, 43.0), (40.0, 55.0),
            (30.0, 60.0), (25.0, 65.0), (20.0, 70.0), (10.0, 71.0),
            (5.0, 62.0), (5.0, 58.0), (-5.0, 58.0), (-10.0, 52.0),
            (-5.0, 48.0), (-5.0, 43.0), (-10.0, 36.0),
        ],
        // Africa
        vec![
            (-17.0, 15.0), (-17.0, 20.0), (-15.0, 28.0), (-5.0, 35.0),
            (10.0, 37.0), (20.0, 33.0), (25.0, 32.0), (35.0, 30.0),
            (35.0, 20.0), (42.0, 12.0), (50.0, 12.0), (45.0, 5.0),
            (40.0, -5.0), (35.0, -20.0), (35.0, -25.0), (30.0, -30.0),
            (20.0, -35.0), (18.0, -35.0), (15.0, -30.0), (10.0, -15.0),
            (10.0, 0.0), (5.0, 5.0), (-5.0, 5.0), (-10.0, 10.0),
            (-17.0, 15.0),
        ],
        // Asia
        vec![
            (40.0, 43.0), (50.0, 40.0), (55.0, 37.0), (60.0, 25.0),
            (65.0, 25.0), (70.0, 20.0), (75.0, 15.0), (80.0, 8.0),
            (80.0, 15.0), (88.0, 22.0), (92.0, 22.0), (95.0, 16.0),
            (100.0, 14.0), (105.0, 10.0), (110.0, 20.0), (115.0, 22.0),
            (120.0, 22.0), (122.0, 25.0), (125.0, 30.0), (130.0, 35.0),
            (135.0, 35.0), (140.0, 40.0), (145.0, 45.0), (145.0, 50.0),
            (140.0, 55.0), (160.0, 60.0), (180.0, 68.0), (140.0, 73.0),
            (100.0, 77.0), (70.0, 73.0), (60.0, 68.0), (40.0, 55.0),
            (40.0, 43.0),
        ],
        // Australia
        vec![
            (115.0, -20.0), (120.0, -18.0), (130.0, -12.0), (140.0, -12.0),
            (145.0, -15.0), (150.0, -25.0), (153.0, -30.0), (150.0, -35.0),
            (145.0, -38.0), (140.0, -38.0), (135.0, -35.0), (130.0, -32.0),
            (125.0, -32.0), (115.0, -35.0), (115.0, -25.0), (115.0, -20.0),
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_lines_from_polygons_and_lines() {
        let geojson: GeoJson = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry":
                    {"type": "LineString", "coordinates": [[0, 0], [1, 1], [2, 0]]}},
                {"type": "Feature", "properties": {}, "geometry":
                    {"type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1], [0, 0]], [[0.2, 0.2], [0.3, 0.3], [0.2, 0.2]]]}}
            ]
        }"#
        .parse()
        .unwrap();

        let mut lines = Vec::new();
        collect_lines(&geojson, &mut lines);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        // Only the exterior ring of a polygon is kept
        assert_eq!(lines[1].len(), 4);
    }

    #[test]
    fn test_missing_dir_yields_nothing() {
        assert!(load_coastlines(Path::new("/nonexistent")).is_empty());
    }

    #[test]
    fn test_simple_world_rings_are_closed() {
        for ring in generate_simple_world() {
            assert_eq!(ring.first(), ring.last());
        }
    }
}
