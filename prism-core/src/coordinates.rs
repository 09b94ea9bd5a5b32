//! Loading and validating the user's coordinate file.
//!
//! The file is a CSV with at least the columns `id`, `lat` and `lon`. Every
//! row is checked up front so that a bad file fails before any request is sent.

use std::{
    collections::HashSet,
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::{
    error::{ClimateError, Result},
    model::Coordinate,
};

const REQUIRED_COLUMNS: [&str; 3] = ["id", "lat", "lon"];

/// List the CSV files in `dir`, sorted by file name.
pub fn find_coordinate_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ClimateError::validation(format!(
            "Could not read coordinates directory '{}': {e}.\n\
             Hint: create it and save your coordinates CSV inside.",
            dir.display()
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(ClimateError::validation(format!(
            "No CSV file found in '{}'.\n\
             Hint: save a file with the columns id, lat, lon there.",
            dir.display()
        )));
    }

    files.sort();
    Ok(files)
}

pub fn load_coordinates(path: &Path) -> Result<Vec<Coordinate>> {
    let file = File::open(path).map_err(|e| {
        ClimateError::validation(format!("Could not open '{}': {e}", path.display()))
    })?;

    let coordinates = read_coordinates(file)?;
    debug!(path = %path.display(), count = coordinates.len(), "loaded coordinates");
    Ok(coordinates)
}

pub fn read_coordinates<R: Read>(reader: R) -> Result<Vec<Coordinate>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut seen = HashSet::new();
    let mut coordinates = Vec::new();

    for record in rdr.records() {
        let record = record.map_err(ragged_row)?;
        let line = record.position().map_or(0, |p| p.line());
        let coordinate = columns.parse(&record, line)?;

        if !seen.insert(coordinate.id.clone()) {
            return Err(ClimateError::validation(format!(
                "Line {line}: duplicate id '{}'. Every id must be unique.",
                coordinate.id
            )));
        }

        coordinates.push(coordinate);
    }

    if coordinates.is_empty() {
        return Err(ClimateError::validation("The coordinates file contains no rows."));
    }

    Ok(coordinates)
}

/// Rows with a different field count than the header are a user input problem.
fn ragged_row(err: csv::Error) -> ClimateError {
    match err.kind() {
        ErrorKind::UnequalLengths { pos, expected_len, len } => {
            let line = pos.as_ref().map_or(0, |p| p.line());
            ClimateError::validation(format!(
                "Line {line}: expected {expected_len} fields like the header row, found {len}."
            ))
        }
        _ => err.into(),
    }
}

struct ColumnIndex {
    id: usize,
    lat: usize,
    lon: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let missing: Vec<_> =
            REQUIRED_COLUMNS.iter().copied().filter(|name| find(*name).is_none()).collect();

        match (find("id"), find("lat"), find("lon")) {
            (Some(id), Some(lat), Some(lon)) => Ok(Self { id, lat, lon }),
            _ => Err(ClimateError::validation(format!(
                "The coordinates file is missing required column(s): {}. \
                 Expected a header row with id, lat, lon.",
                missing.join(", ")
            ))),
        }
    }

    fn parse(&self, record: &StringRecord, line: u64) -> Result<Coordinate> {
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let id = field(self.id);
        if id.is_empty() {
            return Err(ClimateError::validation(format!("Line {line}: id is empty.")));
        }

        let number = |name: &str, idx: usize| -> Result<f64> {
            let raw = field(idx);
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    ClimateError::validation(format!(
                        "Line {line}: {name} '{raw}' for id '{id}' is not a decimal number."
                    ))
                })
        };

        let lat = number("lat", self.lat)?;
        let lon = number("lon", self.lon)?;

        if lon >= 0.0 {
            return Err(ClimateError::validation(format!(
                "Line {line}: lon {lon} for id '{id}' is not negative. \
                 CONUS longitudes are west of Greenwich; are lat and lon swapped?"
            )));
        }

        if !(-90.0..=90.0).contains(&lat) || lon < -180.0 {
            return Err(ClimateError::validation(format!(
                "Line {line}: ({lat}, {lon}) for id '{id}' is not a valid coordinate."
            )));
        }

        Ok(Coordinate { id: id.to_string(), lat, lon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Result<Vec<Coordinate>> {
        read_coordinates(csv.as_bytes())
    }

    #[test]
    fn loads_well_formed_file() {
        let coords = read(
            "id,lat,lon\n\
             site-a,40.0150,-105.2705\n\
             site-b,35.6870,-105.9378\n\
             42,44.9778,-93.2650\n",
        )
        .unwrap();

        let ids: Vec<_> = coords.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["site-a", "site-b", "42"]);
        assert_eq!(coords[0].lat, 40.0150);
        assert_eq!(coords[0].lon, -105.2705);
    }

    #[test]
    fn positive_longitude_is_rejected() {
        let err = read("id,lat,lon\nsite-a,-105.2705,40.0150\n").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("swapped"));
    }

    #[test]
    fn zero_longitude_is_rejected() {
        let err = read("id,lat,lon\nsite-a,40.0,0\n").unwrap_err();
        assert!(err.to_string().contains("not negative"));
    }

    #[test]
    fn missing_columns_are_named() {
        let err = read("id,latitude,lon\nsite-a,40.0,-105.0\n").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("missing required column(s): lat."));

        let err = read("name,x,y\na,1,2\n").unwrap_err();
        assert!(err.to_string().contains("id, lat, lon."));
    }

    #[test]
    fn column_order_and_whitespace_are_flexible() {
        let coords = read(" lon , id , lat ,elevation\n -105.0 , a , 40.0 ,1600\n").unwrap();
        assert_eq!(coords, vec![Coordinate { id: "a".into(), lat: 40.0, lon: -105.0 }]);
    }

    #[test]
    fn non_numeric_value_is_reported_with_line() {
        let err = read("id,lat,lon\na,40.0,-105.0\nb,north,-105.0\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Line 3"), "{msg}");
        assert!(msg.contains("lat 'north'"), "{msg}");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = read("id,lat,lon\na,40.0,-105.0\na,41.0,-104.0\n").unwrap_err();
        assert!(err.to_string().contains("duplicate id 'a'"));
    }

    #[test]
    fn empty_file_is_rejected() {
        let err = read("id,lat,lon\n").unwrap_err();
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let err = read("id,lat,lon\na,95.0,-105.0\n").unwrap_err();
        assert!(err.to_string().contains("not a valid coordinate"));
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        let err = read("id,lat,lon\na,40.0,-200\n").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("not a valid coordinate"), "{err}");
    }

    #[test]
    fn ragged_rows_are_validation_errors() {
        let err = read("id,lat,lon\na,40.0\n").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Line 2: expected 3 fields"), "{err}");

        let err = read("id,lat,lon\na,40.0,-105.0\nb,40,-105,9\n").unwrap_err();
        assert!(err.is_validation());
        let msg = err.to_string();
        assert!(msg.contains("Line 3: expected 3 fields like the header row, found 4."), "{msg}");
    }

    #[test]
    fn finds_csv_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "id,lat,lon\n").unwrap();
        fs::write(dir.path().join("a.CSV"), "id,lat,lon\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let files = find_coordinate_files(dir.path()).unwrap();
        let names: Vec<_> =
            files.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, ["a.CSV", "b.csv"]);
    }

    #[test]
    fn empty_or_missing_directory_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_coordinate_files(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No CSV file found"));

        let err = find_coordinate_files(&dir.path().join("absent")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn loads_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        fs::write(&path, "id,lat,lon\nx,40.0,-105.0\n").unwrap();

        let coords = load_coordinates(&path).unwrap();
        assert_eq!(coords.len(), 1);
        assert_eq!(coords[0].id, "x");
    }
}
