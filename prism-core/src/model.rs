use chrono::NaiveDate;
use serde::Serialize;

/// A point of interest from the user's coordinate file.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// ACIS expects `lon,lat`.
    pub fn acis_loc(&self) -> String {
        format!("{},{}", self.lon, self.lat)
    }
}

/// One row of output: the gridded values for a coordinate on a single day.
///
/// `None` means the service reported the value as missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyObservation {
    pub id: String,
    pub date: NaiveDate,
    pub max_temp_f: Option<f64>,
    pub min_temp_f: Option<f64>,
    pub precip_in: Option<f64>,
}
