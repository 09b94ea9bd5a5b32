use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::ServiceConfig,
    dates::{DateRange, ISO_FORMAT},
    error::{ClimateError, Result},
    model::{Coordinate, DailyObservation},
};

use super::ClimateProvider;

/// Daily max temperature (°F), min temperature (°F), precipitation (in).
const ELEMS: &str = "maxt,mint,pcpn";

/// ACIS marks missing grid values with -999.
const MISSING: f64 = -999.0;

/// Client for the RCC ACIS `GridData` web service.
#[derive(Debug, Clone)]
pub struct AcisProvider {
    endpoint: String,
    grid: String,
    http: Client,
}

impl AcisProvider {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClimateError::Network)?;

        Ok(Self {
            endpoint: format!("{}/GridData", config.base_url.trim_end_matches('/')),
            grid: config.grid.clone(),
            http,
        })
    }

    async fn post_grid_data(&self, coordinate: &Coordinate, range: &DateRange) -> Result<String> {
        let form = [
            ("loc", coordinate.acis_loc()),
            ("sdate", range.start().format(ISO_FORMAT).to_string()),
            ("edate", range.end().format(ISO_FORMAT).to_string()),
            ("grid", self.grid.clone()),
            ("elems", ELEMS.to_string()),
        ];

        debug!(endpoint = %self.endpoint, id = %coordinate.id, ?form, "requesting grid data");

        let res = self
            .http
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(ClimateError::Network)?;

        let status = res.status();
        let body = res.text().await.map_err(ClimateError::Network)?;

        if !status.is_success() {
            return Err(ClimateError::service(format!(
                "ACIS GridData request for ({}) failed with status {}: {}",
                coordinate.acis_loc(),
                status,
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl ClimateProvider for AcisProvider {
    async fn fetch_daily(
        &self,
        coordinate: &Coordinate,
        range: &DateRange,
    ) -> Result<Vec<DailyObservation>> {
        let body = self.post_grid_data(coordinate, range).await?;
        parse_grid_data(&body, coordinate, range)
    }
}

#[derive(Debug, Deserialize)]
struct GridDataResponse {
    #[serde(default)]
    data: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    error: Option<String>,
}

fn parse_grid_data(
    body: &str,
    coordinate: &Coordinate,
    range: &DateRange,
) -> Result<Vec<DailyObservation>> {
    let parsed: GridDataResponse = serde_json::from_str(body).map_err(|e| {
        ClimateError::service(format!(
            "Failed to parse ACIS GridData JSON ({e}): {}",
            truncate_body(body)
        ))
    })?;

    // ACIS reports bad locations and parameters with a 200 and an `error` field.
    if let Some(error) = parsed.error {
        return Err(ClimateError::service(format!(
            "ACIS rejected the request for id '{}' at ({}): {error}",
            coordinate.id,
            coordinate.acis_loc(),
        )));
    }

    let rows = parsed.data.ok_or_else(|| {
        ClimateError::service(format!(
            "ACIS response for id '{}' contained no data",
            coordinate.id
        ))
    })?;

    rows.iter().map(|row| parse_row(row, coordinate, range)).collect()
}

fn parse_row(
    row: &[Value],
    coordinate: &Coordinate,
    range: &DateRange,
) -> Result<DailyObservation> {
    let [date, maxt, mint, pcpn] = row else {
        return Err(ClimateError::service(format!(
            "Expected [date, maxt, mint, pcpn] in ACIS row, got {}",
            Value::from(row.to_vec())
        )));
    };

    let date = date
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, ISO_FORMAT).ok())
        .ok_or_else(|| ClimateError::service(format!("Invalid date in ACIS row: {date}")))?;

    if !range.contains(date) {
        return Err(ClimateError::service(format!(
            "ACIS returned {date} for id '{}', outside the requested range {range}",
            coordinate.id
        )));
    }

    Ok(DailyObservation {
        id: coordinate.id.clone(),
        date,
        max_temp_f: parse_value(maxt)?,
        min_temp_f: parse_value(mint)?,
        precip_in: parse_value(pcpn)?,
    })
}

fn parse_value(value: &Value) -> Result<Option<f64>> {
    let parsed = match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.trim() {
            "" | "M" => None,
            // Trace precipitation.
            "T" => Some(0.0),
            other => Some(other.parse::<f64>().map_err(|_| {
                ClimateError::service(format!("Invalid value in ACIS row: {value}"))
            })?),
        },
        _ => return Err(ClimateError::service(format!("Invalid value in ACIS row: {value}"))),
    };

    Ok(parsed.filter(|v| *v != MISSING))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
