use std::{collections::HashSet, io::Write};

use tracing::{error, info, warn};

use crate::{
    dates::DateRange,
    error::{ClimateError, Result},
    model::Coordinate,
    output::ResultWriter,
    provider::ClimateProvider,
};

/// A coordinate the provider could not serve.
#[derive(Debug)]
pub struct CoordinateFailure {
    pub id: String,
    pub error: ClimateError,
}

/// What happened over a whole run.
#[derive(Debug, Default)]
pub struct RetrievalSummary {
    pub coordinates_fetched: usize,
    pub rows_written: usize,
    /// Ids for which the service returned fewer distinct days than requested.
    pub incomplete: Vec<String>,
    pub failures: Vec<CoordinateFailure>,
}

impl RetrievalSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetch every coordinate in order and append the results to `writer`.
///
/// Provider errors are recorded per coordinate and do not stop the run.
/// Writer errors do.
pub async fn retrieve<W: Write>(
    provider: &dyn ClimateProvider,
    coordinates: &[Coordinate],
    range: &DateRange,
    writer: &mut ResultWriter<W>,
) -> Result<RetrievalSummary> {
    let expected_days = range.num_days();
    let mut summary = RetrievalSummary::default();

    for coordinate in coordinates {
        info!(id = %coordinate.id, lat = coordinate.lat, lon = coordinate.lon, "Fetching data");

        let observations = match provider.fetch_daily(coordinate, range).await {
            Ok(observations) => observations,
            Err(err) => {
                error!(id = %coordinate.id, "{err}");
                summary.failures.push(CoordinateFailure { id: coordinate.id.clone(), error: err });
                continue;
            }
        };

        let distinct_days = observations.iter().map(|o| o.date).collect::<HashSet<_>>().len();
        if distinct_days < expected_days {
            warn!(
                id = %coordinate.id,
                returned = distinct_days,
                expected = expected_days,
                "Service returned fewer days than requested for {range}"
            );
            summary.incomplete.push(coordinate.id.clone());
        }

        writer.write_observations(&observations)?;
        summary.coordinates_fetched += 1;
        summary.rows_written += observations.len();
    }

    Ok(summary)
}
