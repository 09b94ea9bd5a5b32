//! CSV output of daily observations.

use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use csv::WriterBuilder;

use crate::{error::Result, model::DailyObservation};

pub const HEADER: [&str; 5] = ["id", "date", "max_temp_f", "min_temp_f", "precip_in"];

/// Appends observations to a CSV dataset, one row per coordinate-date pair.
pub struct ResultWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl ResultWriter<File> {
    /// Open `output_{YYYYmmdd_HHMMSS}.csv` in `results_dir` for appending,
    /// creating the directory as needed.
    pub fn create(results_dir: &Path, timestamp: NaiveDateTime) -> Result<(Self, PathBuf)> {
        fs::create_dir_all(results_dir)?;

        let path = results_dir.join(format!("output_{}.csv", timestamp.format("%Y%m%d_%H%M%S")));
        let writer = Self::append(&path)?;
        Ok((writer, path))
    }

    /// Open `path` for appending; the header is written only if the file is empty.
    pub fn append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_empty = file.metadata()?.len() == 0;
        Self::from_writer(file, is_empty)
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn from_writer(writer: W, write_header: bool) -> Result<Self> {
        let mut inner = WriterBuilder::new().has_headers(false).from_writer(writer);
        if write_header {
            inner.write_record(HEADER)?;
            inner.flush()?;
        }

        Ok(Self { inner })
    }

    /// Write the rows and flush, so finished coordinates are on disk even if a
    /// later one fails.
    pub fn write_observations(&mut self, observations: &[DailyObservation]) -> Result<()> {
        for observation in observations {
            self.inner.serialize(observation)?;
        }
        self.inner.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error().into())
    }
}
