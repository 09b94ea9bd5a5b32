use chrono::{Days, NaiveDate};

use crate::error::{ClimateError, Result};

/// Format users type dates in.
pub const INPUT_FORMAT: &str = "%m-%d-%Y";

/// Format ACIS expects and the output file uses.
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// First day of the daily PRISM record served by ACIS.
pub const EARLIEST_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1981, 1, 1) {
    Some(d) => d,
    None => panic!("invalid earliest date"),
};

/// Parse a `MM-DD-YYYY` date and check it lies in `EARLIEST_DATE..=today`.
pub fn parse_query_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    // chrono accepts single-digit fields and longer years; the prompt promises a fixed width.
    let fixed_width = input.len() == 10
        && input.char_indices().all(|(i, c)| match i {
            2 | 5 => c == '-',
            _ => c.is_ascii_digit(),
        });

    let date = fixed_width
        .then(|| NaiveDate::parse_from_str(input, INPUT_FORMAT).ok())
        .flatten()
        .ok_or_else(|| {
            ClimateError::validation(format!(
                "'{input}' is not a valid date. Please follow the MM-DD-YYYY pattern."
            ))
        })?;

    validate_query_date(date, today)?;
    Ok(date)
}

pub fn validate_query_date(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date < EARLIEST_DATE {
        return Err(ClimateError::validation(format!(
            "{} is before the start of the PRISM daily record ({}).",
            date.format(INPUT_FORMAT),
            EARLIEST_DATE.format(INPUT_FORMAT),
        )));
    }

    if date > today {
        return Err(ClimateError::validation(format!(
            "{} is in the future; the latest allowed date is {}.",
            date.format(INPUT_FORMAT),
            today.format(INPUT_FORMAT),
        )));
    }

    Ok(())
}

/// Inclusive range of days to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ClimateError::validation(format!(
                "End date {} is before start date {}.",
                end.format(INPUT_FORMAT),
                start.format(INPUT_FORMAT),
            )));
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn num_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days() as u64).filter_map(|n| self.start.checked_add_days(Days::new(n)))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start.format(ISO_FORMAT), self.end.format(ISO_FORMAT))
    }
}
