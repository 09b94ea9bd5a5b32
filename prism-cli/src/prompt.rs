use std::path::PathBuf;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use inquire::{CustomUserError, Select, Text, validator::Validation};
use prism_core::{DateRange, dates::parse_query_date};

/// Pick the coordinate file; only asks when there is more than one.
pub fn choose_coordinate_file(mut files: Vec<PathBuf>) -> Result<PathBuf> {
    if files.len() == 1 {
        return Ok(files.remove(0));
    }

    let names: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
    let choice = Select::new("Several coordinate files found. Which one?", names.clone()).prompt()?;

    let idx = names
        .iter()
        .position(|n| *n == choice)
        .ok_or_else(|| anyhow!("Unknown selection '{choice}'"))?;
    Ok(files.remove(idx))
}

/// Ask for start and end dates, reprompting until both are valid.
pub fn prompt_date_range(today: NaiveDate) -> Result<DateRange> {
    let start = prompt_date("Start date (MM-DD-YYYY):", today, None)?;
    let end = prompt_date("End date (MM-DD-YYYY):", today, Some(start))?;
    Ok(DateRange::new(start, end)?)
}

fn prompt_date(
    message: &str,
    today: NaiveDate,
    not_before: Option<NaiveDate>,
) -> Result<NaiveDate> {
    let input = Text::new(message)
        .with_help_message("Between 01-01-1981 and today")
        .with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
            Ok(match check_date(input, today, not_before) {
                Ok(_) => Validation::Valid,
                Err(msg) => Validation::Invalid(msg.into()),
            })
        })
        .prompt()?;

    check_date(&input, today, not_before).map_err(|msg| anyhow!(msg))
}

fn check_date(
    input: &str,
    today: NaiveDate,
    not_before: Option<NaiveDate>,
) -> Result<NaiveDate, String> {
    let date = parse_query_date(input, today).map_err(|e| e.to_string())?;

    match not_before {
        Some(start) if date < start => Err(format!(
            "The end date must not be before the start date ({}).",
            start.format("%m-%d-%Y")
        )),
        _ => Ok(date),
    }
}
