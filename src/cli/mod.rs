//! Command-line argument parsing.
//!
//! Two commands: `plan` runs the full orchestration for one trip, and
//! `evaluate` scores an existing report against a reference directory.
//! Parsing is strict: unknown commands and flags are errors, not warnings.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::roles::RoleId;
use crate::trip::{Budget, TripRequest};

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Plan(PlanArgs),
    Evaluate(EvaluateArgs),
    Help,
    Version,
}

/// Arguments of the `plan` command.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanArgs {
    pub starting_point: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<Budget>,
    pub travelers: Option<u32>,
    pub interests: Vec<String>,
    pub travel_style: Option<String>,
    pub accommodation: Option<String>,
    /// Explicit role selection; `None` keeps the default set.
    pub roles: Option<Vec<RoleId>>,
    pub reports_dir: Option<PathBuf>,
}

impl PlanArgs {
    /// Build the trip request these arguments describe.
    pub fn to_request(&self) -> TripRequest {
        let mut trip = TripRequest::new(
            &self.starting_point,
            &self.destination,
            self.start_date,
            self.end_date,
        );
        if let Some(budget) = self.budget {
            trip = trip.with_budget(budget);
        }
        if let Some(travelers) = self.travelers {
            trip = trip.with_travelers(travelers);
        }
        if !self.interests.is_empty() {
            trip = trip.with_interests(self.interests.clone());
        }
        if let Some(style) = &self.travel_style {
            trip = trip.with_travel_style(style.clone());
        }
        if let Some(preference) = &self.accommodation {
            trip = trip.with_accommodation_preference(preference.clone());
        }
        if let Some(roles) = &self.roles {
            trip = trip.with_active_roles(roles.clone());
        }
        trip
    }
}

/// Arguments of the `evaluate` command.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluateArgs {
    pub summary: PathBuf,
    pub refs: PathBuf,
    pub meta: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("unknown command '{0}', try 'help'")]
    UnknownCommand(String),

    #[error("unknown flag '{0}'")]
    UnknownFlag(String),

    #[error("missing required flag {0}")]
    MissingFlag(&'static str),

    #[error("flag {0} expects a value")]
    MissingValue(&'static str),

    #[error("invalid value for {flag}: {message}")]
    InvalidValue { flag: &'static str, message: String },
}

/// Parse command-line arguments (without the program name).
pub fn parse<I, S>(args: I) -> Result<CliCommand, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let Some(command) = args.next() else {
        return Ok(CliCommand::Help);
    };
    match command.as_str() {
        "plan" => parse_plan(args),
        "evaluate" => parse_evaluate(args),
        "help" | "--help" | "-h" => Ok(CliCommand::Help),
        "version" | "--version" | "-V" => Ok(CliCommand::Version),
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

fn parse_plan(mut args: impl Iterator<Item = String>) -> Result<CliCommand, CliError> {
    let mut starting_point = None;
    let mut destination = None;
    let mut start_date = None;
    let mut end_date = None;
    let mut budget = None;
    let mut travelers = None;
    let mut interests = Vec::new();
    let mut travel_style = None;
    let mut accommodation = None;
    let mut roles = None;
    let mut reports_dir = None;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--from" => starting_point = Some(value(&mut args, "--from")?),
            "--to" => destination = Some(value(&mut args, "--to")?),
            "--start" => start_date = Some(parse_date(&value(&mut args, "--start")?, "--start")?),
            "--end" => end_date = Some(parse_date(&value(&mut args, "--end")?, "--end")?),
            "--budget" => {
                let raw = value(&mut args, "--budget")?;
                budget = Some(Budget::from_str(&raw).map_err(|err| CliError::InvalidValue {
                    flag: "--budget",
                    message: err.to_string(),
                })?);
            }
            "--travelers" => {
                let raw = value(&mut args, "--travelers")?;
                travelers = Some(raw.parse::<u32>().map_err(|err| CliError::InvalidValue {
                    flag: "--travelers",
                    message: err.to_string(),
                })?);
            }
            "--interests" => {
                interests = split_list(&value(&mut args, "--interests")?);
            }
            "--style" => travel_style = Some(value(&mut args, "--style")?),
            "--accommodation" => accommodation = Some(value(&mut args, "--accommodation")?),
            "--roles" => {
                let raw = value(&mut args, "--roles")?;
                let mut parsed = Vec::new();
                for token in split_list(&raw) {
                    let role = RoleId::from_str(&token).map_err(|err| CliError::InvalidValue {
                        flag: "--roles",
                        message: err.to_string(),
                    })?;
                    parsed.push(role);
                }
                roles = Some(parsed);
            }
            "--reports-dir" => {
                reports_dir = Some(PathBuf::from(value(&mut args, "--reports-dir")?))
            }
            other => return Err(CliError::UnknownFlag(other.to_string())),
        }
    }

    Ok(CliCommand::Plan(PlanArgs {
        starting_point: starting_point.ok_or(CliError::MissingFlag("--from"))?,
        destination: destination.ok_or(CliError::MissingFlag("--to"))?,
        start_date: start_date.ok_or(CliError::MissingFlag("--start"))?,
        end_date: end_date.ok_or(CliError::MissingFlag("--end"))?,
        budget,
        travelers,
        interests,
        travel_style,
        accommodation,
        roles,
        reports_dir,
    }))
}

fn parse_evaluate(mut args: impl Iterator<Item = String>) -> Result<CliCommand, CliError> {
    let mut summary = None;
    let mut refs = None;
    let mut meta = serde_json::Map::new();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--summary" => summary = Some(PathBuf::from(value(&mut args, "--summary")?)),
            "--refs" => refs = Some(PathBuf::from(value(&mut args, "--refs")?)),
            "--meta" => {
                let raw = value(&mut args, "--meta")?;
                let Some((key, val)) = raw.split_once('=') else {
                    return Err(CliError::InvalidValue {
                        flag: "--meta",
                        message: format!("expected key=value, got '{raw}'"),
                    });
                };
                meta.insert(key.to_string(), serde_json::Value::String(val.to_string()));
            }
            other => return Err(CliError::UnknownFlag(other.to_string())),
        }
    }

    Ok(CliCommand::Evaluate(EvaluateArgs {
        summary: summary.ok_or(CliError::MissingFlag("--summary"))?,
        refs: refs.ok_or(CliError::MissingFlag("--refs"))?,
        meta,
    }))
}

fn value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, CliError> {
    args.next().ok_or(CliError::MissingValue(flag))
}

fn parse_date(raw: &str, flag: &'static str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| CliError::InvalidValue {
        flag,
        message: format!("{err} (expected YYYY-MM-DD)"),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Usage text for the `help` command.
pub fn usage() -> &'static str {
    "\
Usage:
  planner plan --from <place> --to <place> --start <YYYY-MM-DD> --end <YYYY-MM-DD>
               [--budget <budget|moderate|luxury>] [--travelers <n>]
               [--interests <a,b,...>] [--style <style>] [--accommodation <kind>]
               [--roles <role,...>] [--reports-dir <dir>]
  planner evaluate --summary <report.md> --refs <dir> [--meta key=value]...
  planner help
  planner version

Planning needs a GEMINI_API_KEY (optionally GEMINI_API_KEY_2 / GEMINI_API_KEY_3
to spread roles across keys). Reports land in the reports directory; evaluation
writes its artifacts next to the summary file."
}
