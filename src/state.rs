use crate::errors::AppError;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

pub const EXERCISES_FILE: &str = "exercises.json";
pub const STREAK_FILE: &str = "streak.json";
pub const VISUALIZATIONS_FILE: &str = "visualizations.json";
pub const README_FILE: &str = "README.md";
pub const LOGS_FILE: &str = "logs/LOGS.md";

/// Everything a single run needs: where the files live and which day counts as today.
#[derive(Debug, Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub today: NaiveDate,
}

impl AppState {
    pub fn new(root: PathBuf, today: NaiveDate) -> Self {
        Self { root, today }
    }

    pub fn exercises_path(&self) -> PathBuf {
        self.path(EXERCISES_FILE)
    }

    pub fn streak_path(&self) -> PathBuf {
        self.path(STREAK_FILE)
    }

    pub fn visualizations_path(&self) -> PathBuf {
        self.path(VISUALIZATIONS_FILE)
    }

    pub fn readme_path(&self) -> PathBuf {
        self.path(README_FILE)
    }

    pub fn logs_path(&self) -> PathBuf {
        self.path(LOGS_FILE)
    }

    fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}

pub const TODAY_ENV: &str = "EXERCISE_STREAK_TODAY";

/// `--today` wins over `EXERCISE_STREAK_TODAY`, which wins over the local clock.
pub fn resolve_today(arg: Option<NaiveDate>) -> Result<NaiveDate, AppError> {
    today_from(arg, std::env::var(TODAY_ENV).ok(), Local::now().date_naive())
}

fn today_from(
    arg: Option<NaiveDate>,
    env_value: Option<String>,
    clock: NaiveDate,
) -> Result<NaiveDate, AppError> {
    if let Some(today) = arg {
        return Ok(today);
    }

    match env_value {
        Some(raw) if !raw.trim().is_empty() => parse_date(raw.trim())
            .map_err(|err| AppError::invalid_input(format!("{TODAY_ENV}: {err}"))),
        _ => Ok(clock),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got '{raw}' ({err})"))
}
