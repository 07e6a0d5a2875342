use crate::document::{RegionReport, apply_regions};
use crate::errors::{AppError, ErrorKind};
use crate::models::{ExerciseDuration, ExerciseLog, ExerciseRecord, StreakState, Visualizations};
use crate::render::{
    LOG_REGION, LOGS_LOG_ROWS, MILESTONES_REGION, README_LOG_ROWS, STATS_REGION, STRAVA_REGION,
    render_log_table, render_logs_template, render_milestones, render_readme_template,
    render_stats, render_strava,
};
use crate::state::AppState;
use crate::stats::{build_streak_at, exercised_on};
use crate::storage::{load_or_default, load_strict, persist_json, read_document, write_atomic};
use crate::visualize::build_visualizations_at;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct NewExercise {
    pub date: Option<NaiveDate>,
    pub activity: String,
    pub duration: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(NaiveDate),
    AlreadyLogged(NaiveDate),
}

pub async fn add_exercise(state: &AppState, request: NewExercise) -> Result<AddOutcome, AppError> {
    let activity = request.activity.trim();
    if activity.is_empty() {
        return Err(AppError::invalid_input("activity must not be empty"));
    }

    let date = request.date.unwrap_or(state.today);
    let path = state.exercises_path();
    let mut log: ExerciseLog = load_strict(&path).await?;

    let exists = log
        .exercises
        .iter()
        .any(|record| record.date == date && record.activity == activity);
    if exists {
        info!("{activity} already logged for {date}");
        return Ok(AddOutcome::AlreadyLogged(date));
    }

    let mut record = ExerciseRecord::new(date, activity);
    record.duration = request
        .duration
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(ExerciseDuration::parse);
    record.notes = request.notes.filter(|notes| !notes.trim().is_empty());

    log.exercises.push(record);
    log.exercises.sort_by_key(|record| record.date);
    persist_json(&path, &log).await?;

    info!("added {activity} for {date}");
    Ok(AddOutcome::Added(date))
}

/// Drops every record dated `date`, returning how many were removed.
pub async fn remove_exercises(state: &AppState, date: Option<NaiveDate>) -> Result<usize, AppError> {
    let date = date.unwrap_or(state.today);
    let path = state.exercises_path();
    let mut log: ExerciseLog = load_strict(&path).await?;

    let before = log.exercises.len();
    log.exercises.retain(|record| record.date != date);
    let removed = before - log.exercises.len();

    if removed > 0 {
        persist_json(&path, &log).await?;
        info!("removed {removed} record(s) for {date}");
    }
    Ok(removed)
}

pub async fn link_strava(
    state: &AppState,
    date: Option<NaiveDate>,
    activity_id: &str,
) -> Result<usize, AppError> {
    let activity_id = activity_id.trim();
    if activity_id.is_empty() || !activity_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::invalid_input(
            "strava activity id must be a non-empty alphanumeric string",
        ));
    }

    let date = date.unwrap_or(state.today);
    let path = state.exercises_path();
    let mut log: ExerciseLog = load_strict(&path).await?;

    let mut linked = 0;
    for record in log.exercises.iter_mut().filter(|record| record.date == date) {
        if let Some(previous) = record.strava_activity_id.as_deref() {
            if previous != activity_id {
                warn!(
                    "{date} already has strava activity {previous}, replacing it with {activity_id}"
                );
            }
        }
        record.strava_activity_id = Some(activity_id.to_string());
        linked += 1;
    }
    if linked == 0 {
        return Err(AppError::not_found(format!("no exercise logged for {date}")));
    }

    persist_json(&path, &log).await?;
    info!("linked strava activity {activity_id} to {date}");
    Ok(linked)
}

pub async fn update_streak(state: &AppState) -> Result<StreakState, AppError> {
    let log: ExerciseLog = load_or_default(&state.exercises_path()).await;
    let streak = build_streak_at(state.today, &log);
    persist_json(&state.streak_path(), &streak).await?;

    info!(
        current = streak.current_streak,
        longest = streak.longest_streak,
        total = streak.total_days,
        "streak updated"
    );
    Ok(streak)
}

pub async fn update_visualizations(state: &AppState) -> Result<Visualizations, AppError> {
    let log: ExerciseLog = load_or_default(&state.exercises_path()).await;
    let visualizations = build_visualizations_at(state.today, Local::now(), &log);
    persist_json(&state.visualizations_path(), &visualizations).await?;

    info!("visualizations written to {}", state.visualizations_path().display());
    Ok(visualizations)
}

pub async fn update_readme(state: &AppState) -> Result<RegionReport, AppError> {
    let streak: StreakState = load_or_default(&state.streak_path()).await;
    let log: ExerciseLog = load_or_default(&state.exercises_path()).await;

    let mut regions = vec![(STATS_REGION, render_stats(&streak))];
    if let Some(table) = render_log_table(&log, README_LOG_ROWS) {
        regions.push((LOG_REGION, table));
    }
    regions.push((MILESTONES_REGION, render_milestones(streak.current_streak)));

    patch_document(&state.readme_path(), &regions).await
}

pub async fn update_logs(state: &AppState) -> Result<RegionReport, AppError> {
    let log: ExerciseLog = load_or_default(&state.exercises_path()).await;

    let mut regions = Vec::new();
    if let Some(table) = render_log_table(&log, LOGS_LOG_ROWS) {
        regions.push((LOG_REGION, table));
    }
    regions.push((STRAVA_REGION, render_strava(&log)));

    patch_document(&state.logs_path(), &regions).await
}

async fn patch_document(path: &Path, regions: &[(&str, String)]) -> Result<RegionReport, AppError> {
    let document = read_document(path).await?;
    let report = apply_regions(&document, regions)?;

    for name in &report.missing {
        warn!("{} has no '{name}' region, left unchanged", path.display());
    }
    if report.content != document {
        write_atomic(path, report.content.as_bytes()).await?;
        info!("{} updated", path.display());
    }
    Ok(report)
}

/// Whether today's date is in the log. The answer is also appended to `output`
/// (the `$GITHUB_OUTPUT` file in CI) as `exercised=<bool>`.
pub async fn check_today(state: &AppState, output: Option<&Path>) -> Result<bool, AppError> {
    let log: ExerciseLog = load_or_default(&state.exercises_path()).await;
    let exercised = exercised_on(&log, state.today);

    if let Some(output) = output {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(output)
            .await?;
        file.write_all(format!("exercised={exercised}\n").as_bytes())
            .await?;
        file.flush().await?;
    }

    Ok(exercised)
}

/// Creates whichever of the log and the two documents do not exist yet.
pub async fn init(state: &AppState) -> Result<Vec<PathBuf>, AppError> {
    let mut created = Vec::new();

    let exercises_path = state.exercises_path();
    if !path_exists(&exercises_path).await? {
        persist_json(&exercises_path, &ExerciseLog::default()).await?;
        created.push(exercises_path);
    }

    let readme_path = state.readme_path();
    if !path_exists(&readme_path).await? {
        let streak: StreakState = load_or_default(&state.streak_path()).await;
        write_atomic(&readme_path, render_readme_template(&streak).as_bytes()).await?;
        created.push(readme_path);
    }

    let logs_path = state.logs_path();
    if !path_exists(&logs_path).await? {
        write_atomic(&logs_path, render_logs_template().as_bytes()).await?;
        created.push(logs_path);
    }

    for path in &created {
        info!("created {}", path.display());
    }
    Ok(created)
}

/// Recomputes everything derived from the log. Documents that do not exist are skipped.
pub async fn refresh(state: &AppState) -> Result<StreakState, AppError> {
    let streak = update_streak(state).await?;
    update_visualizations(state).await?;

    skip_missing(update_readme(state).await)?;
    skip_missing(update_logs(state).await)?;

    Ok(streak)
}

fn skip_missing(result: Result<RegionReport, AppError>) -> Result<(), AppError> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.kind == ErrorKind::NotFound => {
            warn!("skipping: {err}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

async fn path_exists(path: &Path) -> Result<bool, AppError> {
    Ok(fs::try_exists(path).await?)
}
