use crate::commands::{self, AddOutcome, NewExercise};
use crate::errors::AppError;
use crate::state::{AppState, parse_date, resolve_today};
use crate::storage::resolve_root;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status of `check` when nothing is logged for today.
pub const NOT_EXERCISED_EXIT: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "exercise_streak", version, about = "Track an exercise log and its day streak")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding exercises.json, streak.json and the documents.
    /// Defaults to $EXERCISE_STREAK_DIR, then the current directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Treat this date as today (YYYY-MM-DD). Defaults to $EXERCISE_STREAK_TODAY, then the local date.
    #[arg(long, global = true, value_name = "DATE", value_parser = parse_date)]
    pub today: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create exercises.json, README.md and logs/LOGS.md if they are missing
    Init,
    /// Log an exercise
    ///
    /// Example: exercise_streak add --activity Cycling --duration 45
    Add {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "Jogging")]
        activity: String,
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove every exercise logged on a date (today by default)
    Remove {
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Attach a Strava activity to the exercises of a date (today by default)
    Embed {
        #[arg(long = "activity-id")]
        activity_id: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Recompute streak.json from the log
    Streak,
    /// Regenerate visualizations.json
    Visualize,
    /// Rewrite the stats, log and milestones regions of README.md
    Readme,
    /// Rewrite the log and Strava regions of logs/LOGS.md
    Logs,
    /// Exit with status 1 unless an exercise is logged for today
    Check,
    /// Run streak, visualize, readme and logs in order
    Refresh,
}

pub async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let state = AppState::new(resolve_root(cli.dir), resolve_today(cli.today)?);

    match cli.command {
        Command::Init => {
            let created = commands::init(&state).await?;
            if created.is_empty() {
                println!("✅ Nothing to create");
            }
            for path in created {
                println!("✅ Created {}", path.display());
            }
        }
        Command::Add {
            date,
            activity,
            duration,
            notes,
        } => {
            let request = NewExercise {
                date,
                activity: activity.clone(),
                duration,
                notes,
            };
            match commands::add_exercise(&state, request).await? {
                AddOutcome::Added(date) => println!("✅ Added {activity} for {date}"),
                AddOutcome::AlreadyLogged(date) => {
                    println!("✅ Already logged {activity} for {date}")
                }
            }
        }
        Command::Remove { date } => {
            let date = date.unwrap_or(state.today);
            let removed = commands::remove_exercises(&state, Some(date)).await?;
            if removed == 0 {
                println!("ℹ️  No entry for {date}");
            } else {
                println!("✅ Removed {removed} entry(s) for {date}");
            }
        }
        Command::Embed { activity_id, date } => {
            let date = date.unwrap_or(state.today);
            commands::link_strava(&state, Some(date), &activity_id).await?;
            println!("✅ Linked Strava activity {} to {date}", activity_id.trim());
        }
        Command::Streak => {
            let streak = commands::update_streak(&state).await?;
            println!(
                "✅ Streak: {} days | Longest: {} days | Total: {} days",
                streak.current_streak, streak.longest_streak, streak.total_days
            );
        }
        Command::Visualize => {
            commands::update_visualizations(&state).await?;
            println!("✅ Generated visualizations");
        }
        Command::Readme => {
            commands::update_readme(&state).await?;
            println!("✅ README updated");
        }
        Command::Logs => {
            commands::update_logs(&state).await?;
            println!("✅ LOGS.md updated");
        }
        Command::Check => {
            let output = std::env::var_os("GITHUB_OUTPUT")
                .filter(|value| !value.is_empty())
                .map(PathBuf::from);
            let exercised = commands::check_today(&state, output.as_deref()).await?;
            println!("exercised={exercised}");
            if !exercised {
                println!("❌ No exercise logged for today ({})", state.today);
                return Ok(ExitCode::from(NOT_EXERCISED_EXIT));
            }
            println!("✅ Exercise logged for today ({})", state.today);
        }
        Command::Refresh => {
            let streak = commands::refresh(&state).await?;
            println!(
                "✅ Refreshed: streak {} days | total {} days",
                streak.current_streak, streak.total_days
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
