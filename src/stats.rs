use crate::models::{ExerciseLog, LastUpdated, StreakState};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

pub fn build_streak_at(today: NaiveDate, log: &ExerciseLog) -> StreakState {
    let dates = distinct_dates(log);

    StreakState {
        current_streak: current_streak(today, &dates),
        longest_streak: longest_streak(&dates),
        total_days: dates.len() as u32,
        last_updated: dates
            .last()
            .copied()
            .map(LastUpdated::On)
            .unwrap_or_default(),
    }
}

pub fn distinct_dates(log: &ExerciseLog) -> BTreeSet<NaiveDate> {
    log.exercises.iter().map(|record| record.date).collect()
}

/// Walks back from `today`. A single missed day is forgiven, two in a row end the streak.
fn current_streak(today: NaiveDate, dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut streak = 0u32;
    let mut check = today;

    loop {
        let previous = check - Duration::days(1);
        let matched = if dates.contains(&check) {
            check
        } else if dates.contains(&previous) {
            previous
        } else {
            break;
        };

        streak = streak.saturating_add(1);
        check = matched - Duration::days(1);
    }

    streak
}

fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for &date in dates {
        run = match prev {
            Some(prev) if (date - prev).num_days() <= 1 => run.saturating_add(1),
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }

    longest
}

pub fn exercised_on(log: &ExerciseLog, date: NaiveDate) -> bool {
    log.exercises.iter().any(|record| record.date == date)
}
