use crate::models::{ExerciseLog, Visualizations};
use crate::stats::distinct_dates;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

pub const EMPTY_MESSAGE: &str = "No exercise data yet!";

const WEEK_COUNT: i64 = 53;
const ROW_PREFIX: usize = 5;
const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTH_COUNT: usize = 12;
const MAX_BAR: usize = 31;

pub fn build_visualizations_at(
    today: NaiveDate,
    generated_at: DateTime<Local>,
    log: &ExerciseLog,
) -> Visualizations {
    let dates = distinct_dates(log);
    Visualizations {
        heatmap: render_heatmap(today, &dates),
        monthly_summary: render_monthly_summary(&dates),
        generated_at: generated_at.to_rfc3339(),
    }
}

/// Monday-aligned grid of the last 53 weeks; the last column holds `today`.
pub fn render_heatmap(today: NaiveDate, dates: &BTreeSet<NaiveDate>) -> String {
    if dates.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let first_week = week_start(today) - Duration::weeks(WEEK_COUNT - 1);
    let week_starts: Vec<NaiveDate> = (0..WEEK_COUNT)
        .map(|week| first_week + Duration::weeks(week))
        .collect();

    let mut result = month_header(&week_starts);
    result.push('\n');

    for (row, label) in DAY_LABELS.iter().enumerate() {
        let mut line = format!("{label}: ");
        for start in &week_starts {
            let date = *start + Duration::days(row as i64);
            let cell = if date > today {
                ' '
            } else if dates.contains(&date) {
                '■'
            } else {
                '□'
            };
            line.push(cell);
            line.push(' ');
        }
        result.push_str(line.trim_end());
        result.push('\n');
    }

    result
}

fn month_header(week_starts: &[NaiveDate]) -> String {
    let mut header = String::new();
    let mut previous_month = None;

    for (column, start) in week_starts.iter().enumerate() {
        let month = start.month();
        if previous_month == Some(month) {
            continue;
        }
        previous_month = Some(month);

        let position = ROW_PREFIX + column * 2;
        let min_position = if header.is_empty() { 0 } else { header.len() + 1 };
        if position < min_position {
            continue;
        }
        while header.len() < position {
            header.push(' ');
        }
        header.push_str(&start.format("%b").to_string());
    }

    header
}

/// One bar per month, newest first, counting distinct exercise days.
pub fn render_monthly_summary(dates: &BTreeSet<NaiveDate>) -> String {
    let mut monthly: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for date in dates {
        *monthly.entry((date.year(), date.month())).or_default() += 1;
    }

    if monthly.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut result = String::from("Monthly Exercise Summary:\n");
    for ((year, month), count) in monthly.iter().rev().take(MONTH_COUNT) {
        let bar = "█".repeat((*count).min(MAX_BAR));
        result.push_str(&format!("{year:04}-{month:02}: {bar} ({count} days)\n"));
    }

    result
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_log_renders_placeholder() {
        let viz = build_visualizations_at(day(2024, 1, 3), Local::now(), &ExerciseLog::default());
        assert_eq!(viz.heatmap, EMPTY_MESSAGE);
        assert_eq!(viz.monthly_summary, EMPTY_MESSAGE);
        assert!(DateTime::parse_from_rfc3339(&viz.generated_at).is_ok());
    }

    #[test]
    fn heatmap_is_seven_rows_of_fifty_three_weeks() {
        // 2024-01-03 is a Wednesday.
        let today = day(2024, 1, 3);
        let dates: BTreeSet<_> = [today, day(2024, 1, 1)].into_iter().collect();
        let heatmap = render_heatmap(today, &dates);
        let lines: Vec<&str> = heatmap.lines().collect();
        assert_eq!(lines.len(), 8);

        let rows = &lines[1..];
        for (row, label) in rows.iter().zip(DAY_LABELS) {
            assert!(row.starts_with(&format!("{label}: ")));
        }

        // Monday row is complete; its last cell is 2024-01-01.
        let monday_cells: Vec<char> = rows[0][ROW_PREFIX..].chars().step_by(2).collect();
        assert_eq!(monday_cells.len(), 53);
        assert_eq!(monday_cells.last(), Some(&'■'));

        let wednesday_cells: Vec<char> = rows[2][ROW_PREFIX..].chars().step_by(2).collect();
        assert_eq!(wednesday_cells.last(), Some(&'■'));

        // Days after today are blank and trimmed off the line.
        let thursday_cells: Vec<char> = rows[3][ROW_PREFIX..].chars().step_by(2).collect();
        assert_eq!(thursday_cells.len(), 52);
        assert!(thursday_cells.iter().all(|cell| *cell == '□'));
    }

    #[test]
    fn heatmap_header_labels_months_without_overlap() {
        let today = day(2024, 6, 15);
        let dates: BTreeSet<_> = [today].into_iter().collect();
        let heatmap = render_heatmap(today, &dates);
        let header = heatmap.lines().next().unwrap();
        assert!(header.contains("Jan"));
        assert!(header.contains("Jun"));
        for window in header.split_whitespace() {
            assert_eq!(window.len(), 3);
        }
    }

    #[test]
    fn monthly_summary_counts_distinct_days_newest_first() {
        let dates: BTreeSet<_> = [day(2024, 1, 1), day(2024, 1, 2), day(2024, 2, 1)]
            .into_iter()
            .collect();
        let summary = render_monthly_summary(&dates);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "Monthly Exercise Summary:");
        assert_eq!(lines[1], "2024-02: █ (1 days)");
        assert_eq!(lines[2], "2024-01: ██ (2 days)");
    }

    #[test]
    fn monthly_summary_keeps_twelve_months() {
        let dates: BTreeSet<_> = (1..=12)
            .map(|month| day(2023, month, 1))
            .chain((1..=3).map(|month| day(2024, month, 1)))
            .collect();
        let summary = render_monthly_summary(&dates);
        assert_eq!(summary.lines().count(), 1 + MONTH_COUNT);
        assert!(summary.contains("2024-03"));
        assert!(!summary.contains("2023-03"));
    }

    #[test]
    fn week_start_is_monday() {
        assert_eq!(week_start(day(2024, 1, 3)), day(2024, 1, 1));
        assert_eq!(week_start(day(2024, 1, 7)), day(2024, 1, 1));
        assert_eq!(week_start(day(2024, 1, 8)), day(2024, 1, 8));
    }
}
