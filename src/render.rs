use crate::document::region;
use crate::models::{ExerciseLog, ExerciseRecord, MILESTONES, StreakState};

pub const README_LOG_ROWS: usize = 10;
pub const LOGS_LOG_ROWS: usize = 20;

pub const STATS_REGION: &str = "stats";
pub const LOG_REGION: &str = "log";
pub const MILESTONES_REGION: &str = "milestones";
pub const STRAVA_REGION: &str = "strava";

const STRAVA_EMBED_SCRIPT: &str = "https://strava-embeds.com/embed.js";

pub fn render_stats(streak: &StreakState) -> String {
    format!(
        "```\n🔥 Current Streak: {} days\n🏅 Longest Streak: {} days\n🏃 Total Exercise Days: {}\n📅 Last Exercise: {}\n```",
        streak.current_streak, streak.longest_streak, streak.total_days, streak.last_updated
    )
}

/// Newest-first table of the last `limit` records. `None` when the log is empty.
pub fn render_log_table(log: &ExerciseLog, limit: usize) -> Option<String> {
    let recent = log.recent(limit);
    if recent.is_empty() {
        return None;
    }

    let mut table = String::from("| Date | Activity | Duration | Notes |\n|------|----------|----------|-------|\n");
    for record in recent {
        table.push_str(&log_row(record));
        table.push('\n');
    }
    Some(table)
}

fn log_row(record: &ExerciseRecord) -> String {
    let duration = record
        .duration
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    let notes = record.notes.as_deref().unwrap_or_default();
    format!(
        "| {} | ✅ {} | {} | {} |",
        record.date.format("%Y-%m-%d"),
        table_cell(&record.activity),
        table_cell(&duration),
        table_cell(notes)
    )
}

/// User text never spans lines or opens an HTML comment, so it cannot fake a region sentinel.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace(['\r', '\n'], " ")
        .replace("<!--", "&lt;!--")
}

pub fn render_milestones(current_streak: u32) -> String {
    MILESTONES
        .iter()
        .map(|milestone| {
            let mark = if current_streak >= milestone.days { 'x' } else { ' ' };
            format!("- [{mark}] {}\n", milestone.label)
        })
        .collect()
}

pub fn render_strava(log: &ExerciseLog) -> String {
    let mut entries = String::new();
    let mut seen = Vec::new();
    for record in log.recent(usize::MAX) {
        let Some(activity_id) = record.strava_activity_id.as_deref() else {
            continue;
        };
        if seen.contains(&activity_id) {
            continue;
        }
        seen.push(activity_id);
        entries.push_str(&format!(
            "### {}\n```html\n<div class=\"strava-embed-placeholder\" data-embed-type=\"activity\" data-embed-id=\"{activity_id}\" data-style=\"standard\"></div><script src=\"{STRAVA_EMBED_SCRIPT}\"></script>\n```\n\n",
            record.date.format("%Y-%m-%d")
        ));
    }
    entries
}

pub fn render_readme_template(streak: &StreakState) -> String {
    README_TEMPLATE
        .replace("{{STATS}}", &region(STATS_REGION, &render_stats(streak)))
        .replace("{{LOG}}", &region(LOG_REGION, ""))
        .replace(
            "{{MILESTONES}}",
            &region(MILESTONES_REGION, &render_milestones(streak.current_streak)),
        )
}

pub fn render_logs_template() -> String {
    LOGS_TEMPLATE
        .replace("{{LOG}}", &region(LOG_REGION, ""))
        .replace("{{STRAVA}}", &region(STRAVA_REGION, ""))
}

const README_TEMPLATE: &str = r#"# 🏃 Exercise Streak

Daily exercise log, updated automatically.

## 📊 Stats

{{STATS}}

## 📝 Recent Log

{{LOG}}

## 🏆 Milestones

{{MILESTONES}}

---

*Auto-updated by exercise_streak*
"#;

const LOGS_TEMPLATE: &str = r#"# 📝 Exercise Logs

{{LOG}}

## Strava Activities

{{STRAVA}}

---

*Auto-updated by exercise_streak*
"#;
