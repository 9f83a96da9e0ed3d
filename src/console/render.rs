use std::{fmt::Write, time::Duration};

use crate::models::{CompletionStats, TaskView};

/// `H:MM:SS`, prefixed with the day count past one day.
pub fn format_remaining(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let clock = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

pub fn render_tasks(tasks: &[TaskView], urgent_window: Duration) -> String {
    if tasks.is_empty() {
        return "No tasks yet".to_string();
    }

    let mut out = String::new();
    for task in tasks {
        let marker = if task.is_urgent(urgent_window) { '!' } else { '-' };
        let _ = writeln!(out, "{marker} {}", task.name);
        if !task.description.is_empty() {
            let _ = writeln!(out, "    {}", task.description);
        }
        let _ = writeln!(
            out,
            "    Time Left: {}",
            format_remaining(task.remaining_secs())
        );
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_stats(stats: &CompletionStats) -> String {
    let mut line = format!(
        "Completed: {}  Incomplete: {}",
        stats.completed, stats.incomplete
    );
    if let Some(rate) = stats.completion_rate() {
        let _ = write!(line, "  ({:.0}% completed)", rate * 100.0);
    }
    line
}

pub fn near_expiry_message(name: &str) -> String {
    format!("Task {name} is about to expire! 💣")
}

pub fn completion_question(name: &str) -> String {
    format!("Did you complete the task '{name}'? [y/n]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;
    use chrono::Utc;

    fn view(name: &str, description: &str, remaining_ms: u64) -> TaskView {
        TaskView {
            id: TaskId::new(),
            name: name.into(),
            description: description.into(),
            end_at: Utc::now(),
            remaining_ms,
            notified: false,
        }
    }

    #[test]
    fn remaining_time_formats() {
        assert_eq!(format_remaining(5), "0:00:05");
        assert_eq!(format_remaining(3_725), "1:02:05");
        assert_eq!(format_remaining(86_400 + 61), "1 day, 0:01:01");
        assert_eq!(format_remaining(3 * 86_400), "3 days, 0:00:00");
    }

    #[test]
    fn empty_list_has_placeholder() {
        assert_eq!(render_tasks(&[], Duration::from_secs(60)), "No tasks yet");
    }

    #[test]
    fn urgent_tasks_are_marked() {
        let rendered = render_tasks(
            &[view("soon", "", 30_000), view("later", "big one", 7_200_000)],
            Duration::from_secs(60),
        );
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "! soon");
        assert_eq!(lines[1], "    Time Left: 0:00:30");
        assert_eq!(lines[2], "- later");
        assert_eq!(lines[3], "    big one");
        assert_eq!(lines[4], "    Time Left: 2:00:00");
    }

    #[test]
    fn stats_include_rate_once_answered() {
        assert_eq!(
            render_stats(&CompletionStats::default()),
            "Completed: 0  Incomplete: 0"
        );
        let stats = CompletionStats {
            completed: 3,
            incomplete: 2,
        };
        assert_eq!(render_stats(&stats), "Completed: 3  Incomplete: 2  (60% completed)");
    }
}
