// Dashboard statistics derived from the task list

use crate::models::{Task, TaskStatus};
use chrono::NaiveDate;
use serde::Serialize;

/// Number of tasks shown in the dashboard's recent activity list
pub const RECENT_ACTIVITY_LEN: usize = 5;

/// Summary numbers for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub total: usize,
    pub backlog: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub overdue: usize,
    pub completion_rate: u32,
}

impl BoardStats {
    /// Compute every statistic in one go; `today` decides overdue
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let done = count_by_status(tasks, TaskStatus::Done);
        Self {
            total: tasks.len(),
            backlog: count_by_status(tasks, TaskStatus::Backlog),
            todo: count_by_status(tasks, TaskStatus::Todo),
            in_progress: count_by_status(tasks, TaskStatus::InProgress),
            done,
            overdue: overdue_count(tasks, today),
            completion_rate: completion_rate(done, tasks.len()),
        }
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Backlog => self.backlog,
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }
}

pub fn count_by_status(tasks: &[Task], status: TaskStatus) -> usize {
    tasks.iter().filter(|t| t.status == status).count()
}

/// Tasks whose due date is strictly before `today`
///
/// Status is not considered: a finished task past its date still counts.
pub fn overdue_count(tasks: &[Task], today: NaiveDate) -> usize {
    tasks.iter().filter(|t| t.is_overdue(today)).count()
}

/// Percentage of completed tasks rounded to the nearest integer, 0 when empty
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// Up to `n` tasks, newest `created_at` first
///
/// Ties keep collection order.
pub fn recent_tasks(tasks: &[Task], n: usize) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);
    sorted
}
