// Example tasks used when nothing has been persisted yet

use crate::models::{Task, TaskPriority, TaskStatus, User};
use chrono::{DateTime, NaiveDate, Utc};

fn user(id: &str, name: &str, avatar_n: u32) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        avatar: Some(format!("https://i.pravatar.cc/150?u={}", avatar_n)),
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    assignee: Option<User>,
    created_at: DateTime<Utc>,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        status,
        priority,
        due_date,
        assignee,
        created_at,
    }
}

/// The fixed five-record seed set, all stamped with `created_at`
pub fn seed_tasks(created_at: DateTime<Utc>) -> Vec<Task> {
    vec![
        task(
            "1",
            "Design System Audit",
            "Review current color palette and typography",
            TaskStatus::Done,
            TaskPriority::High,
            NaiveDate::from_ymd_opt(2023, 10, 15),
            Some(user("u1", "Alex Chen", 1)),
            created_at,
        ),
        task(
            "2",
            "API Integration",
            "Connect frontend to the new REST API endpoints",
            TaskStatus::InProgress,
            TaskPriority::Urgent,
            NaiveDate::from_ymd_opt(2023, 10, 24),
            Some(user("u2", "Sarah Jones", 2)),
            created_at,
        ),
        task(
            "3",
            "User Onboarding Flow",
            "Create wireframes for the new signup process",
            TaskStatus::Backlog,
            TaskPriority::Medium,
            None,
            Some(user("u3", "Mike Ross", 3)),
            created_at,
        ),
        task(
            "4",
            "Fix Navigation Bug",
            "Mobile menu closes unexpectedly on scroll",
            TaskStatus::Todo,
            TaskPriority::Low,
            NaiveDate::from_ymd_opt(2023, 10, 25),
            None,
            created_at,
        ),
        task(
            "5",
            "Q4 Marketing Strategy",
            "Prepare documents for the Q4 planning meeting",
            TaskStatus::Backlog,
            TaskPriority::High,
            None,
            None,
            created_at,
        ),
    ]
}
