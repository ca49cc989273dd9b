// Data models for the task board

use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board column a task lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Backlog,
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses in board order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Backlog,
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Column heading
    pub fn title(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "Backlog",
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| eyre!("Unknown status: {} (expected backlog, todo, in-progress or done)", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
            TaskPriority::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| eyre!("Unknown priority: {} (expected low, medium, high or urgent)", s))
    }
}

/// Embedded snapshot of the person a task is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A unit of work on the board
///
/// Serialized with camelCase keys so the persisted blob matches the
/// `taskflow-tasks` format: `dueDate`, `createdAt`, optional fields omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a task from a draft, assigning identity and creation time
    pub fn from_draft(draft: TaskDraft, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            assignee: draft.assignee,
            created_at,
        }
    }

    /// Merge the fields present in `patch`; `id` and `created_at` never change
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }
    }

    /// Due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < today)
    }
}

/// Input to `TaskStore::add_task`: a task without id and creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<User>,
}

impl TaskDraft {
    /// Draft with the add-task form defaults: todo, medium priority
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
            assignee: None,
        }
    }
}

/// Partial update for a task
///
/// Outer `None` leaves a field alone. For optional task fields the inner
/// value is written as-is, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub assignee: Option<Option<User>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastKind::Success => write!(f, "success"),
            ToastKind::Error => write!(f, "error"),
            ToastKind::Info => write!(f, "info"),
        }
    }
}

/// Ephemeral notification, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
}

/// Fresh opaque identifier for tasks and toasts
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: "t1".to_string(),
            title: "Write docs".to_string(),
            description: Some("API reference".to_string()),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: NaiveDate::from_ymd_opt(2023, 10, 24),
            assignee: Some(User {
                id: "u1".to_string(),
                name: "Alex Chen".to_string(),
                avatar: None,
            }),
            created_at: DateTime::parse_from_rfc3339("2023-10-01T09:30:00.000Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"in-progress\"");
        assert_eq!(serde_json::to_string(&TaskStatus::Backlog).unwrap(), "\"backlog\"");

        let status: TaskStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(status, TaskStatus::Done);
    }

    #[test]
    fn test_status_and_priority_from_str() {
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("urgent".parse::<TaskPriority>().unwrap(), TaskPriority::Urgent);
        assert!("doing".parse::<TaskStatus>().is_err());
        assert!("HIGH".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_task_wire_format() {
        let json = serde_json::to_value(sample_task()).unwrap();

        assert_eq!(json["dueDate"], "2023-10-24");
        assert_eq!(json["status"], "todo");
        assert_eq!(json["priority"], "high");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2023-10-01T09:30:00"));
        // Absent avatar is omitted rather than written as null
        assert!(json["assignee"].get("avatar").is_none());
    }

    #[test]
    fn test_task_optional_fields_omitted() {
        let mut task = sample_task();
        task.description = None;
        task.due_date = None;
        task.assignee = None;

        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("description"));
        assert!(!json.contains("dueDate"));
        assert!(!json.contains("assignee"));

        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_task_accepts_null_optionals() {
        let json = r#"{"id":"9","title":"x","description":null,"status":"todo","priority":"low","dueDate":null,"createdAt":"2023-10-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
        assert!(task.assignee.is_none());
    }

    #[test]
    fn test_apply_patch_only_touches_given_fields() {
        let original = sample_task();
        let mut task = original.clone();

        task.apply(TaskPatch {
            priority: Some(TaskPriority::Low),
            due_date: Some(None),
            ..Default::default()
        });

        assert_eq!(task.priority, TaskPriority::Low);
        assert_eq!(task.due_date, None);
        assert_eq!(task.title, original.title);
        assert_eq!(task.description, original.description);
        assert_eq!(task.assignee, original.assignee);
        assert_eq!(task.id, original.id);
        assert_eq!(task.created_at, original.created_at);
    }

    #[test]
    fn test_apply_patch_status_and_assignee() {
        let mut task = sample_task();
        let other = User {
            id: "u1".to_string(),
            name: "Current User".to_string(),
            avatar: None,
        };

        task.apply(TaskPatch {
            status: Some(TaskStatus::Done),
            assignee: Some(Some(other.clone())),
            ..Default::default()
        });
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.assignee, Some(other));

        task.apply(TaskPatch {
            assignee: Some(None),
            ..Default::default()
        });
        assert_eq!(task.assignee, None);
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn test_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2023, 10, 24).unwrap();
        let mut task = sample_task();

        // Due today is not yet overdue
        assert!(!task.is_overdue(today));
        assert!(task.is_overdue(today.succ_opt().unwrap()));

        task.due_date = None;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn test_toast_type_field() {
        let toast = Toast {
            id: "x".to_string(),
            message: "Task deleted".to_string(),
            kind: ToastKind::Info,
        };
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json["type"], "info");
    }

    #[test]
    fn test_new_id_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_empty_patch() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            title: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
