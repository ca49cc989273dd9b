// Search and priority filtering for the board view

use crate::models::{Task, TaskPriority};
use eyre::Result;
use std::fmt;
use std::str::FromStr;

/// Priority selection; `All` disables the priority check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(TaskPriority),
}

impl PriorityFilter {
    pub fn matches(self, priority: TaskPriority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(p) => p == priority,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => write!(f, "all"),
            PriorityFilter::Only(p) => write!(f, "{}", p),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        if s == "all" {
            return Ok(PriorityFilter::All);
        }
        Ok(PriorityFilter::Only(s.parse()?))
    }
}

/// Board filter: search text plus priority
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring matched against title or description
    pub search: String,
    pub priority: PriorityFilter,
}

impl TaskFilter {
    pub fn new(search: impl Into<String>, priority: PriorityFilter) -> Self {
        Self {
            search: search.into(),
            priority,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task) && self.priority.matches(task.priority)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    /// Tasks passing the filter, in collection order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}
