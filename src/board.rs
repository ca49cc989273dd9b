// Kanban columns and drag-and-drop reassignment

use crate::filter::TaskFilter;
use crate::models::{Task, TaskStatus};
use crate::store::TaskStore;
use eyre::Result;
use tracing::debug;

/// One board column with the tasks currently shown in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<&'a Task>,
}

/// Split the filtered tasks into the four columns in board order
///
/// Tasks keep collection order within a column.
pub fn columns<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<Column<'a>> {
    let visible = filter.apply(tasks);
    TaskStatus::ALL
        .into_iter()
        .map(|status| Column {
            status,
            title: status.title(),
            tasks: visible.iter().copied().filter(|t| t.status == status).collect(),
        })
        .collect()
}

/// What a drag carries: only the dragged task's id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub task_id: String,
}

impl DragPayload {
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
        }
    }
}

/// Handle a drop onto the column for `status`
///
/// Any non-empty payload moves the task, including drops onto the column
/// it is already in. Returns whether a move was issued.
pub fn drop_on_column(store: &mut TaskStore, payload: &DragPayload, status: TaskStatus) -> Result<bool> {
    if payload.task_id.is_empty() {
        debug!(%status, "Ignoring drop without task id");
        return Ok(false);
    }

    store.move_task(&payload.task_id, status)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::filter::PriorityFilter;
    use crate::models::TaskPriority;

    fn store() -> TaskStore {
        TaskStore::open(Box::new(MemoryBlobStore::new()))
    }

    fn column_ids(column: &Column<'_>) -> Vec<String> {
        column.tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_columns_partition_seed() {
        let store = store();
        let cols = columns(store.tasks().unwrap(), &TaskFilter::default());

        let titles: Vec<&str> = cols.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Backlog", "To Do", "In Progress", "Done"]);

        assert_eq!(column_ids(&cols[0]), vec!["3", "5"]);
        assert_eq!(column_ids(&cols[1]), vec!["4"]);
        assert_eq!(column_ids(&cols[2]), vec!["2"]);
        assert_eq!(column_ids(&cols[3]), vec!["1"]);
    }

    #[test]
    fn test_columns_respect_filter() {
        let store = store();
        let filter = TaskFilter::new("", PriorityFilter::Only(TaskPriority::High));
        let cols = columns(store.tasks().unwrap(), &filter);

        assert_eq!(column_ids(&cols[0]), vec!["5"]);
        assert!(cols[1].tasks.is_empty());
        assert!(cols[2].tasks.is_empty());
        assert_eq!(column_ids(&cols[3]), vec!["1"]);
    }

    #[test]
    fn test_drop_moves_task_between_columns() {
        let mut store = store();
        let payload = DragPayload::for_task(store.get_task("3").unwrap());

        assert!(drop_on_column(&mut store, &payload, TaskStatus::InProgress).unwrap());
        assert_eq!(store.get_task("3").unwrap().status, TaskStatus::InProgress);

        let cols = columns(store.tasks().unwrap(), &TaskFilter::default());
        assert_eq!(column_ids(&cols[0]), vec!["5"]);
        assert_eq!(column_ids(&cols[2]), vec!["2", "3"]);
    }

    #[test]
    fn test_drop_on_same_column_still_toasts() {
        let mut store = store();
        let before = store.tasks().unwrap().to_vec();
        let payload = DragPayload {
            task_id: "4".to_string(),
        };

        assert!(drop_on_column(&mut store, &payload, TaskStatus::Todo).unwrap());
        assert_eq!(store.tasks().unwrap(), before.as_slice());
        assert_eq!(store.toasts().len(), 1);
        assert_eq!(store.toasts()[0].message, "Task status updated");
    }

    #[test]
    fn test_drop_without_id_is_ignored() {
        let mut store = store();
        let payload = DragPayload {
            task_id: String::new(),
        };

        assert!(!drop_on_column(&mut store, &payload, TaskStatus::Done).unwrap());
        assert!(store.toasts().is_empty());
    }
}
