use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use std::path::PathBuf;
use taskflow::stats::RECENT_ACTIVITY_LEN;
use taskflow::{
    BoardStats, Config, DragPayload, PriorityFilter, Task, TaskDraft, TaskFilter, TaskPatch, TaskPriority, TaskStatus,
    TaskStore, Toast, ToastKind, User, columns, drop_on_column, recent_tasks,
};

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "TaskFlow - task board with a dashboard summary")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/taskflow/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the persisted tasks (overrides the config file)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks, optionally filtered
    List {
        /// Case-insensitive text matched against title and description
        #[arg(long, default_value = "")]
        search: String,

        /// low, medium, high, urgent or all
        #[arg(long, default_value = "all")]
        priority: PriorityFilter,
    },

    /// Show the board columns
    Board {
        #[arg(long, default_value = "")]
        search: String,

        #[arg(long, default_value = "all")]
        priority: PriorityFilter,
    },

    /// Dashboard statistics and recent activity
    Stats {
        /// Number of recent tasks to show
        #[arg(long, default_value_t = RECENT_ACTIVITY_LEN)]
        recent: usize,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single task
    Show { id: String },

    /// Create a task
    Add {
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long, default_value = "todo")]
        status: TaskStatus,

        #[arg(short, long, default_value = "medium")]
        priority: TaskPriority,

        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Assignee display name
        #[arg(long, default_value = "Current User")]
        assignee: String,
    },

    /// Change fields of a task
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<TaskStatus>,

        #[arg(short, long)]
        priority: Option<TaskPriority>,

        #[arg(long)]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,

        /// Assignee display name
        #[arg(long)]
        assignee: Option<String>,

        /// Remove the assignee
        #[arg(long, conflicts_with = "assignee")]
        unassign: bool,
    },

    /// Move a task to another column
    Move { id: String, status: TaskStatus },

    /// Delete a task
    Delete { id: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.store_path {
        config.store_path = path;
    }

    // Open store
    let mut store = TaskStore::open(config.open_blob_store()?);

    match cli.command {
        Commands::List { search, priority } => {
            let filter = TaskFilter::new(search, priority);
            for task in filter.apply(loaded(&store)?) {
                print_task_line(task);
            }
        }
        Commands::Board { search, priority } => {
            let filter = TaskFilter::new(search, priority);
            for column in columns(loaded(&store)?, &filter) {
                println!("{} ({})", column.title.bold(), column.tasks.len());
                if column.tasks.is_empty() {
                    println!("  {}", "Drop items here".dimmed());
                }
                for task in column.tasks {
                    print!("  ");
                    print_task_line(task);
                }
                println!();
            }
        }
        Commands::Stats { recent, json } => {
            let tasks = loaded(&store)?;
            let stats = BoardStats::compute(tasks, Local::now().date_naive());
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }
            print_stats(&stats);

            println!("\n{}", "Recent Activity".bold());
            for task in recent_tasks(tasks, recent) {
                let who = task.assignee.as_ref().map(|u| u.name.as_str()).unwrap_or("User");
                println!(
                    "  {} created task {}  {}",
                    who.bold(),
                    task.title.cyan(),
                    task.created_at.with_timezone(&Local).format("%b %-d, %Y").to_string().dimmed()
                );
            }
        }
        Commands::Show { id } => {
            let task = store.get_task(&id).ok_or_else(|| eyre!("No task with id {}", id))?;
            print_task_detail(task);
        }
        Commands::Add {
            title,
            description,
            status,
            priority,
            due,
            assignee,
        } => {
            if title.trim().is_empty() {
                return Err(eyre!("Title cannot be empty"));
            }
            let id = store.add_task(TaskDraft {
                title,
                description,
                status,
                priority,
                due_date: due,
                assignee: Some(cli_user(assignee)),
            })?;
            println!("{}", id);
        }
        Commands::Update {
            id,
            title,
            description,
            status,
            priority,
            due,
            clear_due,
            assignee,
            unassign,
        } => {
            let patch = TaskPatch {
                title,
                description: description.map(Some),
                status,
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                assignee: if unassign {
                    Some(None)
                } else {
                    assignee.map(|name| Some(cli_user(name)))
                },
            };
            if patch.is_empty() {
                return Err(eyre!("Nothing to update"));
            }
            store.update_task(&id, patch)?;
        }
        Commands::Move { id, status } => {
            drop_on_column(&mut store, &DragPayload { task_id: id }, status)?;
        }
        Commands::Delete { id } => {
            store.delete_task(&id)?;
        }
    }

    for toast in store.toasts() {
        print_toast(&toast);
    }

    Ok(())
}

/// Assignees named on the command line all map to the local user
fn cli_user(name: String) -> User {
    User {
        id: "u1".to_string(),
        name,
        avatar: None,
    }
}

fn loaded(store: &TaskStore) -> Result<&[Task]> {
    store.tasks().ok_or_else(|| eyre!("Task store is not loaded"))
}

fn status_label(status: TaskStatus) -> colored::ColoredString {
    match status {
        TaskStatus::Backlog => status.title().normal(),
        TaskStatus::Todo => status.title().blue(),
        TaskStatus::InProgress => status.title().purple(),
        TaskStatus::Done => status.title().green(),
    }
}

fn priority_label(priority: TaskPriority) -> colored::ColoredString {
    match priority {
        TaskPriority::Low => priority.label().dimmed(),
        TaskPriority::Medium => priority.label().yellow(),
        TaskPriority::High => priority.label().red(),
        TaskPriority::Urgent => priority.label().red().bold(),
    }
}

fn print_task_line(task: &Task) {
    let due = task
        .due_date
        .map(|d| format!(" due {}", d.format("%b %-d")))
        .unwrap_or_default();
    println!(
        "{} [{}] [{}] {}{}",
        task.id.dimmed(),
        status_label(task.status),
        priority_label(task.priority),
        task.title,
        due.dimmed()
    );
}

fn print_task_detail(task: &Task) {
    println!("{}", task.title.bold());
    println!("  id:        {}", task.id);
    println!("  status:    {}", status_label(task.status));
    println!("  priority:  {}", priority_label(task.priority));
    if let Some(description) = &task.description {
        println!("  details:   {}", description);
    }
    if let Some(due) = task.due_date {
        println!("  due:       {}", due);
    }
    if let Some(assignee) = &task.assignee {
        println!("  assignee:  {}", assignee.name);
    }
    println!("  created:   {}", task.created_at.to_rfc3339());
}

fn print_stats(stats: &BoardStats) {
    println!("{:<12} {}", "Total Tasks".bold(), stats.total);
    println!("{:<12} {}", "In Progress".bold(), stats.in_progress);
    println!("{:<12} {}", "Completed".bold(), stats.done);
    println!("{:<12} {}", "Overdue".bold(), stats.overdue.to_string().red());
    println!();
    println!("{} {}%", "Task Completion".bold(), stats.completion_rate);
    println!(
        "Backlog {}  To Do {}  Done {}",
        stats.count(TaskStatus::Backlog),
        stats.count(TaskStatus::Todo),
        stats.count(TaskStatus::Done)
    );
}

fn print_toast(toast: &Toast) {
    match toast.kind {
        ToastKind::Success => println!("{} {}", "✓".green(), toast.message),
        ToastKind::Error => println!("{} {}", "✗".red(), toast.message),
        ToastKind::Info => println!("{} {}", "i".blue(), toast.message),
    }
}
