use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskboard_domain::TaskId;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "A three-column task board", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project whose board to work on
    #[arg(long, global = true, env = "TASKBOARD_PROJECT")]
    pub project: Option<String>,

    /// Acting user (defaults to the configured user)
    #[arg(long, global = true, env = "TASKBOARD_USER")]
    pub user: Option<String>,

    /// Directory holding the local mirror cache
    #[arg(long, global = true, env = "TASKBOARD_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Base URL of the remote task API
    #[arg(long, global = true, env = "TASKBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Task record file used when no API URL is set
    #[arg(long, global = true, value_name = "FILE", env = "TASKBOARD_LOCAL_API")]
    pub local_api: Option<PathBuf>,

    /// Alternate config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// Task operations
    Task(TaskCommand),
    /// Label operations
    Label(LabelCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Show the cached board
    Show {
        /// Ignore the label filter
        #[arg(long)]
        all: bool,
    },
    /// Fetch the board from the task API and refresh the cache
    Load,
}

#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task at the end of its column
    Add(TaskAddArgs),
    /// Edit task fields
    Edit(TaskEditArgs),
    /// Drop a task on another column, or on a task's row
    Move {
        #[arg(long)]
        id: TaskId,
        /// Destination column
        #[arg(long, required_unless_present = "over")]
        to: Option<String>,
        /// Task whose row the card is dropped on
        #[arg(long, conflicts_with = "to")]
        over: Option<TaskId>,
    },
    /// Move a task to a row within its own column
    Reorder {
        #[arg(long)]
        id: TaskId,
        /// Zero-based row; past the end drops on the column body
        #[arg(long)]
        index: usize,
    },
    /// Hide a task in your archive
    Archive {
        #[arg(long)]
        id: TaskId,
    },
    /// Bring an archived task back
    Restore {
        #[arg(long)]
        id: TaskId,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        id: TaskId,
    },
    /// List your archived tasks
    Archived,
}

#[derive(Args)]
pub struct TaskAddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, default_value = "todo")]
    pub status: String,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long = "type")]
    pub task_type: Option<String>,
    /// Label names or ids
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,
}

#[derive(Args)]
pub struct TaskEditArgs {
    #[arg(long)]
    pub id: TaskId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long = "type")]
    pub task_type: Option<String>,
    /// Replaces the label set; pass an empty value to clear it
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,
}

#[derive(Args)]
pub struct LabelCommand {
    #[command(subcommand)]
    pub action: LabelAction,
}

#[derive(Subcommand)]
pub enum LabelAction {
    /// Create a label
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "gray")]
        color: String,
    },
    /// Remove a label no task references
    Remove {
        /// Label name or id
        #[arg(long)]
        label: String,
    },
    /// List labels and the current selection
    List,
    /// Replace the label filter; no labels clears it
    Select {
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,
    },
}
