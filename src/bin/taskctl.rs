//! Command-line front end for the ranked task list.
//!
//! Usage:
//!
//! ```text
//! taskctl migrate
//! taskctl list
//! taskctl add --name <NAME> --cost <COST> --due <YYYY-MM-DD>
//! taskctl edit <ID> --name <NAME> --cost <COST> --due <YYYY-MM-DD>
//! taskctl remove <ID>
//! taskctl move <ID> <up|down>
//! taskctl reorder <ID>...
//! ```
//!
//! Results are written to stdout as JSON. Failures are written to stderr as
//! a JSON object carrying the error kind and message, and the process exits
//! with a non-zero status. The database is configured through
//! `TASKLIST_DATABASE_URL` (see [`tasklist::config`]).

use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tasklist::config::{self, ConfigError, StoreSettings};
use tasklist::task::{
    adapters::postgres::{PostgresTaskStore, apply_schema},
    domain::TaskId,
    ports::TaskStoreError,
    services::{
        CreateTaskRequest, MoveTaskRequest, ReorderTasksRequest, TaskService, TaskServiceError,
        UpdateTaskRequest,
    },
};
use tasklist::telemetry;
use thiserror::Error;

type Service = TaskService<PostgresTaskStore, DefaultClock>;

#[derive(Debug, Parser)]
#[command(name = "taskctl", version, about = "Manage a ranked task list")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the tasks table if it does not exist
    Migrate,
    /// Show every task in rank order with the total cost
    List,
    /// Append a new task to the end of the list
    Add {
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Replace the name, cost and due date of a task
    Edit {
        /// Task identifier
        id: TaskId,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Remove a task, leaving the other ranks untouched
    Remove {
        /// Task identifier
        id: TaskId,
    },
    /// Swap a task with its neighbour
    Move {
        /// Task identifier
        id: TaskId,
        /// `up` or `down`
        direction: String,
    },
    /// Assign ranks 1..N in the given order
    Reorder {
        /// Every task identifier, in the desired order
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,
    },
}

#[derive(Debug, clap::Args)]
struct TaskFields {
    /// Unique task name
    #[arg(long)]
    name: String,
    /// Cost such as `12.50` or `12,50`
    #[arg(long)]
    cost: String,
    /// Due date as `YYYY-MM-DD`, not before today
    #[arg(long = "due")]
    due_date: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Task(#[from] TaskServiceError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Task(err) => err.kind().as_str(),
            Self::Output(_) | Self::Encode(_) => "output",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = telemetry::init() {
        report(&format!("failed to initialise logging: {err}"), "configuration");
        return ExitCode::FAILURE;
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err.to_string(), err.kind());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), CliError> {
    let settings = StoreSettings::from_env()?;
    let store = PostgresTaskStore::new(config::build_pool(&settings)?);
    let service: Service = TaskService::new(Arc::new(store.clone()), Arc::new(DefaultClock));

    match command {
        Command::Migrate => {
            migrate(&store).await?;
            emit(&json!({ "migrated": true }))
        }
        Command::List => emit(&service.list().await?),
        Command::Add { fields } => {
            let request = CreateTaskRequest::new(fields.name, fields.cost, fields.due_date);
            emit(&service.create(request).await?)
        }
        Command::Edit { id, fields } => {
            let request = UpdateTaskRequest::new(id, fields.name, fields.cost, fields.due_date);
            emit(&service.update(request).await?)
        }
        Command::Remove { id } => emit(&service.delete(id).await?),
        Command::Move { id, direction } => {
            emit(&service.move_adjacent(MoveTaskRequest::new(id, direction)).await?)
        }
        Command::Reorder { ids } => {
            service.reorder(ReorderTasksRequest::new(ids)).await?;
            emit(&service.list().await?)
        }
    }
}

async fn migrate(store: &PostgresTaskStore) -> Result<(), TaskServiceError> {
    let pool = store.pool().clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
        apply_schema(&mut connection)
    })
    .await
    .map_err(TaskStoreError::persistence)??;
    Ok(())
}

fn emit(value: &impl Serialize) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn report(message: &str, kind: &str) {
    let body = json!({ "error": kind, "message": message });
    writeln!(io::stderr().lock(), "{body}").ok();
}
