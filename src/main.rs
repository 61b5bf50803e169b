mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "syllabus")]
#[command(about = "Turn course syllabi into dated tasks and calendar events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a syllabus document and print its tasks as JSON
    Resolve {
        file: PathBuf,

        /// Prefix task titles with this course name
        #[arg(long)]
        course: Option<String>,

        /// MIME type of the file (detected from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,
    },
    /// Create calendar events from a syllabus or a task JSON file
    Push {
        /// Syllabus document to resolve
        #[arg(required_unless_present = "tasks", conflicts_with = "tasks")]
        file: Option<PathBuf>,

        /// JSON file with an array of tasks
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Google account to use (defaults to `account` from config)
        #[arg(short, long)]
        account: Option<String>,
    },
    /// List upcoming calendar events
    Events {
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Manage stored Google sessions
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Manage saved tasks
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Store the token set of a signed-in account
    Import {
        account: String,

        /// OAuth account JSON, or a path to a file containing it
        json: String,
    },
}

#[derive(Subcommand)]
enum TasksCommand {
    /// Save tasks for an owner
    Save {
        owner: String,

        /// Task JSON array, or a path to a file containing it
        json: String,
    },
    /// List an owner's saved tasks
    List { owner: String },
    /// Delete one of an owner's saved tasks
    Delete { owner: String, id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { file, course, mime } => commands::resolve::run(&file, course, mime.as_deref()),
        Commands::Push { file, tasks, account } => commands::push::run(file, tasks, account).await,
        Commands::Events { account } => commands::events::run(account).await,
        Commands::Session {
            command: SessionCommand::Import { account, json },
        } => commands::session::import(&account, &json),
        Commands::Tasks { command } => match command {
            TasksCommand::Save { owner, json } => commands::tasks::save(&owner, &json),
            TasksCommand::List { owner } => commands::tasks::list(&owner),
            TasksCommand::Delete { owner, id } => commands::tasks::delete(&owner, id),
        },
    }
}
