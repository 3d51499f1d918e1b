use std::path::Path;

use chrono::{Local, NaiveDate};
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod error;
mod interface;
mod journal;
mod tasks;

use cli::{CommandLineArgs, Request, USAGE};
use interface::{Feedback, TaskManager};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "todo_cli=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run one checked request against the tasks file.
fn execute(request: Request, tasks_file: &Path) -> error::Result<Feedback> {
    let mut manager = TaskManager::open(tasks_file)?;
    debug!(
        path = %manager.path().display(),
        count = manager.tasks().len(),
        ?request,
        "running command"
    );
    match request {
        Request::List => Ok(manager.list()),
        Request::Add(description) => manager.add(&description),
        Request::AddDated(description, due_date) => manager.add_dated(&description, due_date),
        Request::Complete(number) => manager.complete(number),
        Request::Delete(number) => manager.delete(number),
    }
}

/// Run the parsed command line and return the text to show the user.
/// Only failures the user can not fix by retyping the command are errors.
fn run(args: CommandLineArgs, today: NaiveDate) -> anyhow::Result<String> {
    let CommandLineArgs { action, tasks_file } = args;

    let action = match action {
        Some(action) => action,
        None => return Ok(USAGE.to_string()),
    };

    // Arguments are checked before the tasks file is touched.
    let request = match action.into_request(today) {
        Ok(request) => request,
        Err(e) => return Ok(e.to_string()),
    };

    // Unpack the tasks file.
    let tasks_file = match tasks_file {
        Some(path) => path,
        None => journal::default_tasks_file()?,
    };

    match execute(request, &tasks_file) {
        Ok(feedback) => Ok(feedback.to_string()),
        Err(e) if e.is_user_facing() => Ok(e.to_string()),
        Err(e) => Err(e.into()),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    // Get the command-line arguments.
    let args = CommandLineArgs::from_args();
    println!("{}", run(args, Local::now().date_naive())?);
    Ok(())
}
