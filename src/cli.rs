use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use humantime::parse_duration;
use structopt::StructOpt;

use crate::error::{Result, TodoError};

pub const USAGE: &str = "Usage: todo <command> [arguments]\n\
                         Commands: list, add \"task\", done <number>, delete <number>";

const MISSING_DESCRIPTION: &str = "Please enter a description for the task to add.";
const MISSING_DONE_NUMBER: &str = "Please enter the number of the task to complete.";
const MISSING_DELETE_NUMBER: &str = "Please enter the number of the task to delete.";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
// Anything past this lands after year 9999 and can not be saved anyway.
const MAX_DAYS_AHEAD: u64 = 3_660_000;

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Show every task with its number.
    List,
    /// Add a new task.
    Add {
        /// The task description text.
        description: Vec<String>,

        /// Due date (YYYY-MM-DD).
        #[structopt(long)]
        due: Option<String>,

        /// Due date relative to today, e.g. "3days" or "2weeks".
        #[structopt(long = "in")]
        due_in: Option<String>,
    },
    /// Mark a task as done.
    Done {
        #[structopt(allow_hyphen_values = true)]
        number: Option<String>,
    },
    /// Remove a task by number.
    Delete {
        #[structopt(allow_hyphen_values = true)]
        number: Option<String>,
    },
    #[structopt(external_subcommand)]
    Other(Vec<String>),
}

#[derive(Debug, StructOpt)]
#[structopt(name = "todo", about = "A minimal to-do list kept in a text file.")]
pub struct CommandLineArgs {
    #[structopt(subcommand)]
    pub action: Option<Command>,

    /// Use a different tasks file. Defaults to tasks.txt in the user data
    /// directory; a tasks.txt in the working directory is not picked up.
    #[structopt(parse(from_os_str), short = "f", long = "file")]
    pub tasks_file: Option<PathBuf>,
}

/// A command with its arguments checked, ready to run against the task list.
#[derive(Debug, PartialEq, Eq)]
pub enum Request {
    List,
    Add(String),
    AddDated(String, NaiveDate),
    Complete(usize),
    Delete(usize),
}

impl Command {
    /// Validate the raw arguments. `today` anchors relative due dates.
    pub fn into_request(self, today: NaiveDate) -> Result<Request> {
        match self {
            Command::List => Ok(Request::List),
            Command::Add {
                description,
                due,
                due_in,
            } => {
                let description = description.join(" ");
                if description.trim().is_empty() {
                    return Err(TodoError::MissingArgument(MISSING_DESCRIPTION));
                }
                match (due, due_in) {
                    (None, None) => Ok(Request::Add(description)),
                    (Some(due), None) => Ok(Request::AddDated(description, parse_date(&due)?)),
                    (None, Some(due_in)) => Ok(Request::AddDated(
                        description,
                        date_in(today, &due_in)?,
                    )),
                    (Some(_), Some(_)) => Err(TodoError::invalid_input(
                        "use either --due or --in, not both",
                    )),
                }
            }
            Command::Done { number } => {
                let number = number.ok_or(TodoError::MissingArgument(MISSING_DONE_NUMBER))?;
                Ok(Request::Complete(parse_number(&number)?))
            }
            Command::Delete { number } => {
                let number = number.ok_or(TodoError::MissingArgument(MISSING_DELETE_NUMBER))?;
                Ok(Request::Delete(parse_number(&number)?))
            }
            Command::Other(args) => Err(TodoError::UnknownCommand(
                args.into_iter().next().unwrap_or_default(),
            )),
        }
    }
}

fn parse_number(text: &str) -> Result<usize> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| TodoError::invalid_input(format!("'{}' is not a task number", text)))
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| TodoError::invalid_input(format!("'{}' is not a date (YYYY-MM-DD)", text)))
}

/// Today plus a human readable duration, counted in whole days.
fn date_in(today: NaiveDate, text: &str) -> Result<NaiveDate> {
    let invalid = || TodoError::invalid_input(format!("'{}' is not a usable duration", text));
    let days = parse_duration(text).map_err(|_| invalid())?.as_secs() / SECONDS_PER_DAY;
    if days > MAX_DAYS_AHEAD {
        return Err(invalid());
    }
    today
        .checked_add_signed(Duration::days(days as i64))
        .ok_or_else(invalid)
}
