use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, TodoError};
use crate::journal;
use crate::tasks::{fmt_date, Task};

/// What a command has to tell the user once it succeeded.
#[derive(Debug, PartialEq, Eq)]
pub enum Feedback {
    Added {
        description: String,
    },
    AddedDated {
        description: String,
        due_date: NaiveDate,
    },
    /// Rendered lines, in list order.
    Listing(Vec<String>),
    Completed(usize),
    Deleted {
        description: String,
    },
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Added { description } => write!(f, "'{}' added.", description),
            Feedback::AddedDated {
                description,
                due_date,
            } => write!(f, "'{}' added (due: {}).", description, fmt_date(*due_date)),
            Feedback::Listing(lines) => {
                write!(f, "[To-Do List]")?;
                if lines.is_empty() {
                    return write!(f, "\nNo tasks.");
                }
                for (idx, line) in lines.iter().enumerate() {
                    write!(f, "\n{}. {}", idx + 1, line)?;
                }
                Ok(())
            }
            Feedback::Completed(number) => write!(f, "Task {} marked as done.", number),
            Feedback::Deleted { description } => write!(f, "'{}' deleted.", description),
        }
    }
}

/// The in-memory task list, backed by a tasks file. The list is read once
/// when the manager is opened and the whole file is rewritten after every
/// change.
#[derive(Debug)]
pub struct TaskManager {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskManager {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = journal::load(&path)?;
        Ok(TaskManager { path, tasks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn add(&mut self, description: &str) -> Result<Feedback> {
        check_description(description)?;
        let task = Task::plain(description);
        // A trailing due suffix with a bad date would make the file unreadable.
        if journal::parse_line(&task.render(), 0).is_err() {
            return Err(TodoError::invalid_input(format!(
                "'{}' ends with a due date that is not a valid date",
                description
            )));
        }
        self.tasks.push(task);
        self.save()?;
        Ok(Feedback::Added {
            description: description.to_string(),
        })
    }

    pub fn add_dated(&mut self, description: &str, due_date: NaiveDate) -> Result<Feedback> {
        check_description(description)?;
        // The file format only holds 4 digit years.
        if !(0..=9999).contains(&due_date.year()) {
            return Err(TodoError::invalid_input(format!(
                "due date year {} is out of range",
                due_date.year()
            )));
        }
        self.tasks.push(Task::dated(description, due_date));
        self.save()?;
        Ok(Feedback::AddedDated {
            description: description.to_string(),
            due_date,
        })
    }

    pub fn list(&self) -> Feedback {
        Feedback::Listing(self.tasks.iter().map(Task::render).collect())
    }

    /// Mark the task with the given (1-based) number as done.
    pub fn complete(&mut self, number: usize) -> Result<Feedback> {
        let idx = self.index_of(number)?;
        self.tasks[idx].complete();
        self.save()?;
        Ok(Feedback::Completed(number))
    }

    /// Remove the task with the given (1-based) number. Later tasks move up
    /// one position.
    pub fn delete(&mut self, number: usize) -> Result<Feedback> {
        let idx = self.index_of(number)?;
        let removed = self.tasks.remove(idx);
        self.save()?;
        Ok(Feedback::Deleted {
            description: removed.description().to_string(),
        })
    }

    fn index_of(&self, number: usize) -> Result<usize> {
        if number >= 1 && number <= self.tasks.len() {
            Ok(number - 1)
        } else {
            Err(TodoError::InvalidNumber(number))
        }
    }

    fn save(&self) -> Result<()> {
        journal::save(&self.path, &self.tasks)
    }
}

fn check_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(TodoError::invalid_input("task description is empty"));
    }
    if description.contains(['\n', '\r']) {
        return Err(TodoError::invalid_input(
            "task description can not span several lines",
        ));
    }
    Ok(())
}
