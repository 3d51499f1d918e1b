use chrono::{Datelike, NaiveDate};

/// A single entry of the to-do list, saved as one line of the tasks file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Plain {
        description: String,
        completed: bool,
    },
    Dated {
        description: String,
        completed: bool,
        due_date: NaiveDate,
    },
}

impl Task {
    pub fn plain(description: impl Into<String>) -> Self {
        Task::Plain {
            description: description.into(),
            completed: false,
        }
    }

    pub fn dated(description: impl Into<String>, due_date: NaiveDate) -> Self {
        Task::Dated {
            description: description.into(),
            completed: false,
            due_date,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Task::Plain { description, .. } | Task::Dated { description, .. } => description,
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            Task::Plain { completed, .. } | Task::Dated { completed, .. } => *completed,
        }
    }

    #[cfg(test)]
    pub fn due_date(&self) -> Option<NaiveDate> {
        match self {
            Task::Plain { .. } => None,
            Task::Dated { due_date, .. } => Some(*due_date),
        }
    }

    /// Mark the task as done. A completed task never goes back to pending.
    pub fn complete(&mut self) {
        match self {
            Task::Plain { completed, .. } | Task::Dated { completed, .. } => *completed = true,
        }
    }

    /// Return the line this task is saved as.
    pub fn render(&self) -> String {
        let prefix = if self.is_completed() { "[X] " } else { "[ ] " };
        match self {
            Task::Plain { description, .. } => format!("{}{}", prefix, description),
            Task::Dated {
                description,
                due_date,
                ..
            } => format!("{}{} (due: {})", prefix, description, fmt_date(*due_date)),
        }
    }
}

/// Fixed width date: 4 digit year, zero padded month and day.
pub fn fmt_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}
