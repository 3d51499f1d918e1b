use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::anyhow;
use chrono::NaiveDate;
use directories::ProjectDirs;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Result, TodoError};
use crate::tasks::Task;

/// Width of the `[X] ` / `[ ] ` marker every line starts with.
const PREFIX_LEN: usize = 4;
const DONE_MARKER: &str = "[X]";

fn dated_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(.+?) \(due: ([0-9]{4}-[0-9]{2}-[0-9]{2})\)$")
            .expect("dated task pattern is valid")
    })
}

/// Location of the tasks file when none is given on the command line.
pub fn default_tasks_file() -> anyhow::Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "todo-cli", "todo")
        .ok_or_else(|| anyhow!("Failed to find a data directory for the tasks file."))?;
    Ok(dirs.data_dir().join("tasks.txt"))
}

/// Parse one saved line into a task. `line_no` is only used in error messages.
pub fn parse_line(line: &str, line_no: usize) -> Result<Task> {
    let completed = line.starts_with(DONE_MARKER);

    let content = match line.char_indices().nth(PREFIX_LEN) {
        Some((idx, _)) => &line[idx..],
        None if line.chars().count() == PREFIX_LEN => "",
        None => {
            return Err(TodoError::invalid_input(format!(
                "line {}: '{}' is too short to be a task",
                line_no, line
            )))
        }
    };

    let mut task = match dated_pattern().captures(content) {
        Some(caps) => {
            let date_text = &caps[2];
            let due_date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|_| {
                TodoError::invalid_input(format!(
                    "line {}: '{}' is not a valid due date",
                    line_no, date_text
                ))
            })?;
            Task::dated(&caps[1], due_date)
        }
        None => Task::plain(content),
    };

    if task.description().is_empty() {
        return Err(TodoError::invalid_input(format!(
            "line {}: task has no description",
            line_no
        )));
    }

    if completed {
        task.complete();
    }
    Ok(task)
}

/// Read every task saved at `path`. A file that does not exist (or can not be
/// opened) is an empty list.
pub fn load(path: &Path) -> Result<Vec<Task>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no tasks file yet, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to open tasks file, starting empty");
            return Ok(Vec::new());
        }
    };

    let mut tasks = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| match source.kind() {
            ErrorKind::InvalidData => TodoError::invalid_input(format!(
                "line {}: not valid UTF-8 text",
                idx + 1
            )),
            _ => TodoError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.trim().is_empty() {
            continue;
        }
        tasks.push(parse_line(line, idx + 1)?);
    }

    debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
    Ok(tasks)
}

/// Overwrite the file at `path` with one rendered line per task.
pub fn save(path: &Path, tasks: &[Task]) -> Result<()> {
    write_all(path, tasks).map_err(|source| {
        warn!(path = %path.display(), error = %source, "failed to save tasks");
        TodoError::Save {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}

fn write_all(path: &Path, tasks: &[Task]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    for task in tasks {
        writeln!(writer, "{}", task.render())?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_plain_and_dated_lines() {
        let plain = parse_line("[ ] Buy milk", 1).unwrap();
        assert_eq!(plain, Task::plain("Buy milk"));

        let dated = parse_line("[X] Finish report (due: 2024-03-15)", 2).unwrap();
        assert_eq!(dated.description(), "Finish report");
        assert_eq!(dated.due_date(), Some(date(2024, 3, 15)));
        assert!(dated.is_completed());
    }

    #[test]
    fn unknown_marker_is_pending() {
        let task = parse_line("[x] lowercase marker", 1).unwrap();
        assert!(!task.is_completed());
        assert_eq!(task.description(), "lowercase marker");
    }

    #[test]
    fn due_suffix_must_end_the_line() {
        let task = parse_line("[ ] Call (due: 2024-03-15) later", 1).unwrap();
        assert_eq!(task.due_date(), None);
        assert_eq!(task.description(), "Call (due: 2024-03-15) later");
    }

    #[test]
    fn render_then_parse_gives_back_the_task() {
        let mut done = Task::dated("Ship it", date(5, 3, 7));
        done.complete();
        let tasks = vec![Task::plain("Ünïcödé desc"), done, Task::plain("a (due: soon)")];
        for task in tasks {
            assert_eq!(parse_line(&task.render(), 1).unwrap(), task);
        }
    }

    #[test]
    fn invalid_date_is_invalid_input() {
        let err = parse_line("[ ] Taxes (due: 2024-02-30)", 3).unwrap_err();
        assert!(matches!(err, TodoError::InvalidInput(ref msg) if msg.contains("line 3")));
    }

    #[test]
    fn short_or_empty_lines_are_rejected() {
        assert!(matches!(
            parse_line("[X]", 1),
            Err(TodoError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_line("[ ] ", 1),
            Err(TodoError::InvalidInput(_))
        ));
    }

    #[test]
    fn only_ascii_digits_make_a_due_date() {
        let task = parse_line("[ ] Wide (due: ２０２４-０３-１５)", 1).unwrap();
        assert_eq!(task.due_date(), None);
        assert_eq!(task.description(), "Wide (due: ２０２４-０３-１５)");
    }

    #[test]
    fn non_utf8_file_is_invalid_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        fs::write(&path, b"[ ] fine\n[ ] caf\xe9\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(err.is_user_facing());
        assert!(matches!(err, TodoError::InvalidInput(ref msg) if msg.contains("line 2")));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let tasks = load(&dir.path().join("nope.txt")).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn load_skips_blank_lines_and_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        fs::write(&path, "[ ] one\r\n\r\n   \n[X] two (due: 2024-01-02)\r\n").unwrap();

        let tasks = load(&path).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].render(), "[ ] one");
        assert_eq!(tasks[1].render(), "[X] two (due: 2024-01-02)");
    }

    #[test]
    fn save_then_load_keeps_order_and_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.txt");
        let mut second = Task::dated("B", date(2030, 12, 1));
        second.complete();
        let tasks = vec![Task::plain("A"), second, Task::plain("A")];

        save(&path, &tasks).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[ ] A\n[X] B (due: 2030-12-01)\n[ ] A\n"
        );
        assert_eq!(load(&path).unwrap(), tasks);
    }

    #[test]
    fn save_truncates_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        save(&path, &[Task::plain("A"), Task::plain("B")]).unwrap();
        save(&path, &[Task::plain("C")]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[ ] C\n");
    }

    #[test]
    fn save_to_a_directory_fails() {
        let dir = tempdir().unwrap();
        let err = save(dir.path(), &[Task::plain("A")]).unwrap_err();
        assert!(matches!(err, TodoError::Save { .. }));
    }
}
