use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::project::INBOX_PROJECT_ID;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier of the task
    pub id: String,
    /// Text of the task
    pub content: String,
    /// Whether the task has been checked off
    pub completed: bool,
    /// Owning project. `None` and `Some("inbox")` both mean the inbox
    pub project_id: Option<String>,
    /// Section inside the owning project, if any
    pub section_id: Option<String>,
    /// Priority of the task, 1 is the highest
    pub priority: Priority,
    /// When the task is due
    pub due_date: Option<Timestamp>,
    /// When the task was created, never changes afterwards
    pub created_at: Timestamp,
    /// Free-form labels, in the order the user gave them
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Task {
    /// Builds a task from the fields supplied by an `AddTask` action.
    pub fn from_new(id: String, created_at: Timestamp, new: NewTask) -> Self {
        Self {
            id,
            content: new.content,
            completed: new.completed,
            project_id: new.project_id,
            section_id: new.section_id,
            priority: new.priority,
            due_date: new.due_date,
            created_at,
            labels: new.labels,
        }
    }

    pub fn is_in_inbox(&self) -> bool {
        match self.project_id.as_deref() {
            None => true,
            Some(project_id) => project_id == INBOX_PROJECT_ID,
        }
    }

    /// Project the task belongs to, with `None` folded into the inbox id.
    pub fn effective_project_id(&self) -> &str {
        self.project_id.as_deref().unwrap_or(INBOX_PROJECT_ID)
    }

    /// Merges the set fields of `changes` into the task.
    pub fn apply(&mut self, changes: TaskChanges) {
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        if let Some(project_id) = changes.project_id {
            self.project_id = project_id;
        }
        if let Some(section_id) = changes.section_id {
            self.section_id = section_id;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(labels) = changes.labels {
            self.labels = labels;
        }
    }
}

/// Task priority, serialized as its number (1 = highest, 4 = lowest).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    P1,
    P2,
    P3,
    #[default]
    P4,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriorityError {
    #[error("Priority must be between 1 and 4, got {0}")]
    OutOfRange(u8),
}

impl Priority {
    pub fn as_number(self) -> u8 {
        match self {
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
            Priority::P4 => 4,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = PriorityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::P1),
            2 => Ok(Priority::P2),
            3 => Ok(Priority::P3),
            4 => Ok(Priority::P4),
            other => Err(PriorityError::OutOfRange(other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        priority.as_number()
    }
}

/// Fields a caller supplies when adding a task. Id and creation time are
/// stamped by the action creator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub content: String,
    pub completed: bool,
    pub project_id: Option<String>,
    pub section_id: Option<String>,
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub labels: Vec<String>,
}

/// Partial update for a task. Outer `None` leaves the field untouched; for
/// nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskChanges {
    pub content: Option<String>,
    pub completed: Option<bool>,
    pub project_id: Option<Option<String>>,
    pub section_id: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<Timestamp>>,
    pub labels: Option<Vec<String>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        *self == TaskChanges::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task::from_new(
            String::from("t1"),
            Timestamp::UNIX_EPOCH,
            NewTask {
                content: String::from("Write report"),
                project_id: Some(String::from("work")),
                section_id: Some(String::from("s1")),
                due_date: Some(Timestamp::UNIX_EPOCH),
                ..NewTask::default()
            },
        )
    }

    #[test]
    fn test_priority_accepts_only_one_to_four() {
        assert_eq!(Priority::try_from(1), Ok(Priority::P1));
        assert_eq!(Priority::try_from(4), Ok(Priority::P4));
        assert_eq!(Priority::try_from(0), Err(PriorityError::OutOfRange(0)));
        assert_eq!(Priority::try_from(5), Err(PriorityError::OutOfRange(5)));
    }

    #[test]
    fn test_priority_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Priority::P2).unwrap(), "2");
        assert!(serde_json::from_str::<Priority>("9").is_err());
    }

    #[test]
    fn test_null_and_inbox_project_both_mean_inbox() {
        let mut task = task();
        assert!(!task.is_in_inbox());

        task.project_id = None;
        assert!(task.is_in_inbox());
        assert_eq!(task.effective_project_id(), "inbox");

        task.project_id = Some(String::from("inbox"));
        assert!(task.is_in_inbox());
    }

    #[test]
    fn test_apply_changes_only_touches_set_fields() {
        let mut task = task();
        task.apply(TaskChanges {
            content: Some(String::from("Rewrite report")),
            due_date: Some(None),
            ..TaskChanges::default()
        });

        assert_eq!(task.content, "Rewrite report");
        assert_eq!(task.due_date, None);
        assert_eq!(task.section_id.as_deref(), Some("s1"));
        assert_eq!(task.project_id.as_deref(), Some("work"));
        assert_eq!(task.created_at, Timestamp::UNIX_EPOCH);
    }
}
