//! The closed set of state mutations.
//!
//! Constructors that create entities (`add_task`, `add_project`,
//! `add_section`) stamp the generated id and creation time into the action
//! itself, so replaying a recorded action log rebuilds the same state.

use jiff::Timestamp;
use uuid::Uuid;

use crate::models::{NewTask, ProjectChanges, SectionChanges, TaskChanges, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddTask {
        id: String,
        created_at: Timestamp,
        task: NewTask,
    },
    UpdateTask {
        id: String,
        changes: TaskChanges,
    },
    DeleteTask(String),
    /// Toggles the completed flag.
    CompleteTask(String),
    AddProject {
        id: String,
        name: String,
        color: String,
    },
    UpdateProject {
        id: String,
        changes: ProjectChanges,
    },
    /// Removes the project, its sections and every task in it.
    DeleteProject(String),
    AddSection {
        id: String,
        name: String,
        project_id: String,
    },
    UpdateSection {
        id: String,
        changes: SectionChanges,
    },
    /// Removes the section and unlinks its tasks.
    DeleteSection(String),
    MoveTask {
        task_id: String,
        destination: MoveDestination,
    },
    SetCurrentView(View),
}

/// Where a task is moved to. Unset fields leave the task's membership as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveDestination {
    pub project_id: Option<String>,
    pub section_id: Option<String>,
    /// Position among the tasks sharing the destination project and section.
    pub index: Option<usize>,
}

pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

impl Action {
    pub fn add_task(task: NewTask) -> Self {
        Action::AddTask {
            id: generate_id(),
            created_at: Timestamp::now(),
            task,
        }
    }

    pub fn add_project(name: impl Into<String>, color: impl Into<String>) -> Self {
        Action::AddProject {
            id: generate_id(),
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn add_section(name: impl Into<String>, project_id: impl Into<String>) -> Self {
        Action::AddSection {
            id: generate_id(),
            name: name.into(),
            project_id: project_id.into(),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AddTask { .. } => "add_task",
            Action::UpdateTask { .. } => "update_task",
            Action::DeleteTask(_) => "delete_task",
            Action::CompleteTask(_) => "complete_task",
            Action::AddProject { .. } => "add_project",
            Action::UpdateProject { .. } => "update_project",
            Action::DeleteProject(_) => "delete_project",
            Action::AddSection { .. } => "add_section",
            Action::UpdateSection { .. } => "update_section",
            Action::DeleteSection(_) => "delete_section",
            Action::MoveTask { .. } => "move_task",
            Action::SetCurrentView(_) => "set_current_view",
        }
    }
}
