use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{
    project::{Project, Section},
    task::Task,
    view::View,
};

/// Current schema version
pub const CURRENT_VERSION: u32 = 2;

/// Root of the application state.
///
/// Collections sit behind `Arc` so a reduction that leaves one of them alone
/// hands the very same allocation to the next state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub version: u32,
    pub tasks: Arc<Vec<Task>>,
    pub projects: Arc<Vec<Project>>,
    #[serde(default)]
    pub current_view: View,
}

impl Default for State {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            tasks: Arc::new(vec![]),
            projects: Arc::new(vec![]),
            current_view: View::default(),
        }
    }
}

impl State {
    pub fn new(tasks: Vec<Task>, projects: Vec<Project>, current_view: View) -> Self {
        Self {
            version: CURRENT_VERSION,
            tasks: Arc::new(tasks),
            projects: Arc::new(projects),
            current_view,
        }
    }

    pub fn get_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn get_project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Finds a section in any project.
    pub fn get_section(&self, section_id: &str) -> Option<&Section> {
        self.projects
            .iter()
            .flat_map(|p| p.sections.iter())
            .find(|s| s.id == section_id)
    }

    pub fn get_tasks_for_project<'a>(
        &'a self,
        project_id: &'a str,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.project_id.as_deref() == Some(project_id))
    }

    pub fn get_tasks_for_section<'a>(
        &'a self,
        section_id: &'a str,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.section_id.as_deref() == Some(section_id))
    }

    /// Projects sorted by their `order` field.
    pub fn projects_in_order(&self) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.projects.iter().collect();
        projects.sort_by_key(|p| p.order);
        projects
    }

    /// Tasks whose section does not belong to their own project.
    pub fn section_mismatches(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| match t.section_id.as_deref() {
                None => false,
                Some(section_id) => self
                    .get_section(section_id)
                    .is_none_or(|s| s.project_id != t.effective_project_id()),
            })
            .collect()
    }
}
