//! Pure state transitions.
//!
//! `reduce` never mutates its input. Collections untouched by an action are
//! shared with the returned state, and an action addressing a missing entity
//! returns a state whose collections are the input's own.

use std::sync::Arc;

use crate::{
    actions::{Action, MoveDestination},
    models::{INBOX_PROJECT_ID, Project, Section, State, Task},
};

/// Computes the state that follows `state` once `action` is applied.
///
/// The match below has no catch-all arm: a new `Action` variant does not
/// compile until it is handled here.
pub fn reduce(state: &State, action: Action) -> State {
    match action {
        Action::AddTask {
            id,
            created_at,
            task,
        } => {
            let mut tasks = Vec::clone(&state.tasks);
            tasks.push(Task::from_new(id, created_at, task));
            with_tasks(state, tasks)
        }
        Action::UpdateTask { id, changes } => {
            update_task(state, &id, |task| task.apply(changes))
        }
        Action::DeleteTask(id) => {
            if state.get_task(&id).is_none() {
                return state.clone();
            }
            let tasks = state.tasks.iter().filter(|t| t.id != id).cloned().collect();
            with_tasks(state, tasks)
        }
        Action::CompleteTask(id) => {
            update_task(state, &id, |task| task.completed = !task.completed)
        }
        Action::AddProject { id, name, color } => {
            let mut projects = Vec::clone(&state.projects);
            projects.push(Project {
                id,
                name,
                color,
                order: state.projects.len() as i64,
                sections: vec![],
            });
            with_projects(state, projects)
        }
        Action::UpdateProject { id, changes } => {
            let Some(position) = state.projects.iter().position(|p| p.id == id) else {
                return state.clone();
            };
            let mut projects = Vec::clone(&state.projects);
            projects[position].apply(changes);
            with_projects(state, projects)
        }
        Action::DeleteProject(id) => delete_project(state, &id),
        Action::AddSection {
            id,
            name,
            project_id,
        } => {
            let Some(position) = state.projects.iter().position(|p| p.id == project_id) else {
                return state.clone();
            };
            let mut projects = Vec::clone(&state.projects);
            projects[position].sections.push(Section {
                id,
                name,
                project_id,
                order: 0,
            });
            with_projects(state, projects)
        }
        Action::UpdateSection { id, changes } => {
            let Some((project_pos, section_pos)) = locate_section(state, &id) else {
                return state.clone();
            };
            let mut projects = Vec::clone(&state.projects);
            projects[project_pos].sections[section_pos].apply(changes);
            with_projects(state, projects)
        }
        Action::DeleteSection(id) => delete_section(state, &id),
        Action::MoveTask {
            task_id,
            destination,
        } => move_task(state, &task_id, destination),
        Action::SetCurrentView(view) => State {
            current_view: view,
            ..state.clone()
        },
    }
}

fn with_tasks(state: &State, tasks: Vec<Task>) -> State {
    State {
        tasks: Arc::new(tasks),
        ..state.clone()
    }
}

fn with_projects(state: &State, projects: Vec<Project>) -> State {
    State {
        projects: Arc::new(projects),
        ..state.clone()
    }
}

fn update_task(state: &State, id: &str, change: impl FnOnce(&mut Task)) -> State {
    let Some(position) = state.tasks.iter().position(|t| t.id == id) else {
        return state.clone();
    };
    let mut tasks = Vec::clone(&state.tasks);
    change(&mut tasks[position]);
    with_tasks(state, tasks)
}

fn locate_section(state: &State, section_id: &str) -> Option<(usize, usize)> {
    state.projects.iter().enumerate().find_map(|(project_pos, project)| {
        project
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .map(|section_pos| (project_pos, section_pos))
    })
}

fn delete_project(state: &State, id: &str) -> State {
    let mut next = state.clone();
    if state.projects.iter().any(|p| p.id == id) {
        next.projects = Arc::new(
            state
                .projects
                .iter()
                .filter(|p| p.id != id)
                .cloned()
                .collect(),
        );
    }
    if state.get_tasks_for_project(id).next().is_some() {
        next.tasks = Arc::new(
            state
                .tasks
                .iter()
                .filter(|t| t.project_id.as_deref() != Some(id))
                .cloned()
                .collect(),
        );
    }
    next
}

fn delete_section(state: &State, id: &str) -> State {
    let mut next = state.clone();
    if let Some((project_pos, section_pos)) = locate_section(state, id) {
        let mut projects = Vec::clone(&state.projects);
        projects[project_pos].sections.remove(section_pos);
        next.projects = Arc::new(projects);
    }
    if state.get_tasks_for_section(id).next().is_some() {
        next.tasks = Arc::new(
            state
                .tasks
                .iter()
                .map(|t| {
                    if t.section_id.as_deref() == Some(id) {
                        Task {
                            section_id: None,
                            ..t.clone()
                        }
                    } else {
                        t.clone()
                    }
                })
                .collect(),
        );
    }
    next
}

fn move_task(state: &State, task_id: &str, destination: MoveDestination) -> State {
    let Some(position) = state.tasks.iter().position(|t| t.id == task_id) else {
        return state.clone();
    };

    let mut tasks = Vec::clone(&state.tasks);
    let mut task = tasks.remove(position);

    match (destination.project_id, destination.section_id) {
        (project_id, Some(section_id)) => {
            // A section drags its owning project along unless one was named.
            let owner = state.get_section(&section_id).map(|s| s.project_id.clone());
            task.project_id = project_id.or(owner).or(task.project_id);
            task.section_id = Some(section_id);
        }
        (Some(project_id), None) => {
            let section_elsewhere = task
                .section_id
                .as_deref()
                .and_then(|s| state.get_section(s))
                .is_some_and(|s| s.project_id != project_id);
            if section_elsewhere {
                task.section_id = None;
            }
            task.project_id = Some(project_id);
        }
        (None, None) => {}
    }

    let insert_at = match destination.index {
        None => position,
        Some(index) => scoped_insert_position(&tasks, &task, index).unwrap_or(position),
    };
    if insert_at == position && task == state.tasks[position] {
        return state.clone();
    }
    tasks.insert(insert_at.min(tasks.len()), task);
    with_tasks(state, tasks)
}

/// Index in the flat collection that puts `task` at `index` among the tasks
/// sharing its project and section. `None` when it has no such peers.
fn scoped_insert_position(tasks: &[Task], task: &Task, index: usize) -> Option<usize> {
    let project = task.project_id.as_deref().unwrap_or(INBOX_PROJECT_ID);
    let peers: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.effective_project_id() == project && t.section_id == task.section_id)
        .map(|(i, _)| i)
        .collect();

    match peers.get(index) {
        Some(&at) => Some(at),
        None => peers.last().map(|&last| last + 1),
    }
}
