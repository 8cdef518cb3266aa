use slug::slugify;
use thiserror::Error;

use crate::{
    models::{DEFAULT_COLOR, Project, ProjectChanges, State, palette_color},
    services::{LookupError, resolve_one},
    storage::Storage,
    store::TodoStore,
};

/// Finds a project by id, slug, or a fragment of its name.
pub fn resolve_project<'a>(state: &'a State, query: &str) -> Result<&'a Project, LookupError> {
    if let Some(project) = state
        .projects
        .iter()
        .find(|p| p.id == query || slugify(&p.name) == query)
    {
        return Ok(project);
    }

    resolve_one("Project", query, state.projects.iter(), |p| p.name.as_str())
}

#[derive(Debug, Error)]
pub enum CreateProjectError {
    #[error("Project name cannot be empty")]
    EmptyName,

    #[error("Project with name '{}' already exists", .0)]
    ProjectAlreadyExists(String),

    #[error("Unknown color '{0}'")]
    UnknownColor(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub struct CreateProjectParameters {
    pub name: String,
    pub color: Option<String>,
}

pub fn create_project<S: Storage>(
    store: &mut TodoStore<S>,
    parameters: CreateProjectParameters,
) -> Result<Project, CreateProjectError> {
    let name = parameters.name.trim().to_string();
    if name.is_empty() {
        return Err(CreateProjectError::EmptyName);
    }

    let name_slug = slugify(&name);
    if store
        .state()
        .projects
        .iter()
        .any(|p| slugify(&p.name) == name_slug)
    {
        return Err(CreateProjectError::ProjectAlreadyExists(name));
    }

    let color = match parameters.color {
        Some(color) => palette_color(&color).ok_or(CreateProjectError::UnknownColor(color))?,
        None => DEFAULT_COLOR,
    };

    let project_id = store.add_project(&name, color);

    Ok(lookup_by_id(store.state(), &project_id)?)
}

fn lookup_by_id(state: &State, project_id: &str) -> Result<Project, LookupError> {
    state
        .get_project(project_id)
        .cloned()
        .ok_or_else(|| LookupError::NotFound {
            kind: "Project",
            query: project_id.to_string(),
        })
}

#[derive(Debug, Error)]
pub enum UpdateProjectError {
    #[error("Project name cannot be empty")]
    EmptyName,

    #[error("Unknown color '{0}'")]
    UnknownColor(String),

    #[error("Nothing to change")]
    NoChanges,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub struct UpdateProjectParameters {
    pub project: String,
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Renames and/or recolours a project.
pub fn update_project<S: Storage>(
    store: &mut TodoStore<S>,
    parameters: UpdateProjectParameters,
) -> Result<Project, UpdateProjectError> {
    let project_id = resolve_project(store.state(), &parameters.project)?.id.clone();

    let name = match parameters.name {
        Some(name) if name.trim().is_empty() => return Err(UpdateProjectError::EmptyName),
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };

    let color = match parameters.color {
        Some(color) => Some(
            palette_color(&color)
                .ok_or(UpdateProjectError::UnknownColor(color))?
                .to_string(),
        ),
        None => None,
    };

    if name.is_none() && color.is_none() {
        return Err(UpdateProjectError::NoChanges);
    }

    store.update_project(
        &project_id,
        ProjectChanges {
            name,
            color,
            order: None,
        },
    );

    Ok(lookup_by_id(store.state(), &project_id)?)
}

#[derive(Debug, Error)]
pub enum DeleteProjectError {
    #[error("The inbox cannot be deleted")]
    InboxNotDeletable,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub struct DeleteProjectResult {
    pub project: Project,
    pub cascaded_tasks_count: usize,
}

/// Deletes a project together with its sections and tasks.
pub fn delete_project<S: Storage>(
    store: &mut TodoStore<S>,
    query: &str,
) -> Result<DeleteProjectResult, DeleteProjectError> {
    let project = resolve_project(store.state(), query)?.clone();
    if project.is_inbox() {
        return Err(DeleteProjectError::InboxNotDeletable);
    }

    let cascaded_tasks_count = store.state().get_tasks_for_project(&project.id).count();

    store.delete_project(&project.id);

    Ok(DeleteProjectResult {
        project,
        cascaded_tasks_count,
    })
}
