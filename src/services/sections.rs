use thiserror::Error;

use crate::{
    models::{Section, SectionChanges, State},
    services::{LookupError, projects::resolve_project, resolve_one},
    storage::Storage,
    store::TodoStore,
};

/// Finds a section by id or name, optionally limited to one project.
pub fn resolve_section<'a>(
    state: &'a State,
    project_id: Option<&str>,
    query: &str,
) -> Result<&'a Section, LookupError> {
    if let Some(section) = state.get_section(query) {
        return Ok(section);
    }

    let sections = state
        .projects
        .iter()
        .filter(move |p| project_id.is_none_or(|id| p.id == id))
        .flat_map(|p| p.sections.iter());

    resolve_one("Section", query, sections, |s| s.name.as_str())
}

#[derive(Debug, Error)]
pub enum CreateSectionError {
    #[error("Section name cannot be empty")]
    EmptyName,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Appends a section to a project, placed after the project's existing
/// sections.
pub fn create_section<S: Storage>(
    store: &mut TodoStore<S>,
    project: &str,
    name: &str,
) -> Result<Section, CreateSectionError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CreateSectionError::EmptyName);
    }

    let project = resolve_project(store.state(), project)?;
    let project_id = project.id.clone();
    let order = project.sections.len() as i64;

    let section_id = store.add_section(name, &project_id);
    // New sections start at order 0; put this one last.
    store.update_section(
        &section_id,
        SectionChanges {
            name: None,
            order: Some(order),
        },
    );

    Ok(lookup_by_id(store.state(), &section_id)?)
}

fn lookup_by_id(state: &State, section_id: &str) -> Result<Section, LookupError> {
    state
        .get_section(section_id)
        .cloned()
        .ok_or_else(|| LookupError::NotFound {
            kind: "Section",
            query: section_id.to_string(),
        })
}

#[derive(Debug, Error)]
pub enum RenameSectionError {
    #[error("Section name cannot be empty")]
    EmptyName,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub fn rename_section<S: Storage>(
    store: &mut TodoStore<S>,
    section: &str,
    new_name: &str,
) -> Result<Section, RenameSectionError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(RenameSectionError::EmptyName);
    }

    let section_id = resolve_section(store.state(), None, section)?.id.clone();
    store.update_section(
        &section_id,
        SectionChanges {
            name: Some(new_name.to_string()),
            order: None,
        },
    );

    Ok(lookup_by_id(store.state(), &section_id)?)
}

#[derive(Debug, Error)]
pub enum DeleteSectionError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub struct DeleteSectionResult {
    pub section: Section,
    pub unlinked_tasks_count: usize,
}

/// Deletes a section. Its tasks stay in the project without a section.
pub fn delete_section<S: Storage>(
    store: &mut TodoStore<S>,
    section: &str,
) -> Result<DeleteSectionResult, DeleteSectionError> {
    let section = resolve_section(store.state(), None, section)?.clone();
    let unlinked_tasks_count = store.state().get_tasks_for_section(&section.id).count();

    store.delete_section(&section.id);

    Ok(DeleteSectionResult {
        section,
        unlinked_tasks_count,
    })
}
