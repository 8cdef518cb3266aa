use jiff::Zoned;
use thiserror::Error;

use crate::{
    actions::MoveDestination,
    models::{INBOX_PROJECT_ID, NewTask, Priority, PriorityError, Task, TaskChanges, View},
    services::{
        LookupError, parse_due_date, projects::resolve_project, resolve_one,
        sections::resolve_section,
    },
    storage::Storage,
    store::TodoStore,
};

/// Finds a task by its 1-based position in the current view or by a
/// fragment of its content.
pub fn resolve_task<'a, S: Storage>(
    store: &'a TodoStore<S>,
    reference: &str,
    now: &Zoned,
) -> Result<&'a Task, LookupError> {
    if let Ok(position) = reference.trim().parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| store.filtered_tasks_at(now).get(index).copied())
            .ok_or_else(|| LookupError::NotFound {
                kind: "Task",
                query: reference.to_string(),
            });
    }

    resolve_one("Task", reference, store.state().tasks.iter(), |t| {
        t.content.as_str()
    })
}

#[derive(Debug, Error)]
pub enum AddTaskError {
    #[error("Task content cannot be empty")]
    EmptyContent,

    #[error(transparent)]
    InvalidPriority(#[from] PriorityError),

    #[error("Invalid due date '{0}': {1}")]
    InvalidDueDate(String, String),

    #[error("Section '{section}' requires a project")]
    SectionWithoutProject { section: String },

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub struct AddTaskParameters {
    pub content: String,
    pub priority: u8,
    pub due: Option<String>,
    pub project: Option<String>,
    pub section: Option<String>,
    pub labels: Vec<String>,
}

/// Project a new task lands in when none is named: the open project, the
/// inbox when the inbox is open, and no project otherwise.
pub fn default_project_for(view: &View) -> Option<String> {
    match view {
        View::Project {
            project_id: Some(project_id),
        } => Some(project_id.clone()),
        View::Inbox => Some(INBOX_PROJECT_ID.to_string()),
        _ => None,
    }
}

pub fn add_task<S: Storage>(
    store: &mut TodoStore<S>,
    parameters: AddTaskParameters,
    now: &Zoned,
) -> Result<Task, AddTaskError> {
    let content = parameters.content.trim().to_string();
    if content.is_empty() {
        return Err(AddTaskError::EmptyContent);
    }

    let priority = Priority::try_from(parameters.priority)?;

    let due_date = parameters
        .due
        .map(|due| parse_due_date(&due, now).map_err(|e| AddTaskError::InvalidDueDate(due, e)))
        .transpose()?;

    let project_id = match &parameters.project {
        Some(name) => Some(resolve_project(store.state(), name)?.id.clone()),
        None => default_project_for(store.current_view()),
    };

    let section_id = match parameters.section {
        Some(section) => {
            let Some(project_id) = project_id.as_deref() else {
                return Err(AddTaskError::SectionWithoutProject { section });
            };
            Some(resolve_section(store.state(), Some(project_id), &section)?.id.clone())
        }
        None => None,
    };

    let task_id = store.add_task(NewTask {
        content,
        completed: false,
        project_id,
        section_id,
        priority,
        due_date,
        labels: parameters.labels,
    });

    Ok(lookup_by_id(store, &task_id)?)
}

fn lookup_by_id<S: Storage>(store: &TodoStore<S>, task_id: &str) -> Result<Task, LookupError> {
    store
        .state()
        .get_task(task_id)
        .cloned()
        .ok_or_else(|| LookupError::NotFound {
            kind: "Task",
            query: task_id.to_string(),
        })
}

#[derive(Debug, Error)]
pub enum CompleteTaskError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Toggles the completion of a task and returns its new state.
pub fn complete_task<S: Storage>(
    store: &mut TodoStore<S>,
    reference: &str,
    now: &Zoned,
) -> Result<Task, CompleteTaskError> {
    let task_id = resolve_task(store, reference, now)?.id.clone();
    store.complete_task(&task_id);
    Ok(lookup_by_id(store, &task_id)?)
}

#[derive(Debug, Error)]
pub enum DeleteTaskError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Deletes a task and returns what was removed.
pub fn delete_task<S: Storage>(
    store: &mut TodoStore<S>,
    reference: &str,
    now: &Zoned,
) -> Result<Task, DeleteTaskError> {
    let task = resolve_task(store, reference, now)?.clone();
    store.delete_task(&task.id);
    Ok(task)
}

#[derive(Debug, Error)]
pub enum UpdateTaskError {
    #[error("Nothing to change")]
    NoChanges,

    #[error("Task content cannot be empty")]
    EmptyContent,

    #[error(transparent)]
    InvalidPriority(#[from] PriorityError),

    #[error("Invalid due date '{0}': {1}")]
    InvalidDueDate(String, String),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

#[derive(Default)]
pub struct UpdateTaskParameters {
    pub reference: String,
    pub content: Option<String>,
    pub priority: Option<u8>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub labels: Option<Vec<String>>,
}

pub fn update_task<S: Storage>(
    store: &mut TodoStore<S>,
    parameters: UpdateTaskParameters,
    now: &Zoned,
) -> Result<Task, UpdateTaskError> {
    let task_id = resolve_task(store, &parameters.reference, now)?.id.clone();

    let content = match parameters.content {
        Some(content) if content.trim().is_empty() => return Err(UpdateTaskError::EmptyContent),
        Some(content) => Some(content.trim().to_string()),
        None => None,
    };

    let priority = parameters.priority.map(Priority::try_from).transpose()?;

    let due_date = if parameters.clear_due {
        Some(None)
    } else {
        parameters
            .due
            .map(|due| {
                parse_due_date(&due, now)
                    .map(Some)
                    .map_err(|e| UpdateTaskError::InvalidDueDate(due, e))
            })
            .transpose()?
    };

    let changes = TaskChanges {
        content,
        priority,
        due_date,
        labels: parameters.labels,
        ..TaskChanges::default()
    };
    if changes.is_empty() {
        return Err(UpdateTaskError::NoChanges);
    }

    store.update_task(&task_id, changes);
    Ok(lookup_by_id(store, &task_id)?)
}

#[derive(Debug, Error)]
pub enum MoveTaskError {
    #[error("A move needs a destination project or section")]
    NoDestination,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub struct MoveTaskParameters {
    pub reference: String,
    pub project: Option<String>,
    pub section: Option<String>,
    pub index: Option<usize>,
}

/// Moves a task to another project and/or section.
pub fn move_task<S: Storage>(
    store: &mut TodoStore<S>,
    parameters: MoveTaskParameters,
    now: &Zoned,
) -> Result<Task, MoveTaskError> {
    if parameters.project.is_none() && parameters.section.is_none() && parameters.index.is_none() {
        return Err(MoveTaskError::NoDestination);
    }

    let task_id = resolve_task(store, &parameters.reference, now)?.id.clone();

    let project_id = match &parameters.project {
        Some(name) => Some(resolve_project(store.state(), name)?.id.clone()),
        None => None,
    };

    let section_id = match &parameters.section {
        Some(name) => {
            let scope = project_id
                .clone()
                .or_else(|| store.state().get_task(&task_id).map(|t| t.effective_project_id().to_string()));
            Some(resolve_section(store.state(), scope.as_deref(), name)?.id.clone())
        }
        None => None,
    };

    store.move_task(
        &task_id,
        MoveDestination {
            project_id,
            section_id,
            index: parameters.index,
        },
    );
    Ok(lookup_by_id(store, &task_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{Timestamp, civil::date, tz::TimeZone};

    use crate::storage::memory::MemoryStorage;

    fn now() -> Zoned {
        date(2024, 1, 1).at(9, 0, 0, 0).to_zoned(TimeZone::UTC).unwrap()
    }

    fn store() -> TodoStore<MemoryStorage> {
        TodoStore::open_at(MemoryStorage::new(), &now())
    }

    fn parameters(content: &str) -> AddTaskParameters {
        AddTaskParameters {
            content: content.to_string(),
            priority: 4,
            due: None,
            project: None,
            section: None,
            labels: vec![],
        }
    }

    #[test]
    fn test_resolve_task_by_position_in_current_view() {
        let store = store();
        // Inbox view: tasks 1, 2, 3, 4.
        assert_eq!(resolve_task(&store, "2", &now()).unwrap().id, "2");
        assert!(resolve_task(&store, "0", &now()).is_err());
        assert!(resolve_task(&store, "9", &now()).is_err());
    }

    #[test]
    fn test_resolve_task_by_content() {
        let store = store();
        assert_eq!(resolve_task(&store, "weekly", &now()).unwrap().id, "8");
    }

    #[test]
    fn test_add_task_rejects_empty_content() {
        let mut store = store();
        let result = add_task(&mut store, parameters("   "), &now());
        assert!(matches!(result, Err(AddTaskError::EmptyContent)));
        assert_eq!(store.state().tasks.len(), 8);
    }

    #[test]
    fn test_add_task_defaults_to_open_project() {
        let mut store = store();
        store.set_current_view(View::project("work"));

        let task = add_task(&mut store, parameters("Book flights"), &now()).unwrap();
        assert_eq!(task.project_id.as_deref(), Some("work"));

        store.set_current_view(View::Today);
        let task = add_task(&mut store, parameters("Call mom"), &now()).unwrap();
        assert_eq!(task.project_id, None);
        assert!(task.is_in_inbox());
    }

    #[test]
    fn test_add_task_resolves_project_section_and_due_date() {
        let mut store = store();
        store.add_section("Next week", "work");

        let task = add_task(
            &mut store,
            AddTaskParameters {
                project: Some("wor".into()),
                section: Some("next".into()),
                due: Some("2024-01-05".into()),
                priority: 1,
                labels: vec!["travel".into()],
                ..parameters("Book flights")
            },
            &now(),
        )
        .unwrap();

        assert_eq!(task.project_id.as_deref(), Some("work"));
        assert!(task.section_id.is_some());
        assert_eq!(task.priority, Priority::P1);
        assert_eq!(
            task.due_date,
            Some("2024-01-05T00:00:00Z".parse::<Timestamp>().unwrap())
        );
        assert_eq!(task.labels, vec!["travel".to_string()]);
    }

    #[test]
    fn test_add_task_rejects_bad_priority_and_date() {
        let mut store = store();
        let bad_priority = add_task(
            &mut store,
            AddTaskParameters {
                priority: 7,
                ..parameters("x")
            },
            &now(),
        );
        assert!(matches!(bad_priority, Err(AddTaskError::InvalidPriority(_))));

        let bad_date = add_task(
            &mut store,
            AddTaskParameters {
                due: Some("someday".into()),
                ..parameters("x")
            },
            &now(),
        );
        assert!(matches!(bad_date, Err(AddTaskError::InvalidDueDate(..))));
    }

    #[test]
    fn test_complete_task_toggles() {
        let mut store = store();
        assert!(complete_task(&mut store, "presentation", &now()).unwrap().completed);
        assert!(!complete_task(&mut store, "presentation", &now()).unwrap().completed);
    }

    #[test]
    fn test_update_task_clears_due_date() {
        let mut store = store();
        let task = update_task(
            &mut store,
            UpdateTaskParameters {
                reference: "run".into(),
                clear_due: true,
                ..UpdateTaskParameters::default()
            },
            &now(),
        )
        .unwrap();
        assert_eq!(task.due_date, None);

        let nothing = update_task(
            &mut store,
            UpdateTaskParameters {
                reference: "run".into(),
                ..UpdateTaskParameters::default()
            },
            &now(),
        );
        assert!(matches!(nothing, Err(UpdateTaskError::NoChanges)));
    }

    #[test]
    fn test_move_task_into_named_section_of_its_project() {
        let mut store = store();
        let section_id = store.add_section("Reading", "personal");

        let task = move_task(
            &mut store,
            MoveTaskParameters {
                reference: "book".into(),
                project: None,
                section: Some("reading".into()),
                index: None,
            },
            &now(),
        )
        .unwrap();

        assert_eq!(task.section_id.as_deref(), Some(section_id.as_str()));
        assert_eq!(task.project_id.as_deref(), Some("personal"));
    }

    #[test]
    fn test_delete_task_returns_removed_task() {
        let mut store = store();
        let removed = delete_task(&mut store, "dark mode", &now()).unwrap();
        assert_eq!(removed.id, "4");
        assert!(store.state().get_task("4").is_none());
    }
}
