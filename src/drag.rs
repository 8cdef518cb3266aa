//! Translates a finished drag gesture into a state mutation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    actions::{Action, MoveDestination},
    models::Task,
};

/// A drop target, written on the wire as `"<type>:<id>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Droppable {
    Project(String),
    Section(String),
    /// Any other target, such as the main list of a view (`"today:main"`).
    View { kind: String, id: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DragError {
    #[error("Invalid droppable id '{0}', expected '<type>:<id>'")]
    InvalidDroppableId(String),

    #[error("No task at index {index} of '{droppable_id}' ({len} tasks rendered)")]
    SourceOutOfRange {
        droppable_id: String,
        index: usize,
        len: usize,
    },
}

impl FromStr for Droppable {
    type Err = DragError;

    fn from_str(droppable_id: &str) -> Result<Self, Self::Err> {
        let Some((kind, id)) = droppable_id.split_once(':') else {
            return Err(DragError::InvalidDroppableId(droppable_id.to_string()));
        };
        if kind.is_empty() {
            return Err(DragError::InvalidDroppableId(droppable_id.to_string()));
        }

        Ok(match kind {
            "project" => Droppable::Project(id.to_string()),
            "section" => Droppable::Section(id.to_string()),
            _ => Droppable::View {
                kind: kind.to_string(),
                id: id.to_string(),
            },
        })
    }
}

impl fmt::Display for Droppable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Droppable::Project(id) => write!(f, "project:{id}"),
            Droppable::Section(id) => write!(f, "section:{id}"),
            Droppable::View { kind, id } => write!(f, "{kind}:{id}"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DraggableLocation {
    pub droppable_id: String,
    pub index: usize,
}

/// Payload reported when a drag gesture ends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DragResult {
    pub source: DraggableLocation,
    /// `None` when the drop was cancelled or landed outside every target.
    pub destination: Option<DraggableLocation>,
}

/// Computes the action for a completed drag.
///
/// `visible` is the list rendered for the source view; `source.index` points
/// into it, not into the full task collection. Returns `Ok(None)` when the
/// gesture requires no mutation.
pub fn reconcile(result: &DragResult, visible: &[&Task]) -> Result<Option<Action>, DragError> {
    let Some(destination) = &result.destination else {
        return Ok(None);
    };
    if *destination == result.source {
        return Ok(None);
    }

    let source: Droppable = result.source.droppable_id.parse()?;
    let target: Droppable = destination.droppable_id.parse()?;

    let task = visible
        .get(result.source.index)
        .ok_or_else(|| DragError::SourceOutOfRange {
            droppable_id: source.to_string(),
            index: result.source.index,
            len: visible.len(),
        })?;

    // View drop indexes count positions in a filtered list, not among peers.
    let (project_id, section_id, index) = match target {
        Droppable::Project(id) => (Some(id), None, Some(destination.index)),
        Droppable::Section(id) => (None, Some(id), Some(destination.index)),
        Droppable::View { .. } => (None, None, None),
    };

    Ok(Some(Action::MoveTask {
        task_id: task.id.clone(),
        destination: MoveDestination {
            project_id,
            section_id,
            index,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    use crate::models::Priority;

    fn task(id: &str, project_id: &str) -> Task {
        Task {
            id: id.to_string(),
            content: id.to_string(),
            completed: false,
            project_id: Some(project_id.to_string()),
            section_id: None,
            priority: Priority::P4,
            due_date: None,
            created_at: Timestamp::UNIX_EPOCH,
            labels: vec![],
        }
    }

    fn location(droppable_id: &str, index: usize) -> DraggableLocation {
        DraggableLocation {
            droppable_id: droppable_id.to_string(),
            index,
        }
    }

    #[test]
    fn test_parse_droppable_ids() {
        assert_eq!(
            "project:work".parse::<Droppable>(),
            Ok(Droppable::Project("work".into()))
        );
        assert_eq!(
            "section:s-1".parse::<Droppable>(),
            Ok(Droppable::Section("s-1".into()))
        );
        assert_eq!(
            "today:main".parse::<Droppable>(),
            Ok(Droppable::View {
                kind: "today".into(),
                id: "main".into()
            })
        );
        assert_eq!(
            "inbox".parse::<Droppable>(),
            Err(DragError::InvalidDroppableId("inbox".into()))
        );
        assert!(":work".parse::<Droppable>().is_err());
    }

    #[test]
    fn test_cancelled_drag_produces_nothing() {
        let tasks = [task("t1", "inbox")];
        let visible: Vec<&Task> = tasks.iter().collect();
        let result = DragResult {
            source: location("project:inbox", 0),
            destination: None,
        };
        assert_eq!(reconcile(&result, &visible), Ok(None));
    }

    #[test]
    fn test_drop_on_same_spot_produces_nothing() {
        let tasks = [task("t1", "inbox")];
        let visible: Vec<&Task> = tasks.iter().collect();
        let result = DragResult {
            source: location("project:inbox", 0),
            destination: Some(location("project:inbox", 0)),
        };
        assert_eq!(reconcile(&result, &visible), Ok(None));
    }

    #[test]
    fn test_drag_to_project_moves_task_from_rendered_list() {
        let tasks = [task("t1", "inbox"), task("t2", "inbox")];
        let visible: Vec<&Task> = tasks.iter().collect();
        let result = DragResult {
            source: location("project:inbox", 0),
            destination: Some(location("project:work", 2)),
        };

        let action = reconcile(&result, &visible).unwrap();

        assert_eq!(
            action,
            Some(Action::MoveTask {
                task_id: "t1".into(),
                destination: MoveDestination {
                    project_id: Some("work".into()),
                    section_id: None,
                    index: Some(2),
                },
            })
        );
    }

    #[test]
    fn test_index_is_relative_to_rendered_list() {
        let tasks = [task("t1", "inbox"), task("t2", "work"), task("t3", "work")];
        // A project view rendering only the work tasks.
        let visible: Vec<&Task> = tasks.iter().filter(|t| t.project_id.as_deref() == Some("work")).collect();
        let result = DragResult {
            source: location("project:work", 1),
            destination: Some(location("section:w1", 0)),
        };

        let Some(Action::MoveTask { task_id, destination }) = reconcile(&result, &visible).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(task_id, "t3");
        assert_eq!(destination.project_id, None);
        assert_eq!(destination.section_id.as_deref(), Some("w1"));
    }

    #[test]
    fn test_drop_on_view_list_carries_no_index() {
        let tasks = [task("t1", "inbox"), task("t2", "inbox")];
        let visible: Vec<&Task> = tasks.iter().collect();
        let result = DragResult {
            source: location("upcoming:main", 1),
            destination: Some(location("upcoming:main", 0)),
        };

        let action = reconcile(&result, &visible).unwrap();
        assert_eq!(
            action,
            Some(Action::MoveTask {
                task_id: "t2".into(),
                destination: MoveDestination::default(),
            })
        );
    }

    #[test]
    fn test_source_index_out_of_range() {
        let visible: Vec<&Task> = vec![];
        let result = DragResult {
            source: location("project:inbox", 3),
            destination: Some(location("project:work", 0)),
        };
        assert!(matches!(
            reconcile(&result, &visible),
            Err(DragError::SourceOutOfRange { index: 3, len: 0, .. })
        ));
    }

    #[test]
    fn test_payload_deserializes_from_camel_case() {
        let json = r##"{
            "source": {"droppableId": "project:inbox", "index": 0},
            "destination": null
        }"##;
        let result: DragResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.source.droppable_id, "project:inbox");
        assert_eq!(result.destination, None);
    }
}
