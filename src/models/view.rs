use serde::{Deserialize, Serialize};

use crate::models::project::Project;

/// The lens through which tasks are listed. Exactly one is active at a time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum View {
    #[default]
    Inbox,
    Today,
    Upcoming,
    Project {
        #[serde(rename = "projectId", default, skip_serializing_if = "Option::is_none")]
        project_id: Option<String>,
    },
    /// Every task, unfiltered. Unknown view types load as this.
    #[serde(other)]
    All,
}

impl View {
    pub fn project(project_id: impl Into<String>) -> Self {
        View::Project {
            project_id: Some(project_id.into()),
        }
    }

    /// Heading shown above the task list.
    pub fn title(&self, projects: &[Project]) -> String {
        match self {
            View::Inbox => String::from("Inbox"),
            View::Today => String::from("Today"),
            View::Upcoming => String::from("Upcoming"),
            View::Project { project_id } => project_id
                .as_deref()
                .and_then(|id| projects.iter().find(|p| p.id == id))
                .map(|p| p.name.clone())
                .unwrap_or_else(|| String::from("Project")),
            View::All => String::from("Tasks"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_wire_format() {
        assert_eq!(
            serde_json::to_string(&View::project("work")).unwrap(),
            r#"{"type":"project","projectId":"work"}"#
        );
        assert_eq!(
            serde_json::to_string(&View::Today).unwrap(),
            r#"{"type":"today"}"#
        );
    }

    #[test]
    fn test_unknown_view_type_loads_as_all() {
        let view: View = serde_json::from_str(r#"{"type":"someday"}"#).unwrap();
        assert_eq!(view, View::All);
    }

    #[test]
    fn test_project_view_without_id() {
        let view: View = serde_json::from_str(r#"{"type":"project"}"#).unwrap();
        assert_eq!(view, View::Project { project_id: None });
        assert_eq!(view.title(&[]), "Project");
    }
}
