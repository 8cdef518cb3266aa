//! Sample data used when nothing has been saved yet.

use jiff::{Timestamp, ToSpan, Zoned};

use crate::models::{INBOX_PROJECT_ID, Priority, Project, State, Task, View};

fn days_from(now: &Zoned, days: i64) -> Timestamp {
    now.saturating_add(days.days()).timestamp()
}

fn project(id: &str, name: &str, color: &str, order: i64) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        order,
        sections: vec![],
    }
}

fn sample(
    id: &str,
    content: &str,
    project_id: &str,
    priority: Priority,
    due_date: Option<Timestamp>,
    created_at: Timestamp,
) -> Task {
    Task {
        id: id.to_string(),
        content: content.to_string(),
        completed: false,
        project_id: Some(project_id.to_string()),
        section_id: None,
        priority,
        due_date,
        created_at,
        labels: vec![],
    }
}

/// The default projects: only the inbox.
pub fn default_projects() -> Vec<Project> {
    vec![project(INBOX_PROJECT_ID, "Inbox", "#ff0000", 0)]
}

/// Inbox, Personal and Work projects with a handful of tasks due around `now`.
pub fn seed_state(now: &Zoned) -> State {
    let created = now.timestamp();
    let today = Some(created);
    let tomorrow = Some(days_from(now, 1));

    let mut projects = default_projects();
    projects.push(project("personal", "Personal", "#ff9933", 1));
    projects.push(project("work", "Work", "#14aaf5", 2));

    let mut architecture = sample(
        "3",
        "Set up project architecture",
        INBOX_PROJECT_ID,
        Priority::P3,
        None,
        days_from(now, -1),
    );
    architecture.completed = true;

    let tasks = vec![
        sample("1", "Complete task board project", INBOX_PROJECT_ID, Priority::P1, tomorrow, created),
        sample("2", "Learn about drag and drop", INBOX_PROJECT_ID, Priority::P2, today, created),
        architecture,
        sample("4", "Add dark mode support", INBOX_PROJECT_ID, Priority::P4, Some(days_from(now, 3)), created),
        sample("5", "Go for a run", "personal", Priority::P2, today, created),
        sample("6", "Read a book", "personal", Priority::P3, Some(days_from(now, 2)), created),
        sample("7", "Prepare presentation", "work", Priority::P1, tomorrow, created),
        sample("8", "Send weekly report", "work", Priority::P2, Some(days_from(now, 3)), created),
    ];

    State::new(tasks, projects, View::Inbox)
}
