use jiff::{Zoned, civil::date, tz::TimeZone};
use serde_json::Value;
use tempfile::TempDir;

use taskdeck::{
    actions::MoveDestination,
    models::{CURRENT_VERSION, INBOX_PROJECT_ID, NewTask, Priority, View},
    services::{
        projects::{CreateProjectParameters, create_project},
        sections::create_section,
    },
    storage::{Storage, json::JsonFileStorage},
    store::TodoStore,
};

fn now() -> Zoned {
    date(2024, 6, 3).at(8, 30, 0, 0).to_zoned(TimeZone::UTC).unwrap()
}

#[test]
fn test_state_survives_close_and_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let now = now();

    let mut store = TodoStore::open_at(JsonFileStorage::new(path.clone()), &now);
    assert_eq!(store.state().tasks.len(), 8);

    let project = create_project(
        &mut store,
        CreateProjectParameters {
            name: "Garden".into(),
            color: None,
        },
    )
    .unwrap();
    let section = create_section(&mut store, "garden", "Spring").unwrap();
    let task_id = store.add_task(NewTask {
        content: "Plant tomatoes".into(),
        priority: Priority::P2,
        due_date: Some(now.timestamp()),
        labels: vec!["outdoor".into()],
        ..NewTask::default()
    });
    store.move_task(
        &task_id,
        MoveDestination {
            section_id: Some(section.id.clone()),
            ..MoveDestination::default()
        },
    );
    store.set_current_view(View::project(project.id.clone()));

    let before = store.state().clone();
    let storage = store.close();

    let reopened = TodoStore::open_at(storage, &now);
    assert_eq!(reopened.state(), &before);
    assert_eq!(reopened.current_view(), &View::project(project.id.clone()));

    let visible: Vec<&str> = reopened
        .filtered_tasks_at(&now)
        .iter()
        .map(|t| t.content.as_str())
        .collect();
    assert_eq!(visible, vec!["Plant tomatoes"]);

    let task = reopened.state().get_task(&task_id).unwrap();
    assert_eq!(task.project_id.as_deref(), Some(project.id.as_str()));
    assert_eq!(task.section_id.as_deref(), Some(section.id.as_str()));
}

#[test]
fn test_saved_blob_uses_camel_case_and_current_version() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let now = now();

    let mut store = TodoStore::open_at(JsonFileStorage::new(path.clone()), &now);
    store.set_current_view(View::Today);
    store.close();

    let blob: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(blob["version"], CURRENT_VERSION);
    assert_eq!(blob["currentView"]["type"], "today");
    assert_eq!(blob["tasks"][0]["projectId"], INBOX_PROJECT_ID);
    assert!(blob["tasks"][0]["createdAt"].is_string());
    assert_eq!(blob["tasks"][0]["priority"], 1);
}

#[test]
fn test_legacy_blob_is_upgraded_on_next_save() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let legacy = r##"{
        "tasks": [
            {
                "id": "a",
                "content": "Water plants",
                "completed": false,
                "projectId": "inbox",
                "priority": 3,
                "dueDate": "2024-06-03T09:00:00.000Z",
                "createdAt": "2024-06-01T09:00:00.000Z"
            }
        ],
        "projects": [
            {"id": "inbox", "name": "Inbox", "color": "#ff0000", "order": 0, "tasks": []}
        ],
        "currentView": {"type": "today"}
    }"##;
    std::fs::write(&path, legacy).unwrap();

    let mut store = TodoStore::open_at(JsonFileStorage::new(path.clone()), &now());
    assert_eq!(store.state().tasks.len(), 1);
    assert_eq!(store.current_view(), &View::Today);

    store.complete_task("a");
    let storage = store.close();

    let blob: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(blob["version"], CURRENT_VERSION);
    assert!(blob["projects"][0].get("tasks").is_none());

    let state = storage.load().unwrap().unwrap();
    assert!(state.get_task("a").unwrap().completed);
}

#[test]
fn test_unreadable_store_starts_from_seed_and_is_replaced() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut store = TodoStore::open_at(JsonFileStorage::new(path.clone()), &now());
    assert_eq!(store.state().tasks.len(), 8);

    store.set_current_view(View::Upcoming);
    let storage = store.close();

    let state = storage.load().unwrap().unwrap();
    assert_eq!(state.current_view, View::Upcoming);
    assert!(temp_dir.path().join("backups").is_dir());
}
