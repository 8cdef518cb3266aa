use serde_json::Value;

use crate::storage::StorageError;

type MigrationFn = fn(Value) -> Result<Value, StorageError>;

fn get_migrations() -> Vec<MigrationFn> {
    vec![migrate_v1_to_v2]
}

/// Returns 1 if the version field is missing: blobs written before
/// versioning are v1.
pub fn detect_version(value: &Value) -> Result<u32, String> {
    if !value.is_object() {
        return Err(String::from("top-level value is not an object"));
    }

    match value.get("version") {
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| format!("version field is not a valid number: {v}")),
        None => Ok(1),
    }
}

/// Migrations are applied sequentially: v1→v2→v3→...→target
pub fn apply_migrations(
    mut data: Value,
    from_version: u32,
    to_version: u32,
) -> Result<Value, StorageError> {
    if from_version == to_version {
        return Ok(data);
    }

    if from_version > to_version {
        return Err(StorageError::FutureVersion(from_version));
    }

    if from_version == 0 {
        return Err(StorageError::UnsupportedVersion(0));
    }

    let migrations = get_migrations();

    for version in from_version..to_version {
        let migration_idx = (version - 1) as usize; // v1→v2 is at index 0

        if migration_idx >= migrations.len() {
            return Err(StorageError::UnsupportedVersion(version));
        }

        data = migrations[migration_idx](data)?;
    }

    Ok(data)
}

/// v1 carried never-populated `tasks` arrays on every project and section.
fn migrate_v1_to_v2(mut value: Value) -> Result<Value, StorageError> {
    if let Some(obj) = value.as_object_mut() {
        obj.insert("version".to_string(), Value::from(2));

        if let Some(projects) = obj.get_mut("projects").and_then(|p| p.as_array_mut()) {
            for project in projects {
                let Some(project_obj) = project.as_object_mut() else {
                    continue;
                };
                project_obj.remove("tasks");

                if let Some(sections) = project_obj
                    .get_mut("sections")
                    .and_then(|s| s.as_array_mut())
                {
                    for section in sections.iter_mut().filter_map(|s| s.as_object_mut()) {
                        section.remove("tasks");
                    }
                }
            }
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_version_with_version_field() {
        let json = serde_json::json!({"version": 2, "tasks": [], "projects": []});
        assert_eq!(detect_version(&json).unwrap(), 2);
    }

    #[test]
    fn test_detect_version_without_version_field() {
        let json = serde_json::json!({"tasks": [], "projects": []});
        assert_eq!(detect_version(&json).unwrap(), 1);
    }

    #[test]
    fn test_detect_version_rejects_garbage() {
        assert!(detect_version(&serde_json::json!({"version": "two"})).is_err());
        assert!(detect_version(&serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_apply_migrations_same_version() {
        let data = serde_json::json!({"version": 2});
        let result = apply_migrations(data.clone(), 2, 2).unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn test_apply_migrations_future_version() {
        let data = serde_json::json!({"version": 5});
        let result = apply_migrations(data, 5, 2);
        assert!(matches!(result, Err(StorageError::FutureVersion(5))));
    }

    #[test]
    fn test_v1_to_v2_strips_legacy_task_arrays() {
        let v1 = serde_json::json!({
            "tasks": [],
            "projects": [{
                "id": "work",
                "name": "Work",
                "color": "#14aaf5",
                "order": 1,
                "tasks": [],
                "sections": [{"id": "s1", "name": "Soon", "projectId": "work", "order": 0, "tasks": []}]
            }],
            "currentView": {"type": "inbox"}
        });

        let v2 = apply_migrations(v1, 1, 2).unwrap();

        assert_eq!(v2["version"], 2);
        assert!(v2["projects"][0].get("tasks").is_none());
        assert!(v2["projects"][0]["sections"][0].get("tasks").is_none());
        assert_eq!(v2["projects"][0]["sections"][0]["name"], "Soon");
    }
}
