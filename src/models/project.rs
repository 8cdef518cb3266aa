use serde::{Deserialize, Serialize};

/// Id of the project that always exists and holds tasks without a project.
pub const INBOX_PROJECT_ID: &str = "inbox";

/// Colour given to projects created without an explicit choice.
pub const DEFAULT_COLOR: &str = "#b8256f";

/// Named colours a project may use, as `(name, hex)`.
pub const PALETTE: &[(&str, &str)] = &[
    ("Berry Red", "#b8256f"),
    ("Red", "#db4035"),
    ("Orange", "#ff9933"),
    ("Yellow", "#fad000"),
    ("Olive Green", "#afb83b"),
    ("Lime Green", "#7ecc49"),
    ("Green", "#299438"),
    ("Mint Green", "#6accbc"),
    ("Teal", "#158fad"),
    ("Sky Blue", "#14aaf5"),
    ("Light Blue", "#96c3eb"),
    ("Blue", "#4073ff"),
    ("Grape", "#884dff"),
    ("Violet", "#af38eb"),
    ("Lavender", "#eb96eb"),
    ("Magenta", "#e05194"),
    ("Salmon", "#ff8d85"),
    ("Charcoal", "#808080"),
    ("Grey", "#b8b8b8"),
    ("Taupe", "#ccac93"),
];

/// Looks up a palette colour by name (case-insensitive) or by hex value.
pub fn palette_color(name_or_hex: &str) -> Option<&'static str> {
    PALETTE
        .iter()
        .find(|(name, hex)| {
            name.eq_ignore_ascii_case(name_or_hex) || hex.eq_ignore_ascii_case(name_or_hex)
        })
        .map(|(_, hex)| *hex)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Stable identifier of the project
    pub id: String,
    /// Name of the project
    pub name: String,
    /// Hex colour of the project
    pub color: String,
    /// Display position among projects
    pub order: i64,
    /// Sections of the project, in display order
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Project {
    pub fn is_inbox(&self) -> bool {
        self.id == INBOX_PROJECT_ID
    }

    pub fn get_section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn apply(&mut self, changes: ProjectChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(color) = changes.color {
            self.color = color;
        }
        if let Some(order) = changes.order {
            self.order = order;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    /// Project owning this section
    pub project_id: String,
    pub order: i64,
}

impl Section {
    pub fn apply(&mut self, changes: SectionChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(order) = changes.order {
            self.order = order;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub color: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionChanges {
    pub name: Option<String>,
    pub order: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup_by_name_or_hex() {
        assert_eq!(palette_color("sky blue"), Some("#14aaf5"));
        assert_eq!(palette_color("#FF9933"), Some("#ff9933"));
        assert_eq!(palette_color("ultraviolet"), None);
    }

    #[test]
    fn test_legacy_nested_tasks_are_ignored_on_load() {
        let json = r##"{
            "id": "work",
            "name": "Work",
            "color": "#14aaf5",
            "order": 2,
            "sections": [{"id": "s1", "name": "Later", "projectId": "work", "order": 0, "tasks": []}],
            "tasks": []
        }"##;

        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.sections.len(), 1);
        assert_eq!(project.get_section("s1").unwrap().name, "Later");
    }
}
