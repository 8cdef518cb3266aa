use colored::*;
use jiff::{ToSpan, Zoned, civil::Date};

use taskdeck::{
    filter::{due_day, group_by_day},
    models::{Priority, Project, Section, State, Task, View},
    storage::Storage,
    store::TodoStore,
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(task: &Task, is_overdue: bool) -> ColoredString {
    if task.completed {
        "✓".dimmed()
    } else if is_overdue {
        "●".red()
    } else {
        "○".normal()
    }
}

/// Flag shown after the content; P4 has none.
pub fn get_priority_flag(priority: Priority) -> ColoredString {
    match priority {
        Priority::P1 => "!!!".red().bold(),
        Priority::P2 => "!!".yellow(),
        Priority::P3 => "!".blue(),
        Priority::P4 => "".normal(),
    }
}

/// Build the context string for a task: `Project / Section`, or just the
/// project name. Inbox tasks have no context.
pub fn get_task_context(task: &Task, state: &State) -> Option<String> {
    let project = state
        .get_project(task.effective_project_id())
        .filter(|p| !p.is_inbox())?;

    match task.section_id.as_deref().and_then(|id| project.get_section(id)) {
        Some(section) => Some(format!("{} / {}", project.name, section.name)),
        None => Some(project.name.clone()),
    }
}

pub fn is_overdue(task: &Task, now: &Zoned) -> bool {
    !task.completed && due_day(task, now.time_zone()).is_some_and(|day| day < now.date())
}

/// Format a day relative to `today` (e.g., "Today", "Tomorrow", "Monday, Feb 17")
pub fn format_date_header(day: Date, today: Date) -> String {
    if day == today {
        "Today".to_string()
    } else if day == today.saturating_add(1.day()) {
        "Tomorrow".to_string()
    } else {
        day.strftime("%A, %b %d").to_string()
    }
}

/// Short due label for a task line (e.g., "Today", "Mar 05")
fn format_due_label(day: Date, today: Date) -> String {
    if day == today {
        "Today".to_string()
    } else if day == today.saturating_add(1.day()) {
        "Tomorrow".to_string()
    } else {
        day.strftime("%b %d").to_string()
    }
}

/// Parses `#rrggbb` into its channels.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Coloured dot for a project.
pub fn project_swatch(project: &Project) -> ColoredString {
    match hex_to_rgb(&project.color) {
        Some((r, g, b)) => "●".truecolor(r, g, b),
        None => "●".normal(),
    }
}

/// Render a single task line with position, glyph, content, and
/// right-aligned due date and context
pub fn render_task_line(position: usize, task: &Task, state: &State, now: &Zoned) {
    let terminal_width = get_terminal_width();
    let overdue = is_overdue(task, now);

    let id_str = format!("{:>3}", position);
    let glyph = get_status_glyph(task, overdue);
    let flag = get_priority_flag(task.priority);

    let left_section = format!("  {}  {}  {}", id_str, glyph, task.content);
    let styled_left = if task.completed {
        left_section.dimmed()
    } else {
        left_section.bold()
    };
    let (styled_left, left_visible_len) = if flag.is_empty() {
        (
            styled_left.to_string(),
            format!("  {}  {}  {}", id_str, " ", task.content).chars().count(),
        )
    } else {
        (
            format!("{} {}", styled_left, flag),
            format!("  {}  {}  {} {}", id_str, " ", task.content, &*flag)
                .chars()
                .count(),
        )
    };

    let mut right_parts = vec![];
    if let Some(day) = due_day(task, now.time_zone()) {
        right_parts.push(format_due_label(day, now.date()));
    }
    if let Some(context) = get_task_context(task, state) {
        right_parts.push(context);
    }
    if !task.labels.is_empty() {
        right_parts.push(
            task.labels
                .iter()
                .map(|label| format!("#{label}"))
                .collect::<Vec<_>>()
                .join(" "),
        );
    }
    let right_section = right_parts.join("  ·  ");

    if right_section.is_empty() {
        println!("{}", styled_left);
        return;
    }

    let total_content = left_visible_len + right_section.chars().count();
    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        let right_styled = if overdue {
            right_section.red()
        } else {
            right_section.dimmed()
        };
        println!("{}{}{}", styled_left, " ".repeat(padding), right_styled);
    } else {
        // Not enough space for right alignment, just print normally
        println!("{}", styled_left);
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, task_word);
}

/// Render a section header (e.g., a section name, "Tomorrow")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Splits a project's tasks by section, in section order. Tasks whose
/// section is not one of the project's own land with the unsectioned ones.
pub fn group_by_section<'a, 'p>(
    tasks: &[&'a Task],
    project: &'p Project,
) -> (Vec<&'a Task>, Vec<(&'p Section, Vec<&'a Task>)>) {
    let mut sections: Vec<&Section> = project.sections.iter().collect();
    sections.sort_by_key(|s| s.order);

    let unsectioned = tasks
        .iter()
        .copied()
        .filter(|t| t.section_id.as_deref().and_then(|id| project.get_section(id)).is_none())
        .collect();

    let grouped = sections
        .into_iter()
        .map(|section| {
            let in_section = tasks
                .iter()
                .copied()
                .filter(|t| t.section_id.as_deref() == Some(section.id.as_str()))
                .collect();
            (section, in_section)
        })
        .collect();

    (unsectioned, grouped)
}

/// Render the store's current view. Line numbers are the positions task
/// references resolve against.
pub fn render_current_view<S: Storage>(store: &TodoStore<S>, now: &Zoned) {
    let state = store.state();
    let view = store.current_view();
    let visible = store.filtered_tasks_at(now);
    let title = view.title(&state.projects);

    if visible.is_empty() {
        println!("No tasks in {}", title);
        return;
    }

    render_view_header(&title, visible.len());

    let position_of = |task: &Task| {
        visible
            .iter()
            .position(|t| t.id == task.id)
            .map_or(0, |index| index + 1)
    };

    match view {
        View::Upcoming => {
            for group in group_by_day(&visible, now.time_zone()) {
                render_section_header(&format_date_header(group.day, now.date()));
                for task in group.tasks {
                    render_task_line(position_of(task), task, state, now);
                }
            }
        }
        View::Project {
            project_id: Some(project_id),
        } => {
            let Some(project) = state.get_project(project_id) else {
                for task in &visible {
                    render_task_line(position_of(task), task, state, now);
                }
                return;
            };

            let (unsectioned, sections) = group_by_section(&visible, project);
            for task in unsectioned {
                render_task_line(position_of(task), task, state, now);
            }
            for (section, tasks) in sections {
                render_section_header(&section.name);
                if tasks.is_empty() {
                    println!("  {}", "No tasks".dimmed());
                }
                for task in tasks {
                    render_task_line(position_of(task), task, state, now);
                }
            }
        }
        _ => {
            for (index, task) in visible.iter().enumerate() {
                render_task_line(index + 1, task, state, now);
            }
        }
    }
}
