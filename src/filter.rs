//! Derives the visible task list for a view.

use std::collections::BTreeMap;

use jiff::{Zoned, civil::Date, tz::TimeZone};

use crate::models::{Task, View};

/// Tasks visible under `view`, in display order.
///
/// `now` supplies both the current instant and the local time zone that
/// decides which calendar day a due date falls on. The result borrows from
/// `tasks` and depends on nothing else, so it may be cached on
/// `(tasks, view, day of now)`.
pub fn filter_tasks<'a>(tasks: &'a [Task], view: &View, now: &Zoned) -> Vec<&'a Task> {
    match view {
        View::Inbox => tasks.iter().filter(|t| t.is_in_inbox()).collect(),
        View::Today => {
            let today = now.date();
            tasks
                .iter()
                .filter(|t| due_day(t, now.time_zone()) == Some(today))
                .collect()
        }
        View::Upcoming => {
            let instant = now.timestamp();
            let mut upcoming: Vec<&Task> = tasks
                .iter()
                .filter(|t| t.due_date.is_some_and(|due| due >= instant))
                .collect();
            upcoming.sort_by_key(|t| t.due_date);
            upcoming
        }
        View::Project { project_id } => match project_id.as_deref() {
            Some(project_id) => tasks
                .iter()
                .filter(|t| t.project_id.as_deref() == Some(project_id))
                .collect(),
            None => vec![],
        },
        View::All => tasks.iter().collect(),
    }
}

/// Calendar day a task is due on, in the given zone.
pub fn due_day(task: &Task, tz: &TimeZone) -> Option<Date> {
    task.due_date.map(|due| due.to_zoned(tz.clone()).date())
}

/// Tasks due on the same calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup<'a> {
    pub day: Date,
    pub tasks: Vec<&'a Task>,
}

impl DayGroup<'_> {
    /// ISO `YYYY-MM-DD` key of the group.
    pub fn key(&self) -> String {
        self.day.to_string()
    }
}

/// Buckets tasks by due day, earliest day first. Within a bucket the input
/// order is kept; tasks without a due date are skipped.
pub fn group_by_day<'a>(tasks: &[&'a Task], tz: &TimeZone) -> Vec<DayGroup<'a>> {
    let mut grouped: BTreeMap<Date, Vec<&'a Task>> = BTreeMap::new();

    for task in tasks {
        if let Some(day) = due_day(task, tz) {
            grouped.entry(day).or_default().push(*task);
        }
    }

    grouped
        .into_iter()
        .map(|(day, tasks)| DayGroup { day, tasks })
        .collect()
}
