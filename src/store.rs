//! The explicit store handle front-ends hold.
//!
//! A `TodoStore` only exists once `open` has loaded (or seeded) the state,
//! and `close` consumes it, so there is no way to reach the state outside
//! that window. Every mutation goes through `dispatch`, which reduces and
//! then persists the new state. Saving serializes the whole state, so its
//! cost grows with the number of tasks and projects.

use std::sync::Arc;

use jiff::{Timestamp, Zoned};
use log::{debug, error, info, warn};

use crate::{
    actions::{Action, MoveDestination, generate_id},
    drag::{DragResult, reconcile},
    filter::{DayGroup, filter_tasks, group_by_day},
    models::{NewTask, ProjectChanges, SectionChanges, State, Task, TaskChanges, View},
    reducer::reduce,
    seed::seed_state,
    storage::Storage,
};

pub struct TodoStore<S: Storage> {
    state: State,
    storage: S,
}

impl<S: Storage> TodoStore<S> {
    /// Loads the last saved state, falling back to the seed data when there
    /// is none or it cannot be read.
    pub fn open(storage: S) -> Self {
        Self::open_at(storage, &Zoned::now())
    }

    /// Like [`TodoStore::open`], with `now` anchoring the seed data.
    pub fn open_at(storage: S, now: &Zoned) -> Self {
        let state = match storage.load() {
            Ok(Some(state)) => {
                info!(
                    "event=store_open source=storage tasks={} projects={}",
                    state.tasks.len(),
                    state.projects.len()
                );
                state
            }
            Ok(None) => {
                info!("event=store_open source=seed reason=empty");
                seed_state(now)
            }
            Err(e) => {
                warn!("event=store_open source=seed reason=load_failed error={e}");
                seed_state(now)
            }
        };

        Self { state, storage }
    }

    /// Ends the store's lifetime and hands the storage back.
    pub fn close(self) -> S {
        info!("event=store_close tasks={}", self.state.tasks.len());
        self.storage
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn current_view(&self) -> &View {
        &self.state.current_view
    }

    /// Reduces `action` into the state and persists the result.
    ///
    /// A failed save is logged and does not undo the in-memory change.
    pub fn dispatch(&mut self, action: Action) -> &State {
        let kind = action.kind();
        let next = reduce(&self.state, action);

        let unchanged = Arc::ptr_eq(&next.tasks, &self.state.tasks)
            && Arc::ptr_eq(&next.projects, &self.state.projects)
            && next.current_view == self.state.current_view;
        if unchanged {
            debug!("event=dispatch action={kind} changed=false");
            return &self.state;
        }

        self.state = next;
        debug!(
            "event=dispatch action={kind} changed=true tasks={} projects={}",
            self.state.tasks.len(),
            self.state.projects.len()
        );

        if let Err(e) = self.storage.save(&self.state) {
            error!("event=save_failed action={kind} error={e}");
        }

        &self.state
    }

    /// Adds a task and returns its id.
    pub fn add_task(&mut self, task: NewTask) -> String {
        let id = generate_id();
        self.dispatch(Action::AddTask {
            id: id.clone(),
            created_at: Timestamp::now(),
            task,
        });
        id
    }

    pub fn update_task(&mut self, id: &str, changes: TaskChanges) {
        self.dispatch(Action::UpdateTask {
            id: id.to_string(),
            changes,
        });
    }

    pub fn delete_task(&mut self, id: &str) {
        self.dispatch(Action::DeleteTask(id.to_string()));
    }

    pub fn complete_task(&mut self, id: &str) {
        self.dispatch(Action::CompleteTask(id.to_string()));
    }

    /// Adds a project and returns its id.
    pub fn add_project(&mut self, name: &str, color: &str) -> String {
        let id = generate_id();
        self.dispatch(Action::AddProject {
            id: id.clone(),
            name: name.to_string(),
            color: color.to_string(),
        });
        id
    }

    pub fn update_project(&mut self, id: &str, changes: ProjectChanges) {
        self.dispatch(Action::UpdateProject {
            id: id.to_string(),
            changes,
        });
    }

    pub fn delete_project(&mut self, id: &str) {
        self.dispatch(Action::DeleteProject(id.to_string()));
    }

    /// Adds a section to `project_id` and returns its id.
    pub fn add_section(&mut self, name: &str, project_id: &str) -> String {
        let id = generate_id();
        self.dispatch(Action::AddSection {
            id: id.clone(),
            name: name.to_string(),
            project_id: project_id.to_string(),
        });
        id
    }

    pub fn update_section(&mut self, id: &str, changes: SectionChanges) {
        self.dispatch(Action::UpdateSection {
            id: id.to_string(),
            changes,
        });
    }

    pub fn delete_section(&mut self, id: &str) {
        self.dispatch(Action::DeleteSection(id.to_string()));
    }

    pub fn move_task(&mut self, task_id: &str, destination: MoveDestination) {
        self.dispatch(Action::MoveTask {
            task_id: task_id.to_string(),
            destination,
        });
    }

    pub fn set_current_view(&mut self, view: View) {
        self.dispatch(Action::SetCurrentView(view));
    }

    /// Tasks visible in the current view right now.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.filtered_tasks_at(&Zoned::now())
    }

    pub fn filtered_tasks_at(&self, now: &Zoned) -> Vec<&Task> {
        filter_tasks(&self.state.tasks, &self.state.current_view, now)
    }

    /// Visible tasks bucketed by due day, as the upcoming view renders them.
    pub fn grouped_tasks_at(&self, now: &Zoned) -> Vec<DayGroup<'_>> {
        group_by_day(&self.filtered_tasks_at(now), now.time_zone())
    }

    /// Applies a finished drag gesture against the list rendered at `now`.
    ///
    /// Returns whether the tasks changed. Malformed gestures are logged
    /// and ignored.
    pub fn drag_end(&mut self, result: &DragResult, now: &Zoned) -> bool {
        let outcome = {
            let visible = self.filtered_tasks_at(now);
            reconcile(result, &visible)
        };

        match outcome {
            Ok(Some(action)) => {
                let before = Arc::clone(&self.state.tasks);
                !Arc::ptr_eq(&before, &self.dispatch(action).tasks)
            }
            Ok(None) => false,
            Err(e) => {
                warn!("event=drag_ignored error={e}");
                false
            }
        }
    }
}
