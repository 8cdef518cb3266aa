pub mod project;
pub mod state;
pub mod task;
pub mod view;

pub use project::{
    DEFAULT_COLOR, INBOX_PROJECT_ID, PALETTE, Project, ProjectChanges, Section, SectionChanges,
    palette_color,
};
pub use state::{CURRENT_VERSION, State};
pub use task::{NewTask, Priority, PriorityError, Task, TaskChanges};
pub use view::View;
