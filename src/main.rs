use std::{fmt::Display, path::PathBuf};

use clap::{Parser, Subcommand};
use colored::*;
use jiff::Zoned;
use log::warn;
use slug::slugify;

use taskdeck::{
    config::Config,
    drag::{DragResult, DraggableLocation},
    logging::init_logging,
    models::{PALETTE, View},
    services::{
        LookupError,
        projects::{
            CreateProjectError, CreateProjectParameters, UpdateProjectParameters, create_project,
            delete_project, resolve_project, update_project,
        },
        sections::{create_section, delete_section, rename_section},
        tasks::{
            AddTaskParameters, MoveTaskParameters, UpdateTaskParameters, add_task, complete_task,
            delete_task, move_task, update_task,
        },
    },
    storage::json::JsonFileStorage,
    store::TodoStore,
};

mod ui;

#[derive(Parser)]
#[command(name = "taskdeck", about = "Projects, sections and tasks in your terminal")]
struct Cli {
    /// Path of the store file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tasks without a project or in the inbox
    Inbox,

    /// Show tasks due today
    Today,

    /// Show tasks due from now on, grouped by day
    Upcoming,

    /// Show every task
    All,

    /// Show the current view again
    Show,

    /// Add a new task
    Add {
        /// Task content
        content: String,

        /// Priority from 1 (highest) to 4
        #[arg(short, long, default_value_t = 4)]
        priority: u8,

        /// Due date ("today", "tomorrow" or YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,

        /// Project name or slug
        #[arg(long)]
        project: Option<String>,

        /// Section name
        #[arg(short, long)]
        section: Option<String>,

        /// Add labels (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        label: Vec<String>,
    },

    /// Toggle a task between open and done
    Done {
        /// Task number in the current view, or part of its content
        task: String,
    },

    /// Change a task's content, priority, due date or labels
    Edit {
        /// Task number in the current view, or part of its content
        task: String,

        /// New content
        #[arg(short, long)]
        content: Option<String>,

        /// New priority from 1 (highest) to 4
        #[arg(short, long)]
        priority: Option<u8>,

        /// New due date ("today", "tomorrow" or YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// Replace labels (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        label: Vec<String>,
    },

    /// Delete a task
    Delete {
        /// Task number in the current view, or part of its content
        task: String,
    },

    /// Move a task to another project, section or position
    Move {
        /// Task number in the current view, or part of its content
        task: String,

        /// Destination project name or slug
        #[arg(long)]
        project: Option<String>,

        /// Destination section name
        #[arg(short, long)]
        section: Option<String>,

        /// Position among the tasks of the destination
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Replay a drag gesture against the current view
    Drag {
        /// Source droppable, e.g. "inbox:main"
        from: String,

        /// Index of the dragged task in the rendered list
        index: usize,

        /// Destination droppable, e.g. "project:work" or "section:<id>"
        to: Option<String>,

        /// Drop position in the destination
        to_index: Option<usize>,
    },

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Manage sections
    #[command(subcommand)]
    Section(SectionCommands),
}

#[derive(Debug, Subcommand)]
enum ProjectCommands {
    /// Create a new project
    New {
        name: String,

        /// Palette colour name or hex value
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Rename a project
    Rename { name: String, new_name: String },
    /// Change the colour of a project
    Color { name: String, color: String },
    /// Delete a project with its sections and tasks
    Delete { name: String },
    /// List all projects
    List,
    /// View tasks in a project
    View { slug: String },
}

#[derive(Debug, Subcommand)]
enum SectionCommands {
    /// Create a section in a project
    New { project: String, name: String },
    /// Rename a section
    Rename { name: String, new_name: String },
    /// Delete a section, keeping its tasks in the project
    Delete { name: String },
}

fn fail(error: impl Display) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(1);
}

/// Lists the available projects after a failed project lookup.
fn fail_project_lookup(error: impl Display, store: &TodoStore<JsonFileStorage>) -> ! {
    eprintln!("Error: {}", error);
    eprintln!("\nAvailable projects:");
    for project in store.state().projects_in_order() {
        eprintln!("  - {} ({})", project.name, slugify(&project.name));
    }
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let store_path = cli
        .store
        .map(|path| std::path::absolute(&path).unwrap_or(path));
    let config = Config::default().with_overrides(store_path, cli.log_level);

    if let Err(e) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    // Create parent directory if it doesn't exist
    if let Some(parent) = config.store_path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            fail(format!("Failed to create data directory: {}", e));
        });
    }

    let mut store = TodoStore::open(JsonFileStorage::new(config.store_path.clone()));
    let now = Zoned::now();

    match cli.command {
        None | Some(Commands::Show) => ui::render_current_view(&store, &now),
        Some(Commands::Inbox) => show_view(&mut store, View::Inbox, &now),
        Some(Commands::Today) => show_view(&mut store, View::Today, &now),
        Some(Commands::Upcoming) => show_view(&mut store, View::Upcoming, &now),
        Some(Commands::All) => show_view(&mut store, View::All, &now),
        Some(Commands::Add {
            content,
            priority,
            due,
            project,
            section,
            label,
        }) => {
            let params = AddTaskParameters {
                content,
                priority,
                due,
                project,
                section,
                labels: label,
            };
            match add_task(&mut store, params, &now) {
                Ok(task) => println!("✓ Task added: {}", task.content.bold()),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Done { task }) => match complete_task(&mut store, &task, &now) {
            Ok(task) if task.completed => println!("✓ Task completed: {}", task.content.bold()),
            Ok(task) => println!("○ Task reopened: {}", task.content.bold()),
            Err(e) => fail(e),
        },
        Some(Commands::Edit {
            task,
            content,
            priority,
            due,
            clear_due,
            label,
        }) => {
            let params = UpdateTaskParameters {
                reference: task,
                content,
                priority,
                due,
                clear_due,
                labels: (!label.is_empty()).then_some(label),
            };
            match update_task(&mut store, params, &now) {
                Ok(task) => println!("✓ Task updated: {}", task.content.bold()),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Delete { task }) => match delete_task(&mut store, &task, &now) {
            Ok(task) => println!("✓ Task deleted: {}", task.content),
            Err(e) => fail(e),
        },
        Some(Commands::Move {
            task,
            project,
            section,
            index,
        }) => {
            let params = MoveTaskParameters {
                reference: task,
                project,
                section,
                index,
            };
            match move_task(&mut store, params, &now) {
                Ok(task) => println!("✓ Task moved: {}", task.content.bold()),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Drag {
            from,
            index,
            to,
            to_index,
        }) => {
            let result = DragResult {
                source: DraggableLocation {
                    droppable_id: from,
                    index,
                },
                destination: to.map(|droppable_id| DraggableLocation {
                    droppable_id,
                    index: to_index.unwrap_or(0),
                }),
            };
            if store.drag_end(&result, &now) {
                ui::render_current_view(&store, &now);
            } else {
                warn!("event=cli_drag_noop from={} index={}", result.source.droppable_id, index);
                println!("Nothing to move");
            }
        }
        Some(Commands::Project(ProjectCommands::New { name, color })) => {
            let params = CreateProjectParameters { name, color };
            match create_project(&mut store, params) {
                Ok(project) => println!(
                    "✓ Project {} created with slug {}",
                    project.name,
                    slugify(&project.name)
                ),
                Err(CreateProjectError::UnknownColor(color)) => {
                    eprintln!("Error: Unknown color '{}'", color);
                    eprintln!("\nAvailable colors:");
                    for (name, hex) in PALETTE {
                        eprintln!("  - {} ({})", name, hex);
                    }
                    std::process::exit(1);
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Project(ProjectCommands::Rename { name, new_name })) => {
            let params = UpdateProjectParameters {
                project: name,
                name: Some(new_name),
                color: None,
            };
            match update_project(&mut store, params) {
                Ok(project) => println!("✓ Project renamed to {}", project.name.bold()),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Project(ProjectCommands::Color { name, color })) => {
            let params = UpdateProjectParameters {
                project: name,
                name: None,
                color: Some(color),
            };
            match update_project(&mut store, params) {
                Ok(project) => println!(
                    "✓ Project {} is now {}",
                    project.name,
                    ui::project_swatch(&project)
                ),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Project(ProjectCommands::Delete { name })) => {
            match delete_project(&mut store, &name) {
                Ok(result) => {
                    println!("✓ Project deleted: {}", result.project.name);
                    if result.cascaded_tasks_count > 0 {
                        println!("  └─ {} task(s) also deleted", result.cascaded_tasks_count);
                    }
                }
                Err(e) => fail(e),
            }
        }
        Some(Commands::Project(ProjectCommands::List)) => {
            let projects = store.state().projects_in_order();
            println!(
                "{} ({} {})\n",
                "PROJECTS".cyan(),
                projects.len(),
                if projects.len() == 1 {
                    "project"
                } else {
                    "projects"
                }
            );

            for project in projects {
                let task_count = store
                    .state()
                    .tasks
                    .iter()
                    .filter(|t| t.effective_project_id() == project.id && !t.completed)
                    .count();

                println!(
                    "{} {} {}",
                    ui::project_swatch(project),
                    project.name.bold(),
                    slugify(&project.name).dimmed()
                );
                println!(
                    "    {} {}",
                    task_count.to_string().dimmed(),
                    if task_count == 1 { "open task" } else { "open tasks" }.dimmed()
                );
                for section in &project.sections {
                    println!("    {} {}", "§".dimmed(), section.name);
                }
                println!("    {}", "─".repeat(30).dimmed());
                println!();
            }
        }
        Some(Commands::Project(ProjectCommands::View { slug })) => {
            let project_id = match resolve_project(store.state(), &slug) {
                Ok(project) => project.id.clone(),
                Err(e @ LookupError::NotFound { .. }) => fail_project_lookup(e, &store),
                Err(e) => fail(e),
            };
            show_view(&mut store, View::project(project_id), &now);
        }
        Some(Commands::Section(SectionCommands::New { project, name })) => {
            match create_section(&mut store, &project, &name) {
                Ok(section) => println!("✓ Section {} created", section.name.bold()),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Section(SectionCommands::Rename { name, new_name })) => {
            match rename_section(&mut store, &name, &new_name) {
                Ok(section) => println!("✓ Section renamed to {}", section.name.bold()),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Section(SectionCommands::Delete { name })) => {
            match delete_section(&mut store, &name) {
                Ok(result) => {
                    println!("✓ Section deleted: {}", result.section.name);
                    if result.unlinked_tasks_count > 0 {
                        println!(
                            "  └─ {} task(s) kept in the project",
                            result.unlinked_tasks_count
                        );
                    }
                }
                Err(e) => fail(e),
            }
        }
    }

    store.close();
}

fn show_view(store: &mut TodoStore<JsonFileStorage>, view: View, now: &Zoned) {
    store.set_current_view(view);
    ui::render_current_view(store, now);
}
