//! Gantt timeline core: task grouping, row packing, time scaling and the
//! pointer state machines that edit and pan the chart, plus the egui host.

pub mod app;
pub mod config;
pub mod error;
pub mod interaction;
pub mod io;
pub mod layout;
pub mod model;
pub mod ui;

pub use config::GanttConfig;
pub use error::{Diagnostic, Error, Result, Severity};
pub use interaction::{DragController, GanttHandler, PanController, PointerEvent};
pub use layout::{layout_groups, GanttLayout};
pub use model::{check_dependencies, Task, TaskGroup, TimeScale, ViewMode, Viewport};
