pub mod gantt_chart;
pub mod style;
pub mod surface;
pub mod task_list;
pub mod theme;
pub mod toolbar;
pub mod tooltip;

pub use gantt_chart::{show_gantt_chart, ChartInteraction, ChartState};
pub use style::{DefaultColorResolver, StyleRequest, TaskColorResolver, TaskStyle};
pub use surface::{EguiPointerSurface, EguiScrollSurface};
pub use tooltip::TaskTooltip;
