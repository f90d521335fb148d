use chrono::{DateTime, Utc};
use egui::{Pos2, RichText, Ui};

use crate::interaction::{DragKind, DragPreview};
use crate::model::{Task, TaskGroup};
use crate::ui::theme;

/// Data shown next to the pointer for a hovered or dragged task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTooltip<'a> {
    pub task: &'a Task,
    pub position: Pos2,
    pub drag_kind: Option<DragKind>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl<'a> TaskTooltip<'a> {
    pub fn hover(task: &'a Task, position: Pos2) -> Self {
        Self {
            task,
            position,
            drag_kind: None,
            start: task.start_date,
            end: task.end_date,
        }
    }

    /// Tooltip showing the uncommitted interval of a drag.
    pub fn dragging(task: &'a Task, position: Pos2, preview: &DragPreview) -> Self {
        Self {
            task,
            position,
            drag_kind: Some(preview.kind),
            start: preview.start,
            end: preview.end,
        }
    }

    pub fn show(&self, ui: &mut Ui) {
        ui.strong(&self.task.name);
        ui.label(format!(
            "{} → {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M"),
        ));
        ui.label(format!("Progress: {:.0}%", self.task.percent));
        if let Some(kind) = self.drag_kind {
            let verb = match kind {
                DragKind::Move => "Moving",
                DragKind::ResizeStart => "Resizing start",
                DragKind::ResizeEnd => "Resizing end",
            };
            ui.label(RichText::new(verb).small().color(theme::TEXT_DIM));
        }
    }
}

pub fn show_group_tooltip(group: &TaskGroup, ui: &mut Ui) {
    ui.strong(group.display_name());
    if let Some(description) = &group.description {
        ui.label(RichText::new(description).color(theme::TEXT_SECONDARY));
    }
    ui.label(
        RichText::new(format!("{} tasks", group.tasks.len()))
            .small()
            .color(theme::TEXT_DIM),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn drag_tooltip_reports_candidate_interval() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        let task = Task::new("t", "T", t0, t0 + chrono::Duration::hours(2));
        let preview = DragPreview {
            group_id: "g".into(),
            task_id: "t".into(),
            kind: DragKind::ResizeEnd,
            start: t0,
            end: t0 + chrono::Duration::hours(5),
        };
        let tip = TaskTooltip::dragging(&task, Pos2::ZERO, &preview);
        assert_eq!(tip.end, preview.end);
        assert_eq!(tip.drag_kind, Some(DragKind::ResizeEnd));
        assert_eq!(TaskTooltip::hover(&task, Pos2::ZERO).end, task.end_date);
    }
}
