//! Pixel geometry for groups and task boxes.
//!
//! The layout is recomputed from scratch whenever tasks, the viewport, or the
//! view mode change; it owns no state beyond the values it returns.

pub mod collision;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::config::GanttConfig;
use crate::error::Diagnostic;
use crate::model::{TaskGroup, TimeScale};

pub use collision::{assign_rows, assign_rows_where, detect_overlaps, tasks_overlap, Row, RowAssignment};

/// Width of the grab zone centred on each end of a task box.
pub const HANDLE_WIDTH: f32 = 8.0;
/// Vertical gap between a task box and its row edges.
pub const BOX_INSET: f32 = 4.0;

/// Geometry handed to the task box renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBox {
    pub group_index: usize,
    pub task_index: usize,
    pub group_id: String,
    pub task_id: String,
    pub row: usize,
    pub left_px: f32,
    pub width_px: f32,
    pub top_px: f32,
    pub height_px: f32,
}

impl TaskBox {
    pub fn right_px(&self) -> f32 {
        self.left_px + self.width_px
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        let half = HANDLE_WIDTH / 2.0;
        x >= self.left_px - half
            && x <= self.right_px() + half
            && y >= self.top_px
            && y <= self.top_px + self.height_px
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupLayout {
    pub group_id: String,
    pub group_index: usize,
    pub top_px: f32,
    pub height_px: f32,
    pub row_count: usize,
}

/// Part of a task box under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxRegion {
    Body,
    StartHandle,
    EndHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    pub task_box: &'a TaskBox,
    pub region: BoxRegion,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GanttLayout {
    pub groups: Vec<GroupLayout>,
    pub boxes: Vec<TaskBox>,
    pub total_height: f32,
    pub diagnostics: Vec<Diagnostic>,
}

/// Height of a group holding `row_count` packed rows.
pub fn group_height(row_count: usize, config: &GanttConfig) -> f32 {
    if row_count == 0 {
        return config.min_group_height;
    }
    (row_count as f32 * config.row_height + config.group_padding).max(config.min_group_height)
}

/// Horizontal extent of a task, with the width floored at the configured minimum.
pub fn horizontal_extent(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    scale: &TimeScale,
    config: &GanttConfig,
) -> (f32, f32) {
    let left = scale.to_pixel(start) as f32;
    let right = scale.to_pixel(end) as f32;
    (left, (right - left).max(config.min_task_width_px))
}

/// Lay out every group top to bottom.
///
/// Groups with a repeated id and tasks with a repeated id inside a group are
/// left out and reported, as are tasks ending before they start.
pub fn layout_groups(groups: &[TaskGroup], scale: &TimeScale, config: &GanttConfig) -> GanttLayout {
    let mut layout = GanttLayout::default();
    let mut seen_groups: HashSet<&str> = HashSet::new();
    let mode = scale.view_mode();
    let mut top = 0.0_f32;

    for (group_index, group) in groups.iter().enumerate() {
        if !seen_groups.insert(group.id.as_str()) {
            layout
                .diagnostics
                .push(Diagnostic::error("duplicate group id, group skipped").in_group(&group.id));
            continue;
        }

        let mut seen_tasks: HashSet<&str> = HashSet::new();
        let mut duplicates = Vec::new();
        for (idx, task) in group.tasks.iter().enumerate() {
            if !seen_tasks.insert(task.id.as_str()) {
                duplicates.push(idx);
            }
        }

        let assignment = assign_rows_where(&group.tasks, mode, |idx| !duplicates.contains(&idx));
        for &idx in &assignment.excluded {
            layout.diagnostics.push(
                Diagnostic::warning("task ends before it starts, excluded from layout")
                    .in_group(&group.id)
                    .for_task(&group.tasks[idx].id),
            );
        }
        for &idx in &duplicates {
            layout.diagnostics.push(
                Diagnostic::warning("duplicate task id in group, task skipped")
                    .in_group(&group.id)
                    .for_task(&group.tasks[idx].id),
            );
        }

        let row_count = assignment.row_count;
        let height = group_height(row_count, config);
        for &task_index in &assignment.order {
            let Some(row) = assignment.rows[task_index] else {
                continue;
            };
            let task = &group.tasks[task_index];
            let (left_px, width_px) =
                horizontal_extent(task.start_date, task.end_date, scale, config);
            layout.boxes.push(TaskBox {
                group_index,
                task_index,
                group_id: group.id.clone(),
                task_id: task.id.clone(),
                row,
                left_px,
                width_px,
                top_px: top + config.group_padding / 2.0 + row as f32 * config.row_height + BOX_INSET,
                height_px: (config.row_height - 2.0 * BOX_INSET).max(1.0),
            });
        }

        layout.groups.push(GroupLayout {
            group_id: group.id.clone(),
            group_index,
            top_px: top,
            height_px: height,
            row_count,
        });
        top += height;
    }

    layout.total_height = top;
    layout
}

impl GanttLayout {
    pub fn task_box(&self, group_id: &str, task_id: &str) -> Option<&TaskBox> {
        self.boxes
            .iter()
            .find(|b| b.group_id == group_id && b.task_id == task_id)
    }

    pub fn group(&self, group_id: &str) -> Option<&GroupLayout> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }

    /// Task box and region under canvas point `(x, y)`.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<Hit<'_>> {
        let half = HANDLE_WIDTH / 2.0;
        // Later boxes paint on top
        let task_box = self.boxes.iter().rev().find(|b| b.contains(x, y))?;
        let to_start = (x - task_box.left_px).abs();
        let to_end = (x - task_box.right_px()).abs();
        let region = if to_start <= half && to_start <= to_end {
            BoxRegion::StartHandle
        } else if to_end <= half {
            BoxRegion::EndHandle
        } else {
            BoxRegion::Body
        };
        Some(Hit { task_box, region })
    }

    /// Move one box to a not-yet-committed extent. Rows stay as they are until
    /// the edit is committed and the layout is rebuilt.
    pub fn apply_preview(
        &mut self,
        group_id: &str,
        task_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        scale: &TimeScale,
        config: &GanttConfig,
    ) {
        if let Some(b) = self
            .boxes
            .iter_mut()
            .find(|b| b.group_id == group_id && b.task_id == task_id)
        {
            let (left, width) = horizontal_extent(start, end, scale, config);
            b.left_px = left;
            b.width_px = width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, ViewMode, Viewport};
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    fn scale() -> TimeScale {
        // 100 px per hour
        TimeScale::new(Viewport::new(at(0, 0), at(10, 0), 1000.0), ViewMode::Hour).unwrap()
    }

    fn groups() -> Vec<TaskGroup> {
        vec![
            TaskGroup::new("g1", "Crew A").with_tasks(vec![
                Task::new("a", "A", at(1, 0), at(2, 0)),
                Task::new("b", "B", at(1, 30), at(2, 30)),
            ]),
            TaskGroup::new("g2", "Crew B"),
            TaskGroup::new("g3", "Crew C").with_tasks(vec![Task::new("c", "C", at(3, 0), at(3, 6))]),
        ]
    }

    #[test]
    fn stacks_groups_with_row_based_heights() {
        let config = GanttConfig::default();
        let layout = layout_groups(&groups(), &scale(), &config);
        let heights: Vec<f32> = layout.groups.iter().map(|g| g.height_px).collect();
        // 2 rows * 40 + 20, empty group at minimum, 1 row * 40 + 20 floored at 60
        assert_eq!(heights, vec![100.0, 60.0, 60.0]);
        assert_eq!(layout.groups[2].top_px, 160.0);
        assert_eq!(layout.total_height, 220.0);
        assert_eq!(layout.groups[1].row_count, 0);
    }

    #[test]
    fn task_boxes_follow_rows_and_scale() {
        let config = GanttConfig::default();
        let layout = layout_groups(&groups(), &scale(), &config);
        let b = layout.task_box("g1", "b").unwrap();
        assert_eq!(b.row, 1);
        assert_eq!(b.left_px, 150.0);
        assert_eq!(b.width_px, 100.0);
        assert_eq!(b.top_px, 10.0 + 40.0 + BOX_INSET);
        // 6 minutes is 10 px, floored to the minimum width
        assert_eq!(layout.task_box("g3", "c").unwrap().width_px, 20.0);
    }

    #[test]
    fn hit_test_distinguishes_handles() {
        let config = GanttConfig::default();
        let layout = layout_groups(&groups(), &scale(), &config);
        let y = layout.task_box("g1", "a").unwrap().top_px + 5.0;
        assert_eq!(layout.hit_test(101.0, y).unwrap().region, BoxRegion::StartHandle);
        assert_eq!(layout.hit_test(150.0, y).unwrap().region, BoxRegion::Body);
        assert_eq!(layout.hit_test(198.0, y).unwrap().region, BoxRegion::EndHandle);
        assert_eq!(layout.hit_test(150.0, y).unwrap().task_box.task_id, "a");
        assert!(layout.hit_test(500.0, y).is_none());
    }

    #[test]
    fn reports_malformed_and_duplicate_entries() {
        let mut gs = groups();
        gs[0].tasks.push(Task::new("a", "dup", at(5, 0), at(6, 0)));
        gs[0].tasks.push(Task::new("z", "backwards", at(6, 0), at(5, 0)));
        gs.push(TaskGroup::new("g1", "again"));
        let layout = layout_groups(&gs, &scale(), &GanttConfig::default());
        assert_eq!(layout.diagnostics.len(), 3);
        assert_eq!(layout.groups.len(), 3);
        assert_eq!(layout.boxes.iter().filter(|b| b.group_id == "g1").count(), 2);
    }

    #[test]
    fn preview_moves_only_geometry() {
        let config = GanttConfig::default();
        let mut layout = layout_groups(&groups(), &scale(), &config);
        layout.apply_preview("g1", "a", at(4, 0), at(5, 0), &scale(), &config);
        let a = layout.task_box("g1", "a").unwrap();
        assert_eq!((a.left_px, a.width_px, a.row), (400.0, 100.0, 0));
    }
}
