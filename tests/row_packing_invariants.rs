//! Property tests for row packing and the time scale.
//!
//! 1. No two tasks sharing a row collide.
//! 2. The row count equals the largest number of tasks live at one instant.
//! 3. Packing is deterministic and independent of input order.
//! 4. Group heights stack without gaps.
//! 5. Pixel and instant conversions invert each other; snapping is idempotent.
//! 6. Moving a task in a calendar-month view keeps its duration.

use chrono::{DateTime, Duration, TimeZone, Utc};
use gantt_timeline::interaction::recording::RecordingSurface;
use gantt_timeline::interaction::{DragKind, DragOutcome, DragTarget, NoopHandler};
use gantt_timeline::layout::collision::occupancy;
use gantt_timeline::layout::{assign_rows, group_height, tasks_overlap};
use gantt_timeline::{
    layout_groups, DragController, GanttConfig, PointerEvent, Task, TaskGroup, TimeScale, ViewMode,
    Viewport,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
}

fn mode_strategy() -> impl Strategy<Value = ViewMode> {
    prop_oneof![
        Just(ViewMode::Minute),
        Just(ViewMode::Hour),
        Just(ViewMode::Day),
        Just(ViewMode::Week),
        Just(ViewMode::Month),
    ]
}

fn any_mode_strategy() -> impl Strategy<Value = ViewMode> {
    prop_oneof![
        mode_strategy(),
        Just(ViewMode::Quarter),
        Just(ViewMode::Year),
    ]
}

/// Tasks within roughly a week, minute resolution, zero lengths included.
fn tasks_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((0i64..10_000, 0i64..1_500), 1..30).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (offset, len))| {
                let start = base() + Duration::minutes(offset);
                Task::new(format!("t{i:02}"), format!("Task {i}"), start, start + Duration::minutes(len))
            })
            .collect()
    })
}

/// Largest number of occupancies covering a single instant.
fn max_live(tasks: &[Task], mode: ViewMode) -> usize {
    let spans: Vec<(i64, i64)> = tasks.iter().map(|t| occupancy(t, mode)).collect();
    spans
        .iter()
        .map(|&(lo, _)| spans.iter().filter(|&&(b_lo, b_hi)| b_lo <= lo && lo < b_hi).count())
        .max()
        .unwrap_or(0)
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Row assignment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_row_tasks_never_collide(tasks in tasks_strategy(), mode in mode_strategy()) {
        let assignment = assign_rows(&tasks, mode);
        for i in 0..tasks.len() {
            for j in (i + 1)..tasks.len() {
                if assignment.rows[i] == assignment.rows[j] {
                    prop_assert!(
                        !tasks_overlap(&tasks[i], &tasks[j], mode),
                        "{} and {} share row {:?}",
                        tasks[i].id, tasks[j].id, assignment.rows[i]
                    );
                }
            }
        }
    }

    #[test]
    fn row_count_is_peak_concurrency(tasks in tasks_strategy(), mode in mode_strategy()) {
        let assignment = assign_rows(&tasks, mode);
        prop_assert_eq!(assignment.row_count, max_live(&tasks, mode));
        prop_assert!(assignment.rows.iter().all(|r| r.is_some_and(|r| r < assignment.row_count)));
        prop_assert!(assignment.excluded.is_empty());
    }

    #[test]
    fn packing_ignores_input_order(tasks in tasks_strategy(), mode in mode_strategy()) {
        let first = assign_rows(&tasks, mode);
        prop_assert_eq!(&first, &assign_rows(&tasks, mode));

        let mut reversed = tasks.clone();
        reversed.reverse();
        let second = assign_rows(&reversed, mode);
        prop_assert_eq!(first.row_count, second.row_count);
        for (i, task) in tasks.iter().enumerate() {
            let j = tasks.len() - 1 - i;
            prop_assert_eq!(&reversed[j].id, &task.id);
            prop_assert_eq!(first.rows[i], second.rows[j]);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Group stacking
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn groups_stack_without_gaps(
        a in tasks_strategy(),
        b in tasks_strategy(),
        mode in mode_strategy(),
    ) {
        let config = GanttConfig::default();
        let viewport = Viewport::new(base() - Duration::days(1), base() + Duration::days(10), 2_000.0);
        let scale = TimeScale::new(viewport, mode).unwrap();
        let groups = vec![
            TaskGroup::new("a", "A").with_tasks(a),
            TaskGroup::new("empty", "Empty"),
            TaskGroup::new("b", "B").with_tasks(b),
        ];
        let layout = layout_groups(&groups, &scale, &config);

        prop_assert_eq!(layout.groups.len(), 3);
        let mut top = 0.0_f32;
        for g in &layout.groups {
            prop_assert!((g.top_px - top).abs() < 1e-3);
            prop_assert!((g.height_px - group_height(g.row_count, &config)).abs() < 1e-3);
            top += g.height_px;
        }
        prop_assert!((layout.total_height - top).abs() < 1e-3);
        prop_assert_eq!(layout.groups[1].height_px, config.min_group_height);

        for task_box in &layout.boxes {
            let group = layout.group(&task_box.group_id).unwrap();
            prop_assert!(task_box.top_px >= group.top_px);
            prop_assert!(task_box.top_px + task_box.height_px <= group.top_px + group.height_px + 1e-3);
            prop_assert!(task_box.width_px >= config.min_task_width_px);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Time scale
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pixel_round_trip(x in 0.0f64..5_000.0, width in 200.0f64..20_000.0, mode in mode_strategy()) {
        let viewport = Viewport::new(base(), base() + Duration::days(10), width);
        let scale = TimeScale::new(viewport, mode).unwrap();
        let x = x.min(width);
        // One millisecond of rounding is well under a thousandth of a pixel here.
        prop_assert!((scale.to_pixel(scale.to_instant_exact(x)) - x).abs() < 1e-3);
    }

    #[test]
    fn snapping_is_idempotent(minutes in 0i64..2_000_000, mode in mode_strategy()) {
        let t = base() + Duration::minutes(minutes);
        let snapped = mode.snap(t);
        prop_assert_eq!(mode.snap(snapped), snapped);
        prop_assert_eq!(mode.floor(snapped), snapped);
    }

    #[test]
    fn to_pixel_is_monotonic(a in 0i64..14_400, b in 0i64..14_400) {
        let viewport = Viewport::new(base(), base() + Duration::days(10), 1_000.0);
        let scale = TimeScale::new(viewport, ViewMode::Hour).unwrap();
        let (ta, tb) = (base() + Duration::minutes(a), base() + Duration::minutes(b));
        prop_assert_eq!(ta <= tb, scale.to_pixel(ta) <= scale.to_pixel(tb));
    }
}

proptest! {
    #[test]
    fn snapped_pixel_round_trip(
        minutes in 0i64..576_000,
        width in 400.0f64..20_000.0,
        mode in any_mode_strategy(),
    ) {
        // About 400 days, so month, quarter and year boundaries fall inside
        let viewport = Viewport::new(base(), base() + Duration::days(400), width);
        let scale = TimeScale::new(viewport, mode).unwrap();
        let t = base() + Duration::minutes(minutes);
        let x = scale.to_pixel(t);
        prop_assert_eq!(scale.to_instant_exact(x), t);
        prop_assert_eq!(scale.to_instant(x), mode.snap(t));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Calendar moves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn month_and_quarter_moves_keep_duration(
        offset in 0i64..200 * 24 * 60,
        len in 0i64..90 * 24 * 60,
        dx in -3_000.0f64..3_000.0,
        mode in prop_oneof![Just(ViewMode::Month), Just(ViewMode::Quarter)],
    ) {
        let viewport = Viewport::new(base(), base() + Duration::days(400), 4_000.0);
        let scale = TimeScale::new(viewport, mode).unwrap();
        let start = base() + Duration::minutes(offset);
        let original = Task::new("t", "T", start, start + Duration::minutes(len));
        let mut groups = vec![TaskGroup::new("g", "G").with_tasks(vec![original.clone()])];

        let mut drag = DragController::new(RecordingSurface::default(), &GanttConfig::default()).unwrap();
        let target = DragTarget::new("g", "t", DragKind::Move);
        let x0 = scale.to_pixel(start);
        let out = drag.pointer_down(&PointerEvent::mouse(x0, 0.0), &target, &groups, &scale, &mut NoopHandler);
        prop_assert_eq!(out, DragOutcome::Started(DragKind::Move));
        drag.pointer_move(&PointerEvent::mouse(x0 + dx, 0.0), &scale);
        drag.pointer_up(&PointerEvent::mouse(x0 + dx, 0.0), &mut groups, &mut NoopHandler);

        let moved = &groups[0].tasks[0];
        prop_assert_eq!(moved.duration(), original.duration());
        prop_assert!(moved.start_date == start || mode.floor(moved.start_date) == moved.start_date);
    }
}
