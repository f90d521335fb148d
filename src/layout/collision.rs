//! Row packing for the tasks of one group.
//!
//! Tasks are split into the fewest rows such that no two tasks sharing a row
//! overlap at the view mode's granularity. This is greedy interval
//! partitioning: visit tasks by start time and reuse the row that freed up
//! earliest, opening a new row only when every row is still busy. The number
//! of rows equals the largest number of tasks live at a single instant.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::model::{CollisionBucket, Task, ViewMode};

const DAY_MS: i64 = 86_400_000;

/// One visual row of a group. Tasks are in placement order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub tasks: Vec<&'a Task>,
}

impl<'a> Row<'a> {
    pub fn ids(&self) -> Vec<&'a str> {
        self.tasks.iter().map(|t| t.id.as_str()).collect()
    }
}

/// Row index of every input task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowAssignment {
    /// Indexed like the input slice. `None` for excluded tasks.
    pub rows: Vec<Option<usize>>,
    /// Input indices in placement order.
    pub order: Vec<usize>,
    pub row_count: usize,
    /// Input indices of tasks whose end precedes their start.
    pub excluded: Vec<usize>,
}

/// The half-open span, in epoch milliseconds, that a task blocks in a row.
pub fn occupancy(task: &Task, mode: ViewMode) -> (i64, i64) {
    let start = task.start_date.timestamp_millis();
    let end = task.end_date.timestamp_millis();
    match mode.collision_bucket() {
        // Zero-length tasks still take up a sliver so they never stack invisibly.
        CollisionBucket::Exact => (start, end.max(start + 1)),
        CollisionBucket::Day => (
            start - start.rem_euclid(DAY_MS),
            end - end.rem_euclid(DAY_MS) + DAY_MS,
        ),
    }
}

/// Whether two tasks collide under `mode`.
pub fn tasks_overlap(a: &Task, b: &Task, mode: ViewMode) -> bool {
    let (a_lo, a_hi) = occupancy(a, mode);
    let (b_lo, b_hi) = occupancy(b, mode);
    a_lo < b_hi && b_lo < a_hi
}

/// Assign every well-formed task a row index.
pub fn assign_rows(tasks: &[Task], mode: ViewMode) -> RowAssignment {
    assign_rows_where(tasks, mode, |_| true)
}

/// Like [`assign_rows`], but only for input indices accepted by `keep`.
/// Rejected tasks get no row and are not reported as excluded.
pub fn assign_rows_where(
    tasks: &[Task],
    mode: ViewMode,
    keep: impl Fn(usize) -> bool,
) -> RowAssignment {
    let mut assignment = RowAssignment {
        rows: vec![None; tasks.len()],
        ..RowAssignment::default()
    };

    let mut order: Vec<usize> = Vec::with_capacity(tasks.len());
    for (idx, task) in tasks.iter().enumerate() {
        if !keep(idx) {
            continue;
        }
        if task.is_well_formed() {
            order.push(idx);
        } else {
            tracing::warn!(task = %task.id, "task ends before it starts, excluded from layout");
            assignment.excluded.push(idx);
        }
    }
    order.sort_by(|&a, &b| {
        let (ta, tb) = (&tasks[a], &tasks[b]);
        ta.start_date
            .cmp(&tb.start_date)
            .then_with(|| ta.id.cmp(&tb.id))
    });

    // Min-heap of (row end, row index); ties go to the lower row.
    let mut open: BinaryHeap<Reverse<(i64, usize)>> = BinaryHeap::new();
    for &idx in &order {
        let (lo, hi) = occupancy(&tasks[idx], mode);
        let row = match open.peek() {
            Some(&Reverse((end, row))) if end <= lo => {
                open.pop();
                row
            }
            _ => {
                assignment.row_count += 1;
                assignment.row_count - 1
            }
        };
        open.push(Reverse((hi, row)));
        assignment.rows[idx] = Some(row);
    }
    assignment.order = order;
    assignment
}

/// Split a group's tasks into non-overlapping rows.
pub fn detect_overlaps(tasks: &[Task], mode: ViewMode) -> Vec<Row<'_>> {
    let assignment = assign_rows(tasks, mode);
    let mut rows: Vec<Row<'_>> = (0..assignment.row_count)
        .map(|_| Row { tasks: Vec::new() })
        .collect();
    for &idx in &assignment.order {
        if let Some(row) = assignment.rows[idx] {
            rows[row].tasks.push(&tasks[idx]);
        }
    }
    rows
}
