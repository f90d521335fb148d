//! Live move and resize of task boxes.
//!
//! `Idle -> Hovering -> Dragging(kind) -> Idle`. While dragging, every pointer
//! move produces a snapped candidate interval that the host draws right away;
//! nothing is written to the task set until pointer-up. Only one session
//! exists at a time and only its pointer can move or end it.

use chrono::{DateTime, Duration, Utc};

use super::surface::{PointerGrab, PointerSurface};
use super::{GanttHandler, PointerButton, PointerEvent, PointerId};
use crate::config::GanttConfig;
use crate::error::{Error, Result};
use crate::layout::{assign_rows, BoxRegion};
use crate::model::task::{find_group, find_task};
use crate::model::{Task, TaskGroup, TimeScale, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    ResizeStart,
    ResizeEnd,
}

impl DragKind {
    pub fn label(self) -> &'static str {
        match self {
            DragKind::Move => "move",
            DragKind::ResizeStart => "resize-start",
            DragKind::ResizeEnd => "resize-end",
        }
    }
}

impl From<BoxRegion> for DragKind {
    fn from(region: BoxRegion) -> Self {
        match region {
            BoxRegion::Body => DragKind::Move,
            BoxRegion::StartHandle => DragKind::ResizeStart,
            BoxRegion::EndHandle => DragKind::ResizeEnd,
        }
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragTarget {
    pub group_id: String,
    pub task_id: String,
    pub kind: DragKind,
}

impl DragTarget {
    pub fn new(group_id: impl Into<String>, task_id: impl Into<String>, kind: DragKind) -> Self {
        Self {
            group_id: group_id.into(),
            task_id: task_id.into(),
            kind,
        }
    }
}

/// In-progress edit of one task.
#[derive(Debug)]
pub struct DragSession {
    pub pointer_id: PointerId,
    pub group_id: String,
    pub task_id: String,
    pub kind: DragKind,
    /// Button that started the session; only its release ends it.
    pub button: PointerButton,
    pub origin_x: f64,
    pub original: (DateTime<Utc>, DateTime<Utc>),
    pub candidate: (DateTime<Utc>, DateTime<Utc>),
    pub view_mode: ViewMode,
    grab: PointerGrab,
}

#[derive(Debug)]
pub enum DragState {
    Idle,
    Hovering { group_id: String, task_id: String },
    Dragging(DragSession),
}

/// Uncommitted geometry for the dragged task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPreview {
    pub group_id: String,
    pub task_id: String,
    pub kind: DragKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    pub group_id: String,
    pub task: Task,
    /// Rows in the owning group after the commit.
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Ignored,
    Started(DragKind),
    Updated {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Unchanged,
    Committed(CommitReport),
    /// The handler vetoed the edit; the task keeps its original instants.
    Rejected,
    Cancelled,
    SelectionChanged {
        task_id: String,
        selected: bool,
    },
    RightClicked,
}

fn shift(t: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    t.checked_add_signed(d).unwrap_or(t)
}

/// Candidate interval after dragging `dx` pixels from the original.
///
/// Moves snap the start and carry the end by the same amount, so the duration
/// never changes. Resizes snap the moving edge and clamp it so the task stays
/// at least `min_duration` long. A negative `min_duration` counts as zero.
pub fn candidate_for(
    kind: DragKind,
    original: (DateTime<Utc>, DateTime<Utc>),
    dx: f64,
    scale: &TimeScale,
    min_duration: Duration,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let (start, end) = original;
    let min_duration = min_duration.max(Duration::zero());
    let delta = scale.pixels_to_duration(dx);
    match kind {
        DragKind::Move => {
            let new_start = scale.snap(shift(start, delta));
            (new_start, shift(end, new_start - start))
        }
        DragKind::ResizeStart => {
            let latest = shift(end, -min_duration);
            (scale.snap(shift(start, delta)).min(latest), end)
        }
        DragKind::ResizeEnd => {
            let earliest = shift(start, min_duration);
            (start, scale.snap(shift(end, delta)).max(earliest))
        }
    }
}

pub struct DragController<S: PointerSurface> {
    surface: S,
    state: DragState,
    min_duration: Duration,
    selected: Option<(String, String)>,
}

impl<S: PointerSurface> DragController<S> {
    /// Controller using the default configuration.
    pub fn with_defaults(surface: S) -> Self {
        Self {
            surface,
            state: DragState::Idle,
            min_duration: GanttConfig::default().min_duration(),
            selected: None,
        }
    }

    /// Fails when `config` does not pass [`GanttConfig::validated`].
    pub fn new(surface: S, config: &GanttConfig) -> Result<Self> {
        let config = config.clone().validated()?;
        Ok(Self {
            surface,
            state: DragState::Idle,
            min_duration: config.min_duration(),
            selected: None,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn set_min_duration(&mut self, min_duration: Duration) -> Result<()> {
        if min_duration < Duration::zero() {
            return Err(Error::InvalidConfig(format!(
                "minimum duration must not be negative (got {min_duration})"
            )));
        }
        self.min_duration = min_duration;
        Ok(())
    }

    pub fn hovered(&self) -> Option<(&str, &str)> {
        match &self.state {
            DragState::Hovering { group_id, task_id } => Some((group_id, task_id)),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<(&str, &str)> {
        self.selected
            .as_ref()
            .map(|(g, t)| (g.as_str(), t.as_str()))
    }

    pub fn preview(&self) -> Option<DragPreview> {
        match &self.state {
            DragState::Dragging(s) => Some(DragPreview {
                group_id: s.group_id.clone(),
                task_id: s.task_id.clone(),
                kind: s.kind,
                start: s.candidate.0,
                end: s.candidate.1,
            }),
            _ => None,
        }
    }

    /// Pointer entered a task box. Ignored while dragging.
    pub fn pointer_enter(&mut self, group_id: &str, task_id: &str) {
        if !self.is_dragging() {
            self.state = DragState::Hovering {
                group_id: group_id.to_string(),
                task_id: task_id.to_string(),
            };
        }
    }

    /// Pointer left every task box. Ignored while dragging.
    pub fn pointer_leave(&mut self) {
        if !self.is_dragging() {
            self.state = DragState::Idle;
        }
    }

    pub fn pointer_down<H: GanttHandler + ?Sized>(
        &mut self,
        event: &PointerEvent,
        target: &DragTarget,
        groups: &[TaskGroup],
        scale: &TimeScale,
        handler: &mut H,
    ) -> DragOutcome {
        if event.button == PointerButton::Secondary {
            // A right click interrupts this pointer's session
            self.pointer_cancel(event);
            let Some(group) = find_group(groups, &target.group_id) else {
                return DragOutcome::Ignored;
            };
            let Some(task) = group.task(&target.task_id) else {
                return DragOutcome::Ignored;
            };
            handler.on_task_right_click(event, task, group);
            return DragOutcome::RightClicked;
        }

        if let DragState::Dragging(session) = &self.state {
            tracing::debug!(
                active = %session.task_id,
                pointer_id = event.pointer_id,
                "drag already in progress, pointer-down ignored"
            );
            return DragOutcome::Ignored;
        }
        if !event.is_primary_press() {
            return DragOutcome::Ignored;
        }

        let Some(task) = find_task(groups, &target.group_id, &target.task_id) else {
            tracing::warn!(group = %target.group_id, task = %target.task_id, "drag target not found");
            return DragOutcome::Ignored;
        };
        if !task.is_well_formed() {
            return DragOutcome::Ignored;
        }

        let grab = PointerGrab::acquire(&mut self.surface, event.pointer_id);
        let original = (task.start_date, task.end_date);
        tracing::debug!(
            task = %task.id,
            kind = target.kind.label(),
            captured = grab.is_captured(),
            "drag started"
        );
        self.state = DragState::Dragging(DragSession {
            pointer_id: event.pointer_id,
            group_id: target.group_id.clone(),
            task_id: target.task_id.clone(),
            kind: target.kind,
            button: event.button,
            origin_x: event.x,
            original,
            candidate: original,
            view_mode: scale.view_mode(),
            grab,
        });
        DragOutcome::Started(target.kind)
    }

    pub fn pointer_move(&mut self, event: &PointerEvent, scale: &TimeScale) -> DragOutcome {
        let DragState::Dragging(session) = &mut self.state else {
            return DragOutcome::Ignored;
        };
        if session.pointer_id != event.pointer_id {
            return DragOutcome::Ignored;
        }
        let candidate = candidate_for(
            session.kind,
            session.original,
            event.x - session.origin_x,
            scale,
            self.min_duration,
        );
        if candidate == session.candidate {
            return DragOutcome::Unchanged;
        }
        session.candidate = candidate;
        DragOutcome::Updated {
            start: candidate.0,
            end: candidate.1,
        }
    }

    /// Commit the candidate, or treat an unmoved press as a click.
    pub fn pointer_up<H: GanttHandler + ?Sized>(
        &mut self,
        event: &PointerEvent,
        groups: &mut [TaskGroup],
        handler: &mut H,
    ) -> DragOutcome {
        if matches!(&self.state, DragState::Dragging(s) if s.button != event.button) {
            // Another button on the same mouse; the gesture is still going
            return DragOutcome::Ignored;
        }
        let Some(session) = self.take_session(event.pointer_id) else {
            return DragOutcome::Ignored;
        };
        session.grab.release(&mut self.surface);

        if session.candidate == session.original {
            return self.toggle_selection(&session.group_id, &session.task_id, groups, handler);
        }

        let Some(group) = groups.iter_mut().find(|g| g.id == session.group_id) else {
            tracing::warn!(group = %session.group_id, "group vanished during drag");
            return DragOutcome::Rejected;
        };
        let Some(task) = group.task_mut(&session.task_id) else {
            tracing::warn!(task = %session.task_id, "task vanished during drag");
            return DragOutcome::Rejected;
        };

        let mut updated = task.clone();
        (updated.start_date, updated.end_date) = session.candidate;
        if !handler.validate_update(&session.group_id, &updated) {
            tracing::debug!(task = %session.task_id, "update rejected, reverting");
            return DragOutcome::Rejected;
        }
        *task = updated.clone();

        let row_count = assign_rows(&group.tasks, session.view_mode).row_count;
        tracing::debug!(task = %updated.id, kind = session.kind.label(), row_count, "drag committed");
        handler.on_task_update(&session.group_id, &updated);
        DragOutcome::Committed(CommitReport {
            group_id: session.group_id,
            task: updated,
            row_count,
        })
    }

    /// Drop the candidate without touching the task set.
    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> DragOutcome {
        match self.take_session(event.pointer_id) {
            Some(session) => {
                tracing::debug!(task = %session.task_id, "drag cancelled");
                session.grab.release(&mut self.surface);
                DragOutcome::Cancelled
            }
            None => DragOutcome::Ignored,
        }
    }

    /// Deselect the current task, if any.
    pub fn clear_selection<H: GanttHandler + ?Sized>(&mut self, groups: &[TaskGroup], handler: &mut H) {
        if let Some((group_id, task_id)) = self.selected.take() {
            if let Some(task) = find_task(groups, &group_id, &task_id) {
                handler.on_task_select(task, false);
            }
        }
    }

    /// Cancel any session and release everything it holds.
    pub fn teardown(&mut self) {
        if let DragState::Dragging(session) = std::mem::replace(&mut self.state, DragState::Idle) {
            tracing::debug!(task = %session.task_id, "drag torn down");
            session.grab.release(&mut self.surface);
        }
    }

    fn take_session(&mut self, pointer_id: PointerId) -> Option<DragSession> {
        match &self.state {
            DragState::Dragging(s) if s.pointer_id == pointer_id => {}
            _ => return None,
        }
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    fn toggle_selection<H: GanttHandler + ?Sized>(
        &mut self,
        group_id: &str,
        task_id: &str,
        groups: &[TaskGroup],
        handler: &mut H,
    ) -> DragOutcome {
        let Some(task) = find_task(groups, group_id, task_id) else {
            return DragOutcome::Ignored;
        };
        let was_selected = self.selected() == Some((group_id, task_id));
        self.clear_selection(groups, handler);
        if was_selected {
            return DragOutcome::SelectionChanged {
                task_id: task_id.to_string(),
                selected: false,
            };
        }
        self.selected = Some((group_id.to_string(), task_id.to_string()));
        handler.on_task_select(task, true);
        DragOutcome::SelectionChanged {
            task_id: task_id.to_string(),
            selected: true,
        }
    }
}

impl<S: PointerSurface> Drop for DragController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::recording::RecordingSurface;
    use crate::interaction::ListenerKind;
    use crate::model::Viewport;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    /// 100 px per hour.
    fn scale(mode: ViewMode) -> TimeScale {
        TimeScale::new(Viewport::new(at(0, 0), at(10, 0), 1000.0), mode).unwrap()
    }

    fn groups() -> Vec<TaskGroup> {
        vec![TaskGroup::new("g", "Crew").with_tasks(vec![
            Task::new("a", "A", at(2, 0), at(4, 0)),
            Task::new("b", "B", at(5, 0), at(6, 0)),
        ])]
    }

    #[derive(Default)]
    struct Recorder {
        updates: Vec<(String, Task)>,
        selects: Vec<(String, bool)>,
        right_clicks: Vec<String>,
        reject: bool,
    }

    impl GanttHandler for Recorder {
        fn validate_update(&mut self, _group_id: &str, _task: &Task) -> bool {
            !self.reject
        }
        fn on_task_update(&mut self, group_id: &str, task: &Task) {
            self.updates.push((group_id.to_string(), task.clone()));
        }
        fn on_task_select(&mut self, task: &Task, is_selected: bool) {
            self.selects.push((task.id.clone(), is_selected));
        }
        fn on_task_right_click(&mut self, _e: &PointerEvent, task: &Task, _g: &TaskGroup) {
            self.right_clicks.push(task.id.clone());
        }
    }

    fn controller() -> DragController<RecordingSurface> {
        DragController::new(RecordingSurface::default(), &GanttConfig::default()).unwrap()
    }

    #[test]
    fn move_commits_and_keeps_duration() {
        let mut gs = groups();
        let mut drag = controller();
        let mut rec = Recorder::default();
        let sc = scale(ViewMode::Hour);
        let target = DragTarget::new("g", "a", DragKind::Move);

        let out = drag.pointer_down(&PointerEvent::mouse(250.0, 10.0), &target, &gs, &sc, &mut rec);
        assert_eq!(out, DragOutcome::Started(DragKind::Move));
        assert_eq!(drag.surface().captured, Some(1));

        assert_eq!(drag.pointer_move(&PointerEvent::mouse(260.0, 10.0), &sc), DragOutcome::Unchanged);
        let out = drag.pointer_move(&PointerEvent::mouse(350.0, 10.0), &sc);
        assert_eq!(out, DragOutcome::Updated { start: at(3, 0), end: at(5, 0) });
        // Not written back yet
        assert_eq!(gs[0].tasks[0].start_date, at(2, 0));

        let out = drag.pointer_up(&PointerEvent::mouse(350.0, 10.0), &mut gs, &mut rec);
        let DragOutcome::Committed(report) = out else {
            panic!("expected commit, got {out:?}");
        };
        assert_eq!(report.row_count, 1);
        assert_eq!(gs[0].tasks[0].start_date, at(3, 0));
        assert_eq!(gs[0].tasks[0].duration(), Duration::hours(2));
        assert_eq!(rec.updates.len(), 1);
        assert_eq!(drag.surface().captured, None);
        assert!(matches!(drag.state(), DragState::Idle));
    }

    #[test]
    fn resize_start_clamps_to_min_duration() {
        let config = GanttConfig {
            min_duration_ms: 30 * 60 * 1000,
            ..GanttConfig::default()
        };
        let mut drag = DragController::new(RecordingSurface::default(), &config).unwrap();
        let gs = groups();
        let sc = scale(ViewMode::Minute);
        let target = DragTarget::new("g", "a", DragKind::ResizeStart);
        drag.pointer_down(&PointerEvent::mouse(200.0, 0.0), &target, &gs, &sc, &mut Recorder::default());
        let out = drag.pointer_move(&PointerEvent::mouse(900.0, 0.0), &sc);
        assert_eq!(out, DragOutcome::Updated { start: at(3, 30), end: at(4, 0) });
    }

    #[test]
    fn resize_end_never_precedes_start() {
        let gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag = controller();
        let target = DragTarget::new("g", "b", DragKind::ResizeEnd);
        drag.pointer_down(&PointerEvent::mouse(600.0, 0.0), &target, &gs, &sc, &mut Recorder::default());
        drag.pointer_move(&PointerEvent::mouse(0.0, 0.0), &sc);
        let preview = drag.preview().unwrap();
        assert_eq!((preview.start, preview.end), (at(5, 0), at(5, 0)));
    }

    #[test]
    fn cancel_reverts_without_callbacks() {
        let mut gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag = controller();
        let mut rec = Recorder::default();
        let target = DragTarget::new("g", "a", DragKind::Move);
        drag.pointer_down(&PointerEvent::mouse(250.0, 0.0), &target, &gs, &sc, &mut rec);
        drag.pointer_move(&PointerEvent::mouse(450.0, 0.0), &sc);
        assert_eq!(drag.pointer_cancel(&PointerEvent::mouse(450.0, 0.0)), DragOutcome::Cancelled);
        assert_eq!(drag.pointer_up(&PointerEvent::mouse(450.0, 0.0), &mut gs, &mut rec), DragOutcome::Ignored);
        assert_eq!(gs, groups());
        assert!(rec.updates.is_empty());
        assert_eq!(drag.surface().captured, None);
    }

    #[test]
    fn rejected_update_keeps_original_instants() {
        let mut gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag = controller();
        let mut rec = Recorder {
            reject: true,
            ..Recorder::default()
        };
        let target = DragTarget::new("g", "a", DragKind::Move);
        drag.pointer_down(&PointerEvent::mouse(250.0, 0.0), &target, &gs, &sc, &mut rec);
        drag.pointer_move(&PointerEvent::mouse(450.0, 0.0), &sc);
        let out = drag.pointer_up(&PointerEvent::mouse(450.0, 0.0), &mut gs, &mut rec);
        assert_eq!(out, DragOutcome::Rejected);
        assert_eq!(gs, groups());
        assert!(rec.updates.is_empty());
    }

    #[test]
    fn second_pointer_is_ignored_while_dragging() {
        let gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag = controller();
        let mut rec = Recorder::default();
        let first = DragTarget::new("g", "a", DragKind::Move);
        let second = DragTarget::new("g", "b", DragKind::Move);
        drag.pointer_down(&PointerEvent::touch(10, 250.0, 0.0), &first, &gs, &sc, &mut rec);
        let out = drag.pointer_down(&PointerEvent::touch(11, 550.0, 0.0), &second, &gs, &sc, &mut rec);
        assert_eq!(out, DragOutcome::Ignored);
        assert_eq!(drag.pointer_move(&PointerEvent::touch(11, 650.0, 0.0), &sc), DragOutcome::Ignored);
        assert_eq!(drag.preview().unwrap().task_id, "a");
    }

    #[test]
    fn click_without_motion_toggles_selection() {
        let mut gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag = controller();
        let mut rec = Recorder::default();
        let a = DragTarget::new("g", "a", DragKind::Move);
        let b = DragTarget::new("g", "b", DragKind::Move);
        let press = PointerEvent::mouse(250.0, 0.0);

        drag.pointer_down(&press, &a, &gs, &sc, &mut rec);
        drag.pointer_up(&press, &mut gs, &mut rec);
        drag.pointer_down(&press, &b, &gs, &sc, &mut rec);
        drag.pointer_up(&press, &mut gs, &mut rec);
        drag.pointer_down(&press, &b, &gs, &sc, &mut rec);
        let out = drag.pointer_up(&press, &mut gs, &mut rec);

        assert_eq!(out, DragOutcome::SelectionChanged { task_id: "b".into(), selected: false });
        assert_eq!(
            rec.selects,
            vec![
                ("a".to_string(), true),
                ("a".to_string(), false),
                ("b".to_string(), true),
                ("b".to_string(), false),
            ]
        );
        assert!(rec.updates.is_empty());
        assert_eq!(drag.selected(), None);
    }

    #[test]
    fn right_click_fires_only_right_click_and_interrupts() {
        let gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag = controller();
        let mut rec = Recorder::default();
        let a = DragTarget::new("g", "a", DragKind::Move);
        drag.pointer_down(&PointerEvent::mouse(250.0, 0.0), &a, &gs, &sc, &mut rec);
        drag.pointer_move(&PointerEvent::mouse(400.0, 0.0), &sc);

        let right = PointerEvent::mouse(400.0, 0.0).with_button(PointerButton::Secondary);
        assert_eq!(drag.pointer_down(&right, &a, &gs, &sc, &mut rec), DragOutcome::RightClicked);
        assert!(!drag.is_dragging());
        assert_eq!(rec.right_clicks, vec!["a".to_string()]);
        assert!(rec.selects.is_empty());
    }

    #[test]
    fn hover_tracks_enter_and_leave_outside_drags() {
        let gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag = controller();
        drag.pointer_enter("g", "b");
        assert_eq!(drag.hovered(), Some(("g", "b")));
        drag.pointer_leave();
        assert_eq!(drag.hovered(), None);

        let a = DragTarget::new("g", "a", DragKind::Move);
        drag.pointer_down(&PointerEvent::mouse(250.0, 0.0), &a, &gs, &sc, &mut NoopRecorder);
        drag.pointer_enter("g", "b");
        assert!(drag.is_dragging());
    }

    struct NoopRecorder;
    impl GanttHandler for NoopRecorder {}

    #[test]
    fn teardown_removes_fallback_listeners() {
        let gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag =
            DragController::new(RecordingSurface::without_capture(), &GanttConfig::default()).unwrap();
        let a = DragTarget::new("g", "a", DragKind::Move);
        drag.pointer_down(&PointerEvent::mouse(250.0, 0.0), &a, &gs, &sc, &mut NoopRecorder);
        assert!(drag.surface().has_listener(ListenerKind::WindowPointerUp));
        drag.teardown();
        assert!(drag.surface().listeners.is_empty());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn secondary_mouse_button_never_starts_a_drag() {
        let gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag = controller();
        let a = DragTarget::new("g", "a", DragKind::Move);
        let middle = PointerEvent::mouse(250.0, 0.0).with_button(PointerButton::Auxiliary);
        assert_eq!(drag.pointer_down(&middle, &a, &gs, &sc, &mut NoopRecorder), DragOutcome::Ignored);
        assert_eq!(drag.surface().captured, None);
    }

    #[test]
    fn negative_min_duration_is_refused() {
        let config = GanttConfig {
            min_duration_ms: -3_600_000,
            ..GanttConfig::default()
        };
        let err = DragController::new(RecordingSurface::default(), &config).err();
        assert!(matches!(err, Some(Error::InvalidConfig(_))));

        let mut drag = controller();
        assert!(drag.set_min_duration(Duration::hours(-1)).is_err());
        assert!(drag.set_min_duration(Duration::minutes(15)).is_ok());
    }

    #[test]
    fn resize_start_never_passes_end_even_with_negative_minimum() {
        let sc = scale(ViewMode::Hour);
        let original = (at(2, 0), at(4, 0));
        let (start, end) =
            candidate_for(DragKind::ResizeStart, original, 700.0, &sc, Duration::hours(-1));
        assert_eq!((start, end), (at(4, 0), at(4, 0)));
        let (start, end) =
            candidate_for(DragKind::ResizeEnd, original, -700.0, &sc, Duration::hours(-1));
        assert_eq!((start, end), (at(2, 0), at(2, 0)));
    }

    #[test]
    fn other_button_release_does_not_end_drag() {
        let mut gs = groups();
        let sc = scale(ViewMode::Hour);
        let mut drag = controller();
        let mut rec = Recorder::default();
        let a = DragTarget::new("g", "a", DragKind::Move);
        drag.pointer_down(&PointerEvent::mouse(250.0, 0.0), &a, &gs, &sc, &mut rec);
        drag.pointer_move(&PointerEvent::mouse(350.0, 0.0), &sc);

        let middle = PointerEvent::mouse(350.0, 0.0).with_button(PointerButton::Auxiliary);
        assert_eq!(drag.pointer_down(&middle, &a, &gs, &sc, &mut rec), DragOutcome::Ignored);
        assert_eq!(drag.pointer_up(&middle, &mut gs, &mut rec), DragOutcome::Ignored);
        assert!(drag.is_dragging());
        assert_eq!(gs, groups());

        let out = drag.pointer_up(&PointerEvent::mouse(350.0, 0.0), &mut gs, &mut rec);
        assert!(matches!(out, DragOutcome::Committed(_)));
        assert_eq!(rec.updates.len(), 1);
    }
}
