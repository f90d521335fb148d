//! Pointer-driven editing and panning.
//!
//! Both controllers are host-agnostic state machines. A host feeds them
//! pointer events in arrival order and implements the surface traits in
//! [`surface`] for whatever owns the pixels (a DOM element, an egui canvas, a
//! test double).

pub mod drag;
pub mod pan;
#[cfg(any(test, feature = "test-support"))]
pub mod recording;
pub mod surface;

use crate::model::{Task, TaskGroup};

pub use drag::{candidate_for, CommitReport, DragController, DragKind, DragOutcome, DragPreview, DragTarget};
pub use pan::{PanController, PanOutcome};
pub use surface::{
    CaptureError, ListenerKind, PointerSurface, ScrollOffset, ScrollSurface, TouchAction, UserSelect,
};

pub type PointerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
    /// Moves and contact-only events.
    None,
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub kind: PointerKind,
    pub button: PointerButton,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            button: PointerButton::Primary,
            x,
            y,
        }
    }

    pub fn touch(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Touch,
            button: PointerButton::None,
            x,
            y,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Primary mouse button, or any contact for touch and pen.
    pub fn is_primary_press(&self) -> bool {
        match self.kind {
            PointerKind::Mouse => self.button == PointerButton::Primary,
            PointerKind::Touch | PointerKind::Pen => self.button != PointerButton::Secondary,
        }
    }
}

/// Callbacks invoked once state has settled. Every method defaults to a no-op.
pub trait GanttHandler {
    /// Veto a drag or resize before it is written back. Returning `false`
    /// reverts the task to its pre-drag instants.
    fn validate_update(&mut self, _group_id: &str, _task: &Task) -> bool {
        true
    }

    /// Fired once per committed drag or resize.
    fn on_task_update(&mut self, _group_id: &str, _task: &Task) {}

    fn on_task_select(&mut self, _task: &Task, _is_selected: bool) {}

    /// Secondary interaction on a task. Never accompanied by a select.
    fn on_task_right_click(&mut self, _event: &PointerEvent, _task: &Task, _group: &TaskGroup) {}
}

/// Handler that accepts every update and ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl GanttHandler for NoopHandler {}
