//! Click-and-drag panning of the scroll container.
//!
//! Pointer moves only record the offset they want; the write happens on the
//! next animation frame, so a burst of moves between two frames costs a
//! single scroll update carrying the latest position.

use chrono::{DateTime, Duration, Utc};

use super::surface::{ListenerKind, PointerGrab, ScrollOffset, ScrollSurface, StyleGrab};
use super::{PointerButton, PointerEvent, PointerId};
use crate::model::TimeScale;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutcome {
    Ignored,
    Started,
    /// A scroll write is queued for the next frame.
    Scheduled(ScrollOffset),
    Applied(ScrollOffset),
    Ended,
    Cancelled,
}

#[derive(Debug)]
struct PanSession {
    grab: PointerGrab,
    styles: StyleGrab,
    button: PointerButton,
    origin_x: f64,
    origin_y: f64,
    start_scroll: ScrollOffset,
}

pub struct PanController<S: ScrollSurface> {
    surface: S,
    session: Option<PanSession>,
    pending: Option<ScrollOffset>,
    listeners: Vec<ListenerKind>,
}

impl<S: ScrollSurface> PanController<S> {
    /// Attach to `surface`. The controller listens until torn down or dropped.
    pub fn new(mut surface: S) -> Self {
        let listeners = vec![ListenerKind::PointerDown, ListenerKind::PointerCancel];
        for &kind in &listeners {
            surface.add_listener(kind);
        }
        Self {
            surface,
            session: None,
            pending: None,
            listeners,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_panning(&self) -> bool {
        self.session.is_some()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn active_pointer(&self) -> Option<PointerId> {
        self.session.as_ref().map(|s| s.grab.pointer_id())
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> PanOutcome {
        if self.session.is_some() || !event.is_primary_press() {
            return PanOutcome::Ignored;
        }
        let grab = PointerGrab::acquire(&mut self.surface, event.pointer_id);
        let styles = StyleGrab::acquire(&mut self.surface);
        let start_scroll = self.surface.scroll_offset();
        tracing::trace!(pointer_id = event.pointer_id, ?start_scroll, "pan started");
        self.session = Some(PanSession {
            grab,
            styles,
            button: event.button,
            origin_x: event.x,
            origin_y: event.y,
            start_scroll,
        });
        PanOutcome::Started
    }

    /// Queue the offset that keeps the content under the pointer.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> PanOutcome {
        let Some(session) = &self.session else {
            return PanOutcome::Ignored;
        };
        if session.grab.pointer_id() != event.pointer_id {
            return PanOutcome::Ignored;
        }
        let target = ScrollOffset::new(
            session.start_scroll.left - (event.x - session.origin_x),
            session.start_scroll.top - (event.y - session.origin_y),
        )
        .clamped(self.surface.max_scroll());
        self.pending = Some(target);
        PanOutcome::Scheduled(target)
    }

    /// Apply the latest queued offset, if any.
    pub fn on_animation_frame(&mut self) -> Option<ScrollOffset> {
        let target = self.pending.take()?;
        if target == self.surface.scroll_offset() {
            return None;
        }
        tracing::trace!(left = target.left, top = target.top, "pan frame");
        self.surface.set_scroll_offset(target);
        Some(target)
    }

    /// Flush the queued offset and end the session.
    /// Only the release of the button that started the pan ends it.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> PanOutcome {
        let Some(session) = &self.session else {
            return PanOutcome::Ignored;
        };
        if session.grab.pointer_id() != event.pointer_id || session.button != event.button {
            return PanOutcome::Ignored;
        }
        let applied = self.on_animation_frame();
        self.end_session();
        match applied {
            Some(offset) => PanOutcome::Applied(offset),
            None => PanOutcome::Ended,
        }
    }

    /// End the session and drop any queued frame.
    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> PanOutcome {
        if self.active_pointer() != Some(event.pointer_id) {
            return PanOutcome::Ignored;
        }
        self.pending = None;
        self.end_session();
        PanOutcome::Cancelled
    }

    /// Time shift produced by the current horizontal scroll position.
    pub fn scrolled_time(&self, scale: &TimeScale) -> Duration {
        scale.pixels_to_duration(self.surface.scroll_offset().left)
    }

    /// Instant at the left edge of the visible area.
    pub fn visible_start(&self, scale: &TimeScale) -> DateTime<Utc> {
        scale.to_instant_exact(self.surface.scroll_offset().left)
    }

    /// Release any session and detach every listener. Safe to call twice.
    pub fn teardown(&mut self) {
        self.pending = None;
        self.end_session();
        for kind in self.listeners.drain(..) {
            self.surface.remove_listener(kind);
        }
    }

    fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.styles.release(&mut self.surface);
            session.grab.release(&mut self.surface);
            tracing::trace!("pan ended");
        }
    }
}

impl<S: ScrollSurface> Drop for PanController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::recording::RecordingSurface;
    use crate::interaction::{TouchAction, UserSelect};

    fn pan_at(left: f64) -> PanController<RecordingSurface> {
        let surface = RecordingSurface::default()
            .with_scroll(ScrollOffset::new(left, 0.0), ScrollOffset::new(2_000.0, 0.0));
        PanController::new(surface)
    }

    #[test]
    fn dragging_right_at_the_origin_stays_clamped() {
        let mut pan = pan_at(0.0);
        pan.pointer_down(&PointerEvent::mouse(200.0, 50.0));
        pan.pointer_move(&PointerEvent::mouse(300.0, 50.0));
        assert_eq!(pan.on_animation_frame(), None);
        assert_eq!(pan.surface().scroll.left, 0.0);
    }

    #[test]
    fn dragging_right_scrolls_back() {
        let mut pan = pan_at(500.0);
        pan.pointer_down(&PointerEvent::mouse(200.0, 50.0));
        pan.pointer_move(&PointerEvent::mouse(300.0, 50.0));
        assert_eq!(pan.on_animation_frame(), Some(ScrollOffset::new(400.0, 0.0)));
        assert_eq!(pan.surface().scroll.left, 400.0);
    }

    #[test]
    fn moves_between_frames_coalesce() {
        let mut pan = pan_at(500.0);
        pan.pointer_down(&PointerEvent::mouse(200.0, 0.0));
        for x in [190.0, 170.0, 150.0, 100.0] {
            pan.pointer_move(&PointerEvent::mouse(x, 0.0));
        }
        pan.on_animation_frame();
        assert_eq!(pan.surface().scroll_writes, 1);
        assert_eq!(pan.surface().scroll.left, 600.0);
        assert_eq!(pan.on_animation_frame(), None);
    }

    #[test]
    fn pointer_up_flushes_and_restores_styles() {
        let mut pan = pan_at(500.0);
        pan.surface_mut().touch_action = TouchAction::PanY;
        pan.pointer_down(&PointerEvent::mouse(200.0, 0.0));
        assert!(pan.surface().dragging);
        assert_eq!(pan.surface().user_select, UserSelect::None);
        pan.pointer_move(&PointerEvent::mouse(150.0, 0.0));
        let out = pan.pointer_up(&PointerEvent::mouse(150.0, 0.0));
        assert_eq!(out, PanOutcome::Applied(ScrollOffset::new(550.0, 0.0)));
        assert!(!pan.surface().dragging);
        assert_eq!(pan.surface().touch_action, TouchAction::PanY);
        assert_eq!(pan.surface().user_select, UserSelect::Auto);
        assert_eq!(pan.surface().captured, None);
    }

    #[test]
    fn cancel_discards_queued_frame() {
        let mut pan = pan_at(500.0);
        pan.pointer_down(&PointerEvent::mouse(200.0, 0.0));
        pan.pointer_move(&PointerEvent::mouse(100.0, 0.0));
        assert_eq!(pan.pointer_cancel(&PointerEvent::mouse(100.0, 0.0)), PanOutcome::Cancelled);
        assert!(!pan.has_pending_frame());
        assert_eq!(pan.surface().scroll.left, 500.0);
        assert!(!pan.surface().dragging);
    }

    #[test]
    fn other_pointers_are_ignored() {
        let mut pan = pan_at(500.0);
        pan.pointer_down(&PointerEvent::touch(4, 200.0, 0.0));
        assert_eq!(pan.pointer_down(&PointerEvent::touch(5, 0.0, 0.0)), PanOutcome::Ignored);
        assert_eq!(pan.pointer_move(&PointerEvent::touch(5, 0.0, 0.0)), PanOutcome::Ignored);
        assert_eq!(pan.pointer_up(&PointerEvent::touch(5, 0.0, 0.0)), PanOutcome::Ignored);
        assert_eq!(pan.active_pointer(), Some(4));
    }

    #[test]
    fn teardown_detaches_everything() {
        let mut pan = PanController::new(RecordingSurface::without_capture());
        assert!(pan.surface().has_listener(ListenerKind::PointerDown));
        pan.pointer_down(&PointerEvent::mouse(0.0, 0.0));
        assert_eq!(pan.surface().listeners.len(), 4);
        pan.teardown();
        pan.teardown();
        assert!(pan.surface().listeners.is_empty());
        assert!(!pan.surface().dragging);
    }
}
