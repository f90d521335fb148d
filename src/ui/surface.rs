//! egui implementations of the pointer and scroll surfaces.
//!
//! egui delivers every pointer event through the context, so there is no
//! per-element capture: capture requests report `Unsupported` and sessions
//! run on the window-level listeners instead. Scroll writes are queued and
//! handed to the `ScrollArea` on the next frame.

use std::collections::HashSet;

use crate::interaction::{
    CaptureError, ListenerKind, PointerId, PointerSurface, ScrollOffset, ScrollSurface, TouchAction,
    UserSelect,
};

#[derive(Debug, Default)]
pub struct EguiPointerSurface {
    listeners: HashSet<ListenerKind>,
}

impl EguiPointerSurface {
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }
}

impl PointerSurface for EguiPointerSurface {
    fn set_pointer_capture(&mut self, _pointer_id: PointerId) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }

    fn release_pointer_capture(&mut self, _pointer_id: PointerId) {}

    fn add_listener(&mut self, kind: ListenerKind) {
        self.listeners.insert(kind);
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        self.listeners.remove(&kind);
    }
}

#[derive(Debug, Default)]
pub struct EguiScrollSurface {
    pointer: EguiPointerSurface,
    offset: ScrollOffset,
    max: ScrollOffset,
    requested: Option<ScrollOffset>,
    touch_action: TouchAction,
    user_select: UserSelect,
    dragging: bool,
}

impl EguiScrollSurface {
    /// Record where the scroll area ended up this frame.
    pub fn sync(&mut self, offset: egui::Vec2, content: egui::Vec2, viewport: egui::Vec2) {
        self.offset = ScrollOffset::new(offset.x as f64, offset.y as f64);
        self.max = ScrollOffset::new(
            (content.x - viewport.x).max(0.0) as f64,
            (content.y - viewport.y).max(0.0) as f64,
        );
    }

    /// Offset to force on the scroll area this frame, if one was written.
    pub fn take_requested(&mut self) -> Option<egui::Vec2> {
        self.requested
            .take()
            .map(|o| egui::vec2(o.left as f32, o.top as f32))
    }

    pub fn has_request(&self) -> bool {
        self.requested.is_some()
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.pointer.is_listening(kind)
    }
}

impl PointerSurface for EguiScrollSurface {
    fn set_pointer_capture(&mut self, pointer_id: PointerId) -> Result<(), CaptureError> {
        self.pointer.set_pointer_capture(pointer_id)
    }

    fn release_pointer_capture(&mut self, pointer_id: PointerId) {
        self.pointer.release_pointer_capture(pointer_id);
    }

    fn add_listener(&mut self, kind: ListenerKind) {
        self.pointer.add_listener(kind);
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        self.pointer.remove_listener(kind);
    }
}

impl ScrollSurface for EguiScrollSurface {
    fn scroll_offset(&self) -> ScrollOffset {
        self.offset
    }

    fn max_scroll(&self) -> ScrollOffset {
        self.max
    }

    fn set_scroll_offset(&mut self, offset: ScrollOffset) {
        self.offset = offset;
        self.requested = Some(offset);
    }

    fn touch_action(&self) -> TouchAction {
        self.touch_action
    }

    fn set_touch_action(&mut self, action: TouchAction) {
        self.touch_action = action;
    }

    fn user_select(&self) -> UserSelect {
        self.user_select
    }

    fn set_user_select(&mut self, select: UserSelect) {
        self.user_select = select;
    }

    fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }
}
