//! In-memory surface for driving the controllers without a window.

use super::surface::{
    CaptureError, ListenerKind, PointerSurface, ScrollOffset, ScrollSurface, TouchAction, UserSelect,
};
use super::PointerId;

/// Surface double that records every mutation made through the traits.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    pub capture_supported: bool,
    pub captured: Option<PointerId>,
    pub listeners: Vec<ListenerKind>,
    pub scroll: ScrollOffset,
    pub max: ScrollOffset,
    pub touch_action: TouchAction,
    pub user_select: UserSelect,
    pub dragging: bool,
    /// Number of `set_scroll_offset` calls.
    pub scroll_writes: usize,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            capture_supported: true,
            captured: None,
            listeners: Vec::new(),
            scroll: ScrollOffset::default(),
            max: ScrollOffset::new(1_000.0, 500.0),
            touch_action: TouchAction::Auto,
            user_select: UserSelect::Auto,
            dragging: false,
            scroll_writes: 0,
        }
    }
}

impl RecordingSurface {
    pub fn without_capture() -> Self {
        Self {
            capture_supported: false,
            ..Self::default()
        }
    }

    pub fn with_scroll(mut self, scroll: ScrollOffset, max: ScrollOffset) -> Self {
        self.scroll = scroll;
        self.max = max;
        self
    }

    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.contains(&kind)
    }
}

impl PointerSurface for RecordingSurface {
    fn set_pointer_capture(&mut self, pointer_id: PointerId) -> Result<(), CaptureError> {
        if !self.capture_supported {
            return Err(CaptureError::Unsupported);
        }
        self.captured = Some(pointer_id);
        Ok(())
    }

    fn release_pointer_capture(&mut self, pointer_id: PointerId) {
        if self.captured == Some(pointer_id) {
            self.captured = None;
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) {
        self.listeners.push(kind);
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        if let Some(pos) = self.listeners.iter().position(|k| *k == kind) {
            self.listeners.remove(pos);
        }
    }
}

impl ScrollSurface for RecordingSurface {
    fn scroll_offset(&self) -> ScrollOffset {
        self.scroll
    }

    fn max_scroll(&self) -> ScrollOffset {
        self.max
    }

    fn set_scroll_offset(&mut self, offset: ScrollOffset) {
        self.scroll = offset;
        self.scroll_writes += 1;
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
