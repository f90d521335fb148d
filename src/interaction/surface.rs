//! Host seams and the scoped resources a pointer session holds.
//!
//! A session acquires pointer capture (or window listeners when capture is
//! unavailable) and, for panning, mutates a few styles on the scroll
//! container. [`PointerGrab`] and [`StyleGrab`] record exactly what was taken
//! so that releasing them puts the surface back the way it was found.

use thiserror::Error;

use super::PointerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("pointer capture is not supported by this surface")]
    Unsupported,
    #[error("pointer {0} is not active")]
    InactivePointer(PointerId),
}

/// Event listeners a controller may attach to its surface or the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerDown,
    PointerCancel,
    WindowPointerMove,
    WindowPointerUp,
}

/// Element that pointer sessions run against.
pub trait PointerSurface {
    fn set_pointer_capture(&mut self, pointer_id: PointerId) -> Result<(), CaptureError>;
    fn release_pointer_capture(&mut self, pointer_id: PointerId);
    fn add_listener(&mut self, kind: ListenerKind);
    fn remove_listener(&mut self, kind: ListenerKind);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchAction {
    #[default]
    Auto,
    None,
    PanX,
    PanY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSelect {
    #[default]
    Auto,
    None,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub left: f64,
    pub top: f64,
}

impl ScrollOffset {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Clamp both axes to `[0, max]`.
    pub fn clamped(self, max: ScrollOffset) -> Self {
        Self {
            left: self.left.clamp(0.0, max.left.max(0.0)),
            top: self.top.clamp(0.0, max.top.max(0.0)),
        }
    }
}

/// Scrollable container the pan controller drives.
pub trait ScrollSurface: PointerSurface {
    fn scroll_offset(&self) -> ScrollOffset;
    /// Largest reachable offset on each axis (content minus client size).
    fn max_scroll(&self) -> ScrollOffset;
    fn set_scroll_offset(&mut self, offset: ScrollOffset);
    fn touch_action(&self) -> TouchAction;
    fn set_touch_action(&mut self, action: TouchAction);
    fn user_select(&self) -> UserSelect;
    fn set_user_select(&mut self, select: UserSelect);
    fn is_dragging(&self) -> bool;
    fn set_dragging(&mut self, dragging: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrabMode {
    Captured,
    WindowListeners,
}

/// Pointer routing held for the length of one session.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a grab must be released on the surface it was taken from"]
pub struct PointerGrab {
    pointer_id: PointerId,
    mode: GrabMode,
}

impl PointerGrab {
    /// Capture `pointer_id`, falling back to window-level listeners.
    pub fn acquire<S: PointerSurface + ?Sized>(surface: &mut S, pointer_id: PointerId) -> Self {
        match surface.set_pointer_capture(pointer_id) {
            Ok(()) => Self {
                pointer_id,
                mode: GrabMode::Captured,
            },
            Err(err) => {
                tracing::debug!(pointer_id, %err, "pointer capture unavailable, listening on window");
                surface.add_listener(ListenerKind::WindowPointerMove);
                surface.add_listener(ListenerKind::WindowPointerUp);
                Self {
                    pointer_id,
                    mode: GrabMode::WindowListeners,
                }
            }
        }
    }

    pub fn pointer_id(&self) -> PointerId {
        self.pointer_id
    }

    pub fn is_captured(&self) -> bool {
        self.mode == GrabMode::Captured
    }

    pub fn release<S: PointerSurface + ?Sized>(self, surface: &mut S) {
        match self.mode {
            GrabMode::Captured => surface.release_pointer_capture(self.pointer_id),
            GrabMode::WindowListeners => {
                surface.remove_listener(ListenerKind::WindowPointerMove);
                surface.remove_listener(ListenerKind::WindowPointerUp);
            }
        }
    }
}

/// Container styles saved before a pan session overrides them.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a style grab must be released to restore the surface"]
pub struct StyleGrab {
    touch_action: TouchAction,
    user_select: UserSelect,
    dragging: bool,
}

impl StyleGrab {
    /// Disable native touch scrolling and text selection, mark as dragging.
    pub fn acquire<S: ScrollSurface + ?Sized>(surface: &mut S) -> Self {
        let saved = Self {
            touch_action: surface.touch_action(),
            user_select: surface.user_select(),
            dragging: surface.is_dragging(),
        };
        surface.set_touch_action(TouchAction::None);
        surface.set_user_select(UserSelect::None);
        surface.set_dragging(true);
        saved
    }

    pub fn release<S: ScrollSurface + ?Sized>(self, surface: &mut S) {
        surface.set_touch_action(self.touch_action);
        surface.set_user_select(self.user_select);
        surface.set_dragging(self.dragging);
    }
}
