//! Task box styling.
//!
//! The renderer never parses style strings; it asks a [`TaskColorResolver`]
//! for a [`TaskStyle`] and paints exactly what comes back.

use egui::Color32;

use crate::model::Task;
use crate::ui::theme;

/// Everything the renderer needs to color one task box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStyle {
    pub background: Color32,
    pub border: Color32,
    pub text: Color32,
    /// Thicker border, used for the selected task.
    pub emphasized: bool,
    /// Drawn with a drop shadow, used while dragging.
    pub elevated: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct StyleRequest<'a> {
    pub task: &'a Task,
    pub is_hovered: bool,
    pub is_dragging: bool,
    pub is_selected: bool,
}

pub trait TaskColorResolver {
    fn resolve(&self, request: &StyleRequest<'_>) -> TaskStyle;
}

/// Color from the task's token, emerald when complete, amber when selected.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultColorResolver;

impl TaskColorResolver for DefaultColorResolver {
    fn resolve(&self, request: &StyleRequest<'_>) -> TaskStyle {
        let base = if request.is_selected {
            theme::TASK_SELECTED
        } else if request.task.is_complete() {
            theme::TASK_COMPLETE
        } else {
            request
                .task
                .color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(theme::TASK_DEFAULT)
        };
        let background = if request.is_hovered || request.is_dragging {
            lighten(base, 0.15)
        } else {
            base
        };
        TaskStyle {
            background,
            border: if request.is_selected {
                theme::HANDLE_COLOR
            } else {
                darken(base, 0.25)
            },
            text: theme::TEXT_ON_BAR,
            emphasized: request.is_selected,
            elevated: request.is_dragging,
        }
    }
}

/// Parse `#rrggbb` or `#rgb`.
pub fn parse_hex_color(token: &str) -> Option<Color32> {
    let hex = token.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

fn mix(c: Color32, target: u8, amount: f32) -> Color32 {
    let f = |v: u8| (v as f32 + (target as f32 - v as f32) * amount).round() as u8;
    Color32::from_rgb(f(c.r()), f(c.g()), f(c.b()))
}

fn lighten(c: Color32, amount: f32) -> Color32 {
    mix(c, 255, amount)
}

fn darken(c: Color32, amount: f32) -> Color32 {
    mix(c, 0, amount)
}
