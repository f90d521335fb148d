use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Utc};
use egui::{Color32, CursorIcon, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use crate::config::GanttConfig;
use crate::error::Result;
use crate::interaction::{
    DragController, DragOutcome, DragTarget, GanttHandler, PanController, PointerButton,
    PointerEvent,
};
use crate::layout::{layout_groups, BoxRegion, GanttLayout, TaskBox};
use crate::model::task::find_task;
use crate::model::{Task, TaskGroup, TimeScale, ViewMode};
use crate::ui::style::{DefaultColorResolver, StyleRequest, TaskColorResolver, TaskStyle};
use crate::ui::surface::{EguiPointerSurface, EguiScrollSurface};
use crate::ui::theme;
use crate::ui::tooltip::TaskTooltip;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
/// Grid lines closer than this are not drawn.
const MIN_GRID_SPACING: f32 = 3.0;
/// Header labels need this much room.
const MIN_LABEL_SPACING: f32 = 36.0;

/// Interaction state that lives across frames.
pub struct ChartState {
    pub drag: DragController<EguiPointerSurface>,
    pub pan: PanController<EguiScrollSurface>,
    pub resolver: Box<dyn TaskColorResolver>,
}

impl ChartState {
    pub fn new(config: &GanttConfig) -> Result<Self> {
        Ok(Self {
            drag: DragController::new(EguiPointerSurface::default(), config)?,
            pan: PanController::new(EguiScrollSurface::default()),
            resolver: Box::new(DefaultColorResolver),
        })
    }
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            drag: DragController::with_defaults(EguiPointerSurface::default()),
            pan: PanController::new(EguiScrollSurface::default()),
            resolver: Box::new(DefaultColorResolver),
        }
    }
}

/// Settled outcomes from this frame's pointer events.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    pub outcomes: Vec<DragOutcome>,
}

impl ChartInteraction {
    pub fn changed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, DragOutcome::Committed(_)))
    }
}

/// Render the timeline (right panel) and feed it this frame's pointer events.
#[allow(clippy::too_many_arguments)]
pub fn show_gantt_chart(
    state: &mut ChartState,
    groups: &mut [TaskGroup],
    config: &GanttConfig,
    scale: &TimeScale,
    cyclic: &BTreeSet<&str>,
    handler: &mut dyn GanttHandler,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let mut layout = layout_groups(groups, scale, config);
    let available = ui.available_size();
    let chart_width = (scale.width() as f32).max(available.x);
    let chart_height = (HEADER_HEIGHT + layout.total_height + 40.0).max(available.y);

    let mut area = egui::ScrollArea::both()
        .auto_shrink([false, false])
        .drag_to_scroll(false);
    if let Some(offset) = state.pan.surface_mut().take_requested() {
        area = area.scroll_offset(offset);
    }

    let output = area.show(ui, |ui| {
        let (response, painter) =
            ui.allocate_painter(Vec2::new(chart_width, chart_height), Sense::hover());
        let origin = response.rect.min;
        let visible = ui.clip_rect();

        let events = ui.input(|i| i.events.clone());
        for event in &events {
            let outcome = route_event(event, state, &layout, groups, scale, handler, origin, visible);
            if let Some(outcome) = outcome {
                if matches!(outcome, DragOutcome::Committed(_)) {
                    layout = layout_groups(groups, scale, config);
                }
                interaction.outcomes.push(outcome);
            }
        }
        state.pan.on_animation_frame();

        if let Some(preview) = state.drag.preview() {
            layout.apply_preview(&preview.group_id, &preview.task_id, preview.start, preview.end, scale, config);
        }

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
        draw_group_bands(&painter, origin, &layout, chart_width);
        draw_grid(&painter, origin, scale, visible, chart_height);
        draw_today_line(&painter, origin, scale, chart_height);
        draw_dependencies(&painter, origin, &layout, groups, cyclic);

        let hovered = state.drag.hovered().map(|(g, t)| (g.to_string(), t.to_string()));
        let preview = state.drag.preview();
        let selected = state.drag.selected().map(|(g, t)| (g.to_string(), t.to_string()));
        for task_box in &layout.boxes {
            let Some(task) = groups
                .get(task_box.group_index)
                .and_then(|g| g.tasks.get(task_box.task_index))
            else {
                continue;
            };
            let key = (task_box.group_id.clone(), task_box.task_id.clone());
            let is_dragging = preview
                .as_ref()
                .is_some_and(|p| p.group_id == key.0 && p.task_id == key.1);
            let style = state.resolver.resolve(&StyleRequest {
                task,
                is_hovered: hovered.as_ref() == Some(&key),
                is_dragging,
                is_selected: selected.as_ref() == Some(&key),
            });
            draw_task_box(&painter, origin, task_box, task, style, config.show_progress);
        }

        draw_header(&painter, origin, scale, visible);
        update_cursor(ui, state, &layout, origin);

        if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
            show_tooltip(ui, state, &layout, groups, origin, pos);
        }
    });

    let viewport_size = output.inner_rect.size();
    state
        .pan
        .surface_mut()
        .sync(output.state.offset, output.content_size, viewport_size);
    if state.pan.is_panning() || state.drag.is_dragging() || state.pan.surface().has_request() {
        ui.ctx().request_repaint();
    }

    interaction
}

fn to_pointer_event(pos: Pos2, button: Option<egui::PointerButton>) -> PointerEvent {
    let button = match button {
        Some(egui::PointerButton::Primary) => PointerButton::Primary,
        Some(egui::PointerButton::Secondary) => PointerButton::Secondary,
        Some(_) => PointerButton::Auxiliary,
        None => PointerButton::None,
    };
    PointerEvent::mouse(pos.x as f64, pos.y as f64).with_button(button)
}

/// Canvas position relative to the top of the first group.
fn to_canvas(pos: Pos2, origin: Pos2) -> (f32, f32) {
    (pos.x - origin.x, pos.y - origin.y - HEADER_HEIGHT)
}

#[allow(clippy::too_many_arguments)]
fn route_event(
    event: &egui::Event,
    state: &mut ChartState,
    layout: &GanttLayout,
    groups: &mut [TaskGroup],
    scale: &TimeScale,
    handler: &mut dyn GanttHandler,
    origin: Pos2,
    visible: Rect,
) -> Option<DragOutcome> {
    let outcome = match *event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed: true,
            ..
        } => {
            if !visible.contains(pos) {
                return None;
            }
            let pointer = to_pointer_event(pos, Some(button));
            let (x, y) = to_canvas(pos, origin);
            match layout.hit_test(x, y) {
                Some(hit) => {
                    let target = DragTarget::new(
                        hit.task_box.group_id.clone(),
                        hit.task_box.task_id.clone(),
                        hit.region.into(),
                    );
                    state.drag.pointer_down(&pointer, &target, groups, scale, handler)
                }
                None => {
                    if pointer.is_primary_press() {
                        state.drag.clear_selection(groups, handler);
                        state.pan.pointer_down(&pointer);
                    }
                    DragOutcome::Ignored
                }
            }
        }
        egui::Event::PointerButton {
            pos,
            button,
            pressed: false,
            ..
        } => {
            let pointer = to_pointer_event(pos, Some(button));
            state.pan.pointer_up(&pointer);
            state.drag.pointer_up(&pointer, groups, handler)
        }
        egui::Event::PointerMoved(pos) => {
            let pointer = to_pointer_event(pos, None);
            state.pan.pointer_move(&pointer);
            let (x, y) = to_canvas(pos, origin);
            match layout.hit_test(x, y) {
                Some(hit) if visible.contains(pos) => {
                    state.drag.pointer_enter(&hit.task_box.group_id, &hit.task_box.task_id)
                }
                _ => state.drag.pointer_leave(),
            }
            state.drag.pointer_move(&pointer, scale)
        }
        egui::Event::PointerGone => {
            let pointer = PointerEvent::mouse(0.0, 0.0);
            state.pan.pointer_cancel(&pointer);
            state.drag.pointer_leave();
            state.drag.pointer_cancel(&pointer)
        }
        _ => return None,
    };
    match outcome {
        DragOutcome::Ignored | DragOutcome::Unchanged | DragOutcome::Updated { .. } => None,
        other => Some(other),
    }
}

fn update_cursor(ui: &Ui, state: &ChartState, layout: &GanttLayout, origin: Pos2) {
    if state.drag.is_dragging() || state.pan.is_panning() {
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        return;
    }
    let Some(pos) = ui.input(|i| i.pointer.hover_pos()) else {
        return;
    };
    if !ui.clip_rect().contains(pos) {
        return;
    }
    let (x, y) = to_canvas(pos, origin);
    if let Some(hit) = layout.hit_test(x, y) {
        let icon = match hit.region {
            BoxRegion::Body => CursorIcon::Grab,
            BoxRegion::StartHandle | BoxRegion::EndHandle => CursorIcon::ResizeHorizontal,
        };
        ui.ctx().set_cursor_icon(icon);
    }
}

fn show_tooltip(
    ui: &Ui,
    state: &ChartState,
    layout: &GanttLayout,
    groups: &[TaskGroup],
    origin: Pos2,
    pos: Pos2,
) {
    let tip = if let Some(preview) = state.drag.preview() {
        find_task(groups, &preview.group_id, &preview.task_id)
            .map(|t| TaskTooltip::dragging(t, pos, &preview))
    } else {
        if !ui.clip_rect().contains(pos) {
            return;
        }
        let (x, y) = to_canvas(pos, origin);
        layout
            .hit_test(x, y)
            .and_then(|hit| find_task(groups, &hit.task_box.group_id, &hit.task_box.task_id))
            .map(|t| TaskTooltip::hover(t, pos))
    };
    if let Some(tip) = tip {
        egui::show_tooltip_at_pointer(
            ui.ctx(),
            ui.layer_id(),
            egui::Id::new(("task-tip", &tip.task.id)),
            |ui| tip.show(ui),
        );
    }
}

fn draw_group_bands(painter: &egui::Painter, origin: Pos2, layout: &GanttLayout, width: f32) {
    for (i, group) in layout.groups.iter().enumerate() {
        let y = origin.y + HEADER_HEIGHT + group.top_px;
        let fill = if i % 2 == 0 {
            theme::BG_PANEL
        } else {
            theme::BG_GROUP_ALT
        };
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, group.height_px)),
            0.0,
            fill,
        );
        painter.line_segment(
            [
                Pos2::new(origin.x, y + group.height_px),
                Pos2::new(origin.x + width, y + group.height_px),
            ],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

/// Header text for the grid line at `t`.
pub fn grid_label(mode: ViewMode, t: DateTime<Utc>) -> String {
    match mode {
        ViewMode::Minute => t.format("%H:%M").to_string(),
        ViewMode::Hour => t.format("%H:00").to_string(),
        ViewMode::Day => t.format("%d %b").to_string(),
        ViewMode::Week => t.format("W%V %Y").to_string(),
        ViewMode::Month => t.format("%b %Y").to_string(),
        ViewMode::Quarter => format!("Q{} {}", (t.month() - 1) / 3 + 1, t.year()),
        ViewMode::Year => t.format("%Y").to_string(),
    }
}

/// Visible slice of the time axis.
fn visible_range(scale: &TimeScale, origin: Pos2, visible: Rect) -> (DateTime<Utc>, DateTime<Utc>) {
    let left = (visible.left() - origin.x).max(0.0) as f64;
    let right = (visible.right() - origin.x).max(0.0) as f64;
    (scale.to_instant_exact(left), scale.to_instant_exact(right))
}

fn draw_grid(painter: &egui::Painter, origin: Pos2, scale: &TimeScale, visible: Rect, height: f32) {
    let mode = scale.view_mode();
    if (scale.duration_to_pixels(mode.nominal_unit()) as f32) < MIN_GRID_SPACING {
        return;
    }
    let (from, to) = visible_range(scale, origin, visible);
    for t in mode.grid_lines(from, to) {
        let x = origin.x + scale.to_pixel(t) as f32;
        painter.line_segment(
            [
                Pos2::new(x, origin.y + HEADER_HEIGHT),
                Pos2::new(x, origin.y + height),
            ],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
}

fn draw_header(painter: &egui::Painter, origin: Pos2, scale: &TimeScale, visible: Rect) {
    // Pinned to the top of the visible area so it stays put while scrolling vertically
    let top = visible.top().max(origin.y);
    let header = Rect::from_min_size(
        Pos2::new(visible.left(), top),
        Vec2::new(visible.width(), HEADER_HEIGHT),
    );
    painter.rect_filled(header, 0.0, theme::BG_HEADER);
    painter.line_segment(
        [header.left_bottom(), header.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let mode = scale.view_mode();
    let spacing = scale.duration_to_pixels(mode.nominal_unit()) as f32;
    if spacing < MIN_GRID_SPACING {
        return;
    }
    // Label every nth line so labels never overlap
    let stride = (MIN_LABEL_SPACING / spacing).ceil().max(1.0) as usize;
    let (from, to) = visible_range(scale, origin, visible);
    for (i, t) in mode.grid_lines(from, to).into_iter().enumerate() {
        let x = origin.x + scale.to_pixel(t) as f32;
        painter.line_segment(
            [Pos2::new(x, top + HEADER_HEIGHT - 8.0), Pos2::new(x, top + HEADER_HEIGHT)],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
        if i % stride == 0 {
            painter.text(
                Pos2::new(x + 4.0, top + HEADER_HEIGHT / 2.0),
                egui::Align2::LEFT_CENTER,
                grid_label(mode, t),
                theme::font_header(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, scale: &TimeScale, height: f32) {
    let now = Utc::now();
    let viewport = scale.viewport();
    if now < viewport.start || now > viewport.end {
        return;
    }
    let x = origin.x + scale.to_pixel(now) as f32;
    painter.line_segment(
        [
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Pos2::new(x, origin.y + height),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );
}

fn box_rect(origin: Pos2, task_box: &TaskBox) -> Rect {
    Rect::from_min_size(
        Pos2::new(origin.x + task_box.left_px, origin.y + HEADER_HEIGHT + task_box.top_px),
        Vec2::new(task_box.width_px, task_box.height_px),
    )
}

/// Finish-to-start connectors. Tasks on a dependency cycle get none.
fn draw_dependencies(
    painter: &egui::Painter,
    origin: Pos2,
    layout: &GanttLayout,
    groups: &[TaskGroup],
    cyclic: &BTreeSet<&str>,
) {
    let stroke = Stroke::new(1.2, theme::DEPENDENCY_LINE);
    for target in &layout.boxes {
        if cyclic.contains(target.task_id.as_str()) {
            continue;
        }
        let Some(task) = groups
            .get(target.group_index)
            .and_then(|g| g.tasks.get(target.task_index))
        else {
            continue;
        };
        for dep in &task.dependencies {
            let Some(source) = layout.boxes.iter().find(|b| &b.task_id == dep) else {
                continue;
            };
            let from = box_rect(origin, source).right_center();
            let to = box_rect(origin, target).left_center();
            let elbow = Pos2::new(from.x + 8.0, from.y);
            painter.line_segment([from, elbow], stroke);
            painter.line_segment([elbow, Pos2::new(elbow.x, to.y)], stroke);
            painter.arrow(Pos2::new(elbow.x, to.y), Vec2::new(to.x - elbow.x, 0.0), stroke);
        }
    }
}

fn draw_task_box(
    painter: &egui::Painter,
    origin: Pos2,
    task_box: &TaskBox,
    task: &Task,
    style: TaskStyle,
    show_progress: bool,
) {
    let rect = box_rect(origin, task_box);
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    if style.elevated {
        painter.rect_filled(rect.translate(Vec2::new(1.5, 3.0)), rounding, Color32::from_black_alpha(70));
    }
    painter.rect_filled(rect, rounding, style.background);

    if show_progress && task.percent > 0.0 {
        let progress_width = rect.width() * (task.percent / 100.0).clamp(0.0, 1.0);
        let progress_rect = Rect::from_min_size(rect.min, Vec2::new(progress_width, rect.height()));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    let border_width = if style.emphasized { 2.0 } else { 1.0 };
    painter.rect_stroke(rect, rounding, Stroke::new(border_width, style.border));

    if rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), style.text);
        let clipped = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
        let text_y = rect.top() + (rect.height() - galley.size().y) / 2.0;
        clipped.galley(Pos2::new(rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }
}
