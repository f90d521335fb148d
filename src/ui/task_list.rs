use egui::{Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::config::GanttConfig;
use crate::layout::GanttLayout;
use crate::model::TaskGroup;
use crate::ui::theme;
use crate::ui::tooltip::show_group_tooltip;

/// Actions that the task list can request.
pub enum TaskListAction {
    None,
    /// Scroll the chart so this group is at the top.
    Focus(String),
}

/// Render the left-side group list, row heights matching the chart.
///
/// `scroll_top` is the chart's vertical scroll so both sides stay aligned.
pub fn show_task_list(
    groups: &[TaskGroup],
    layout: &GanttLayout,
    config: &GanttConfig,
    scroll_top: f32,
    ui: &mut Ui,
) -> TaskListAction {
    let mut action = TaskListAction::None;

    // Header area, same height as the chart header
    let (header_rect, _) =
        ui.allocate_exact_size(Vec2::new(ui.available_width(), theme::HEADER_HEIGHT), Sense::hover());
    ui.painter().rect_filled(header_rect, 0.0, theme::BG_HEADER);
    ui.painter().text(
        Pos2::new(header_rect.left() + 10.0, header_rect.center().y),
        egui::Align2::LEFT_CENTER,
        &config.header_label,
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );

    egui::ScrollArea::vertical()
        .id_salt("task-list")
        .auto_shrink([false, false])
        .enable_scrolling(false)
        .vertical_scroll_offset(scroll_top)
        .show(ui, |ui| {
            let width = ui.available_width();
            for (i, group_layout) in layout.groups.iter().enumerate() {
                let Some(group) = groups.get(group_layout.group_index) else {
                    continue;
                };
                let (rect, response) = ui.allocate_exact_size(
                    Vec2::new(width, group_layout.height_px),
                    Sense::click(),
                );

                let fill = if response.hovered() {
                    theme::BG_ROW_HOVER
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_GROUP_ALT
                };
                ui.painter().rect_filled(rect, 0.0, fill);
                ui.painter().line_segment(
                    [rect.left_bottom(), rect.right_bottom()],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );
                draw_group_entry(ui, rect, group, group_layout.row_count, config);

                let response = if config.show_tooltip_group {
                    response.on_hover_ui(|ui| show_group_tooltip(group, ui))
                } else {
                    response
                };
                if response.clicked() {
                    action = TaskListAction::Focus(group.id.clone());
                }
            }
        });

    action
}

fn draw_group_entry(ui: &Ui, rect: Rect, group: &TaskGroup, row_count: usize, config: &GanttConfig) {
    let painter = ui.painter().with_clip_rect(rect);
    let mut x = rect.left() + 10.0;
    let name_y = if config.show_description && group.description.is_some() {
        rect.top() + 18.0
    } else {
        rect.center().y
    };

    if config.show_icon {
        if let Some(icon) = &group.icon {
            let galley = painter.layout_no_wrap(icon.clone(), theme::font_header(), theme::TEXT_SECONDARY);
            let w = galley.size().x;
            painter.galley(
                Pos2::new(x, name_y - galley.size().y / 2.0),
                galley,
                theme::TEXT_SECONDARY,
            );
            x += w + 6.0;
        }
    }

    painter.text(
        Pos2::new(x, name_y),
        egui::Align2::LEFT_CENTER,
        group.display_name(),
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );

    if config.show_description {
        if let Some(description) = &group.description {
            painter.text(
                Pos2::new(x, name_y + 16.0),
                egui::Align2::LEFT_CENTER,
                description,
                theme::font_sub(),
                theme::TEXT_DIM,
            );
        }
    }

    if config.show_task_count && !group.tasks.is_empty() {
        let label = format!("{} · {} rows", group.tasks.len(), row_count);
        painter.text(
            Pos2::new(rect.right() - 10.0, name_y),
            egui::Align2::RIGHT_CENTER,
            label,
            theme::font_small(),
            theme::TEXT_DIM,
        );
    }
}
