use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::app::GanttApp;
use crate::model::ViewMode;
use crate::ui::theme;

fn mode_icon(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Minute => icons::TIMER,
        ViewMode::Hour => icons::CLOCK,
        ViewMode::Day => icons::CALENDAR_BLANK,
        ViewMode::Week | ViewMode::Month | ViewMode::Quarter | ViewMode::Year => icons::CALENDAR,
    }
}

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Open...", icons::FOLDER_OPEN)).clicked() {
                app.open_file();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Save          Ctrl+S", icons::FLOPPY_DISK)).clicked() {
                app.save_file();
                ui.close_menu();
            }
            if ui.button("     Save As...").clicked() {
                app.save_file_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import CSV...", icons::FILE_CSV)).clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button(format!("{}  Export CSV...", icons::EXPORT)).clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Zoom In", icons::MAGNIFYING_GLASS_PLUS)).clicked() {
                app.viewport.zoom_in();
                ui.close_menu();
            }
            if ui.button(format!("{}  Zoom Out", icons::MAGNIFYING_GLASS_MINUS)).clicked() {
                app.viewport.zoom_out();
                ui.close_menu();
            }
            if ui.button("     Fit to Tasks").clicked() {
                app.fit_viewport();
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Time Scale").small().weak());
            for mode in ViewMode::ALL {
                if ui.radio(app.view_mode == mode, mode.label()).clicked() {
                    app.set_view_mode(mode);
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        // Quick view mode switch
        for mode in ViewMode::ALL {
            let text = RichText::new(format!("{} {}", mode_icon(mode), mode.label())).size(11.5);
            if ui.selectable_label(app.view_mode == mode, text).clicked() {
                app.set_view_mode(mode);
            }
        }

        // Right-aligned file name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let name = app
                .file_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "(unsaved)".to_string());
            ui.label(RichText::new(name).size(11.0).weak());
        });
    });
}
