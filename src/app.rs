use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};

use crate::config::{default_config_path, GanttConfig};
use crate::error::Diagnostic;
use crate::interaction::{DragOutcome, GanttHandler, PointerEvent, ScrollOffset, ScrollSurface};
use crate::layout::layout_groups;
use crate::model::task::time_bounds;
use crate::model::{check_dependencies, DependencyReport, Task, TaskGroup, TimeScale, ViewMode, Viewport};
use crate::ui;

/// Turns controller callbacks into status bar messages.
#[derive(Debug, Default)]
pub struct StatusHandler {
    messages: Vec<String>,
}

impl StatusHandler {
    fn take_last(&mut self) -> Option<String> {
        let last = self.messages.pop();
        self.messages.clear();
        last
    }
}

impl GanttHandler for StatusHandler {
    fn on_task_update(&mut self, _group_id: &str, task: &Task) {
        self.messages.push(format!(
            "Updated '{}' ({} → {})",
            task.name,
            task.start_date.format("%Y-%m-%d %H:%M"),
            task.end_date.format("%Y-%m-%d %H:%M"),
        ));
    }

    fn on_task_select(&mut self, task: &Task, is_selected: bool) {
        if is_selected {
            self.messages.push(format!("Selected '{}'", task.name));
        }
    }

    fn on_task_right_click(&mut self, _event: &PointerEvent, task: &Task, group: &TaskGroup) {
        self.messages
            .push(format!("'{}' in {} ({:.0}% complete)", task.name, group.display_name(), task.percent));
    }
}

/// Main application state.
pub struct GanttApp {
    pub groups: Vec<TaskGroup>,
    pub config: GanttConfig,
    pub view_mode: ViewMode,
    pub viewport: Viewport,
    pub file_path: Option<PathBuf>,

    pub chart: ui::ChartState,
    pub handler: StatusHandler,
    pub dependencies: DependencyReport,
    pub diagnostics: Vec<Diagnostic>,

    // Status message
    pub status_message: String,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let mut diagnostics = Vec::new();
        let config = match default_config_path().map(|p| GanttConfig::load(&p)) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!(%e, "config unusable, using defaults");
                diagnostics.push(Diagnostic::error(format!("config: {e}")));
                GanttConfig::default()
            }
            None => GanttConfig::default(),
        };

        let mut app = Self::with_groups(Self::sample_groups(Utc::now()), config);
        app.diagnostics.extend(diagnostics);
        app
    }

    /// App state around `groups`, without touching the egui context.
    ///
    /// A config that fails validation is replaced by the defaults and reported
    /// as a diagnostic.
    pub fn with_groups(groups: Vec<TaskGroup>, config: GanttConfig) -> Self {
        let (config, chart, rejected) = match ui::ChartState::new(&config) {
            Ok(chart) => (config, chart, None),
            Err(e) => {
                tracing::warn!(%e, "config rejected, using defaults");
                let diagnostic = Diagnostic::error(format!("config: {e}"));
                (GanttConfig::default(), ui::ChartState::default(), Some(diagnostic))
            }
        };
        let view_mode = config.view_mode;
        let mut app = Self {
            viewport: Viewport::fit(time_bounds(&groups), view_mode, Utc::now()),
            chart,
            dependencies: DependencyReport::default(),
            groups,
            config,
            view_mode,
            file_path: None,
            handler: StatusHandler::default(),
            diagnostics: Vec::new(),
            status_message: "Ready".to_string(),
        };
        app.refresh_diagnostics();
        app.diagnostics.extend(rejected);
        app
    }

    /// Generate sample groups for demonstration.
    fn sample_groups(now: DateTime<Utc>) -> Vec<TaskGroup> {
        let day = ViewMode::Day.floor(now);
        let at = |days: i64, hours: i64| day + Duration::days(days) + Duration::hours(hours);
        let mut crane = TaskGroup::new("crane", "Tower crane").with_tasks(vec![
            Task::new("foundation", "Foundation lift", at(0, 8), at(3, 16)).with_percent(100.0),
            Task::new("frame", "Steel frame", at(2, 8), at(9, 16))
                .with_percent(40.0)
                .with_dependencies(["foundation"]),
            Task::new("roof", "Roof trusses", at(10, 8), at(13, 16)).with_dependencies(["frame"]),
        ]);
        crane.icon = Some(egui_phosphor::regular::BUILDINGS.to_string());

        let mut crew = TaskGroup::new("crew-a", "Crew A").with_tasks(vec![
            Task::new("survey", "Site survey", at(-2, 8), at(0, 16)).with_percent(100.0),
            Task::new("rebar", "Rebar", at(1, 8), at(4, 16))
                .with_color("#a855f7")
                .with_percent(70.0),
            Task::new("pour", "Concrete pour", at(3, 8), at(5, 12))
                .with_color("#f97316")
                .with_dependencies(["rebar"]),
            Task::new("cladding", "Cladding", at(9, 8), at(15, 16)).with_dependencies(["frame"]),
        ]);
        crew.icon = Some(egui_phosphor::regular::USERS_THREE.to_string());
        crew.description = Some("Formwork and concrete".to_string());

        vec![crane, crew, TaskGroup::new("inspection", "Inspection")]
    }

    fn refresh_diagnostics(&mut self) {
        self.dependencies = check_dependencies(&self.groups);
        let mut diagnostics = self.dependencies.diagnostics();
        if let Ok(scale) = TimeScale::new(self.viewport, self.view_mode) {
            diagnostics.extend(layout_groups(&self.groups, &scale, &self.config).diagnostics);
        }
        for d in &diagnostics {
            tracing::debug!(diagnostic = %d, "task set diagnostic");
        }
        self.diagnostics = diagnostics;
    }

    fn replace_groups(&mut self, groups: Vec<TaskGroup>) {
        self.groups = groups;
        // Dropping the old state tears down any session it held
        self.chart = ui::ChartState::new(&self.config).unwrap_or_else(|e| {
            tracing::warn!(%e, "config rejected, chart uses defaults");
            ui::ChartState::default()
        });
        self.fit_viewport();
        self.refresh_diagnostics();
    }

    pub fn fit_viewport(&mut self) {
        self.viewport = Viewport::fit(time_bounds(&self.groups), self.view_mode, Utc::now());
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode == mode {
            return;
        }
        self.view_mode = mode;
        self.config.view_mode = mode;
        self.fit_viewport();
        self.refresh_diagnostics();
        self.status_message = format!("View: {}", mode.label());
        if let Some(path) = default_config_path() {
            if let Err(e) = self.config.save(&path) {
                tracing::warn!(%e, "could not persist config");
            }
        }
    }

    // --- File operations ---

    pub fn open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline", &["json"])
            .pick_file()
        {
            match crate::io::load_groups(&path) {
                Ok(loaded) => {
                    let skipped = loaded.diagnostics.len();
                    self.replace_groups(loaded.groups);
                    self.diagnostics.extend(loaded.diagnostics);
                    self.file_path = Some(path);
                    self.status_message = if skipped > 0 {
                        format!("Loaded with {} problems", skipped)
                    } else {
                        "Loaded".to_string()
                    };
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_file(&mut self) {
        if let Some(path) = self.file_path.clone() {
            match crate::io::save_groups(&self.groups, &path) {
                Ok(()) => self.status_message = "Saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        } else {
            self.save_file_as();
        }
    }

    pub fn save_file_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline", &["json"])
            .set_file_name("timeline.json")
            .save_file()
        {
            match crate::io::save_groups(&self.groups, &path) {
                Ok(()) => {
                    self.file_path = Some(path);
                    self.status_message = "Saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    pub fn import_csv(&mut self) {
        // Guard: if there are tasks, confirm before replacing
        if self.groups.iter().any(|g| !g.tasks.is_empty()) {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current timeline. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match crate::io::import_csv(&path) {
                Ok(import) => {
                    let count: usize = import.groups.iter().map(|g| g.tasks.len()).sum();
                    self.replace_groups(import.groups);
                    self.diagnostics.extend(import.diagnostics);
                    self.file_path = None;
                    self.status_message = if import.skipped > 0 {
                        format!("Imported {} tasks ({} rows skipped)", count, import.skipped)
                    } else {
                        format!("Imported {} tasks", count)
                    };
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.groups.iter().all(|g| g.tasks.is_empty()) {
            self.status_message = "Nothing to export, there are no tasks".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("timeline.csv")
            .save_file()
        {
            match crate::io::export_csv(&self.groups, &path) {
                Ok(count) => {
                    self.status_message = format!("Exported {} tasks to CSV", count);
                }
                Err(e) => {
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    fn focus_group(&mut self, group_id: &str) {
        let Ok(scale) = TimeScale::new(self.viewport, self.view_mode) else {
            return;
        };
        let layout = layout_groups(&self.groups, &scale, &self.config);
        if let Some(group) = layout.group(group_id) {
            let surface = self.chart.pan.surface_mut();
            let left = surface.scroll_offset().left;
            let target = ScrollOffset::new(left, group.top_px as f64).clamped(surface.max_scroll());
            surface.set_scroll_offset(target);
        }
    }

    fn apply_interaction(&mut self, interaction: &ui::ChartInteraction) {
        for outcome in &interaction.outcomes {
            match outcome {
                DragOutcome::Rejected => self.status_message = "Change rejected".to_string(),
                DragOutcome::Cancelled => self.status_message = "Edit cancelled".to_string(),
                DragOutcome::SelectionChanged { selected: false, .. } => {
                    self.status_message = "Selection cleared".to_string()
                }
                _ => {}
            }
        }
        if let Some(message) = self.handler.take_last() {
            self.status_message = message;
        }
        if interaction.changed() {
            self.refresh_diagnostics();
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_file();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && self.chart.drag.is_dragging() {
            self.chart.drag.teardown();
            self.status_message = "Edit cancelled".to_string();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let tasks: usize = self.groups.iter().map(|g| g.tasks.len()).sum();
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", tasks))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        if !self.diagnostics.is_empty() {
                            let label = ui.label(
                                egui::RichText::new(format!(
                                    "{} {}",
                                    egui_phosphor::regular::WARNING,
                                    self.diagnostics.len()
                                ))
                                .size(10.5)
                                .color(ui::theme::WARNING),
                            );
                            label.on_hover_ui(|ui| {
                                for d in self.diagnostics.iter().take(20) {
                                    ui.label(d.to_string());
                                }
                            });
                        }
                    });
                });
            });

        let scale = match TimeScale::new(self.viewport, self.view_mode) {
            Ok(scale) => scale,
            Err(e) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.label(format!("Cannot draw timeline: {e}"));
                });
                return;
            }
        };
        let layout = layout_groups(&self.groups, &scale, &self.config);
        let scroll_top = self.chart.pan.surface().scroll_offset().top as f32;

        // Left panel: group list
        let mut list_action = ui::task_list::TaskListAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                list_action =
                    ui::task_list::show_task_list(&self.groups, &layout, &self.config, scroll_top, ui);
            });
        if let ui::task_list::TaskListAction::Focus(group_id) = list_action {
            self.focus_group(&group_id);
        }

        // Central panel: timeline
        let cyclic: Vec<String> = self
            .dependencies
            .cyclic_tasks()
            .into_iter()
            .map(str::to_string)
            .collect();
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let mut interaction = ui::ChartInteraction::default();
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            // Ctrl+scroll zooms
            if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
                let delta = ui.input(|i| i.smooth_scroll_delta.y);
                if delta > 0.0 {
                    self.viewport.zoom_in();
                } else if delta < 0.0 {
                    self.viewport.zoom_out();
                }
            }
            let cyclic = cyclic.iter().map(String::as_str).collect();
            interaction = ui::show_gantt_chart(
                &mut self.chart,
                &mut self.groups,
                &self.config,
                &scale,
                &cyclic,
                &mut self.handler,
                ui,
            );
        });
        self.apply_interaction(&interaction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_groups_are_consistent() {
        let groups = GanttApp::sample_groups(Utc::now());
        assert!(check_dependencies(&groups).is_acyclic());
        assert!(check_dependencies(&groups).missing.is_empty());
        assert!(groups.iter().flat_map(|g| &g.tasks).all(Task::is_well_formed));
    }

    #[test]
    fn view_mode_switch_refits_viewport() {
        let mut app = GanttApp::with_groups(GanttApp::sample_groups(Utc::now()), GanttConfig::default());
        let month_span = app.viewport.span();
        app.view_mode = ViewMode::Hour;
        app.fit_viewport();
        assert!(app.viewport.span() < month_span);
        assert!(app.diagnostics.is_empty());
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let config = GanttConfig {
            min_duration_ms: -3_600_000,
            ..GanttConfig::default()
        };
        let app = GanttApp::with_groups(GanttApp::sample_groups(Utc::now()), config);
        assert_eq!(app.config.min_duration_ms, GanttConfig::default().min_duration_ms);
        assert!(app
            .diagnostics
            .iter()
            .any(|d| d.message.starts_with("config: Invalid configuration")));
    }

    #[test]
    fn status_handler_reports_last_event() {
        let mut handler = StatusHandler::default();
        let t = Utc::now();
        let task = Task::new("a", "Pour", t, t);
        handler.on_task_select(&task, true);
        handler.on_task_update("g", &task);
        assert!(handler.take_last().is_some_and(|m| m.starts_with("Updated 'Pour'")));
        assert!(handler.take_last().is_none());
    }
}
