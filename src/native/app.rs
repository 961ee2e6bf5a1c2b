use eframe::egui::{
    self, Color32, Context, FontFamily, FontId, Id, Key, RichText, TextEdit, TextStyle,
    TopBottomPanel, ViewportCommand,
};
use std::time::Instant;

use super::geometry::{
    flush_geometry, geometry_from_viewport, persist_on_hide, store_geometry, GeometryTracker,
};
use crate::controller::{LaunchOutcome, Launcher, Row};
use crate::launcher::{DetachedSpawner, Spawner};

#[cfg(feature = "tray")]
use super::tray::{TrayCommand, TrayHandle};

#[derive(Debug, Default)]
struct SettingsWindow {
    open: bool,
    home_draft: String,
    status: String,
}

pub fn configure_native_context(ctx: &Context) {
    let mut style = (*ctx.style()).clone();
    style.text_styles = [
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
    ]
    .into();
    ctx.set_style(style);
}

pub struct QuickWinApp {
    launcher: Launcher,
    spawner: Box<dyn Spawner>,
    geometry: GeometryTracker,
    settings: SettingsWindow,
    status: String,
    visible: bool,
    #[cfg(feature = "tray")]
    tray: Option<TrayHandle>,
}

impl QuickWinApp {
    pub fn new(launcher: Launcher) -> Self {
        let geometry = GeometryTracker::new(launcher.config().geometry);
        let visible = launcher.window_open();
        Self {
            launcher,
            spawner: Box::new(DetachedSpawner),
            geometry,
            settings: SettingsWindow::default(),
            status: String::new(),
            visible,
            #[cfg(feature = "tray")]
            tray: None,
        }
    }

    #[cfg(feature = "tray")]
    pub fn with_tray(mut self, tray: TrayHandle) -> Self {
        self.tray = Some(tray);
        self
    }

    fn has_tray(&self) -> bool {
        #[cfg(feature = "tray")]
        {
            self.tray.is_some()
        }
        #[cfg(not(feature = "tray"))]
        {
            false
        }
    }

    fn flush_geometry(&mut self) {
        flush_geometry(&mut self.launcher, &mut self.geometry);
    }

    fn track_geometry(&mut self, ctx: &Context) {
        let now = Instant::now();
        if let Some(current) = ctx.input(|i| geometry_from_viewport(i.viewport())) {
            self.geometry.observe(current, now);
        }
        if let Some(due) = self.geometry.due(now) {
            store_geometry(&mut self.launcher, &mut self.geometry, due);
        }
        if let Some(deadline) = self.geometry.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    /// Applies the controller's window-open flag to the native window.
    fn sync_visibility(&mut self, ctx: &Context) {
        let open = self.launcher.window_open();
        if open == self.visible {
            return;
        }
        if !open {
            persist_on_hide(&mut self.launcher, &mut self.geometry);
        }
        self.visible = open;
        ctx.send_viewport_cmd(ViewportCommand::Visible(open));
        if open {
            ctx.send_viewport_cmd(ViewportCommand::Focus);
        }
    }

    fn hide_window(&mut self) {
        self.launcher.set_window_open(false);
    }

    fn launch_selection(&mut self) {
        self.status = match self.launcher.load_selection(self.spawner.as_mut()) {
            LaunchOutcome::Relisted => "Nothing launchable selected.".to_string(),
            LaunchOutcome::Launched { started, failed: 0 } => format!("Launched {started}."),
            LaunchOutcome::Launched { started, failed } => {
                format!("Launched {started}, {failed} failed.")
            }
        };
    }

    fn open_settings(&mut self) {
        self.settings.home_draft = self.launcher.home().display().to_string();
        self.settings.status.clear();
        self.settings.open = true;
    }

    fn close_settings(&mut self) {
        self.settings.open = false;
        self.launcher.refresh();
    }

    fn apply_settings(&mut self) {
        self.settings.status = match self.launcher.apply_home(&self.settings.home_draft) {
            Ok(()) => "Settings saved.".to_string(),
            Err(err) => format!("Error: {err:#}"),
        };
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        if self.settings.open {
            return;
        }
        let (launch, back, home, enter, escape) = ctx.input(|i| {
            let ctrl = i.modifiers.command || i.modifiers.ctrl;
            (
                ctrl && i.key_pressed(Key::L),
                ctrl && i.key_pressed(Key::B),
                ctrl && i.key_pressed(Key::H),
                i.key_pressed(Key::Enter),
                i.key_pressed(Key::Escape),
            )
        });
        if launch || enter {
            self.launch_selection();
        }
        if back {
            self.launcher.go_back();
        }
        if home {
            self.launcher.go_home();
        }
        if escape && self.has_tray() {
            self.hide_window();
        }
    }

    #[cfg(feature = "tray")]
    fn handle_tray(&mut self, ctx: &Context) {
        let commands = match &self.tray {
            Some(tray) => tray.poll(),
            None => return,
        };
        for cmd in commands {
            match cmd {
                TrayCommand::ToggleWindow => {
                    self.launcher.toggle_visibility();
                }
                TrayCommand::Quit => {
                    self.flush_geometry();
                    ctx.send_viewport_cmd(ViewportCommand::Close);
                }
            }
        }
    }

    fn draw_top_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("quickwin_top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Home").clicked() {
                    self.launcher.go_home();
                }
                if ui.button("Back").clicked() {
                    self.launcher.go_back();
                }
                if ui.button("Settings").clicked() {
                    self.open_settings();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        self.flush_geometry();
                        ctx.send_viewport_cmd(ViewportCommand::Close);
                    }
                });
            });
            ui.small(self.launcher.current_dir().display().to_string());
        });
    }

    fn draw_footer(&self, ctx: &Context) {
        TopBottomPanel::bottom("quickwin_footer").show(ctx, |ui| {
            if self.status.is_empty() {
                ui.small("Double-click or Ctrl+L to launch.");
            } else {
                ui.small(&self.status);
            }
        });
    }

    fn draw_file_list(&mut self, ctx: &Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let additive = ui.input(|i| i.modifiers.command || i.modifiers.ctrl);
                for (idx, row) in self.launcher.rows().into_iter().enumerate() {
                    let response = match &row {
                        Row::Entry(name) => {
                            ui.selectable_label(self.launcher.is_selected(idx), name)
                        }
                        Row::Empty => ui.label(RichText::new(row.label()).color(Color32::GRAY)),
                    };
                    if response.clicked() {
                        self.launcher.select(idx, additive);
                    }
                    if response.double_clicked() {
                        self.launcher.select(idx, false);
                        self.launch_selection();
                    }
                }
            });
        });
    }

    fn draw_settings(&mut self, ctx: &Context) {
        if !self.settings.open {
            return;
        }
        let mut open = self.settings.open;
        let mut apply = false;
        let mut close = false;
        egui::Window::new("Settings")
            .id(Id::new("quickwin_settings"))
            .open(&mut open)
            .collapsible(false)
            .default_size([360.0, 140.0])
            .show(ctx, |ui| {
                ui.label("Home folder");
                ui.add(
                    TextEdit::singleline(&mut self.settings.home_draft)
                        .desired_width(f32::INFINITY),
                );
                ui.horizontal(|ui| {
                    apply = ui.button("Apply").clicked();
                    close = ui.button("Close").clicked();
                });
                if !self.settings.status.is_empty() {
                    ui.small(&self.settings.status);
                }
            });
        if apply {
            self.apply_settings();
        }
        if close || !open {
            self.close_settings();
        }
    }
}

impl eframe::App for QuickWinApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        #[cfg(feature = "tray")]
        self.handle_tray(ctx);
        self.sync_visibility(ctx);
        if !self.visible {
            return;
        }

        self.track_geometry(ctx);
        self.handle_shortcuts(ctx);

        self.draw_top_bar(ctx);
        self.draw_footer(ctx);
        self.draw_file_list(ctx);
        self.draw_settings(ctx);
        self.sync_visibility(ctx);

        if ctx.input(|i| i.viewport().close_requested()) {
            self.flush_geometry();
        }
    }
}
