//! Status icon that shows and hides the launcher window.
//!
//! tray-icon delivers clicks and menu picks through global handlers; both are
//! forwarded into a channel the GUI loop drains each frame, and the egui
//! context is woken so a hidden window still processes them.

use anyhow::{Context, Result};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};

use super::icon::IconImage;

const MENU_TOGGLE: &str = "toggle";
const MENU_QUIT: &str = "quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    ToggleWindow,
    Quit,
}

pub struct TrayHandle {
    commands: Receiver<TrayCommand>,
    // On Linux the icon lives on the GTK thread instead.
    _icon: Option<TrayIcon>,
}

impl TrayHandle {
    pub fn poll(&self) -> Vec<TrayCommand> {
        self.commands.try_iter().collect()
    }
}

fn menu_command(id: &str) -> Option<TrayCommand> {
    match id {
        MENU_TOGGLE => Some(TrayCommand::ToggleWindow),
        MENU_QUIT => Some(TrayCommand::Quit),
        _ => None,
    }
}

fn install_handlers(ctx: egui::Context, tx: Sender<TrayCommand>) {
    let click_tx = tx.clone();
    let click_ctx = ctx.clone();
    TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
        if let TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        } = event
        {
            let _ = click_tx.send(TrayCommand::ToggleWindow);
            click_ctx.request_repaint();
        }
    }));
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        if let Some(cmd) = menu_command(event.id.0.as_str()) {
            let _ = tx.send(cmd);
            ctx.request_repaint();
        }
    }));
}

fn build_icon(image: IconImage, tooltip: &str) -> Result<TrayIcon> {
    let icon = Icon::from_rgba(image.rgba, image.width, image.height)
        .context("creating tray icon image")?;
    let menu = Menu::new();
    menu.append(&MenuItem::with_id(MENU_TOGGLE, "Show/Hide", true, None))?;
    menu.append(&PredefinedMenuItem::separator())?;
    menu.append(&MenuItem::with_id(MENU_QUIT, "Quit", true, None))?;
    TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip(tooltip)
        .with_icon(icon)
        .with_menu_on_left_click(false)
        .build()
        .context("building tray icon")
}

#[cfg(target_os = "linux")]
pub fn start(ctx: &egui::Context, image: IconImage, tooltip: String) -> Result<TrayHandle> {
    let (tx, rx) = channel();
    install_handlers(ctx.clone(), tx);
    std::thread::Builder::new()
        .name("quickwin-tray".to_string())
        .spawn(move || {
            if let Err(err) = gtk::init() {
                tracing::warn!(error = %err, "GTK unavailable; running without tray icon");
                return;
            }
            match build_icon(image, &tooltip) {
                Ok(_icon) => gtk::main(),
                Err(err) => tracing::warn!(error = ?err, "tray icon not created"),
            }
        })
        .context("spawning tray thread")?;
    Ok(TrayHandle {
        commands: rx,
        _icon: None,
    })
}

#[cfg(not(target_os = "linux"))]
pub fn start(ctx: &egui::Context, image: IconImage, tooltip: String) -> Result<TrayHandle> {
    let (tx, rx) = channel();
    install_handlers(ctx.clone(), tx);
    let icon = build_icon(image, &tooltip)?;
    Ok(TrayHandle {
        commands: rx,
        _icon: Some(icon),
    })
}
