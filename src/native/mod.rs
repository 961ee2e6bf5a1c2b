pub mod app;
mod geometry;
mod icon;
#[cfg(feature = "tray")]
mod tray;

pub use app::{configure_native_context, QuickWinApp};
pub use icon::IconImage;

use anyhow::Result;
use eframe::egui::{IconData, ViewportBuilder};

use crate::cli::LaunchOptions;
use crate::controller::Launcher;

const DEFAULT_SIZE: [f32; 2] = [320.0, 480.0];
const MIN_SIZE: [f32; 2] = [200.0, 160.0];

fn viewport_for(launcher: &Launcher, title: &str, icon: &IconImage) -> ViewportBuilder {
    let mut viewport = ViewportBuilder::default()
        .with_title(title)
        .with_inner_size(DEFAULT_SIZE)
        .with_min_inner_size(MIN_SIZE)
        .with_icon(IconData {
            rgba: icon.rgba.clone(),
            width: icon.width,
            height: icon.height,
        });
    if let Some(geo) = launcher.config().geometry {
        viewport = viewport
            .with_position([geo.x as f32, geo.y as f32])
            .with_inner_size([geo.width as f32, geo.height as f32]);
    }
    viewport
}

/// Opens the launcher window and runs the GUI loop until it closes.
pub fn run(launcher: Launcher, opts: &LaunchOptions) -> Result<()> {
    let title = opts.window_title().to_string();
    let icon = IconImage::load_or_fallback(opts.icon.as_deref());
    let options = eframe::NativeOptions {
        viewport: viewport_for(&launcher, &title, &icon),
        ..Default::default()
    };

    let app_name = title.clone();
    eframe::run_native(
        &app_name,
        options,
        Box::new(move |cc| {
            configure_native_context(&cc.egui_ctx);
            let app = QuickWinApp::new(launcher);
            #[cfg(feature = "tray")]
            let app = match tray::start(&cc.egui_ctx, icon, title) {
                Ok(handle) => app.with_tray(handle),
                Err(err) => {
                    tracing::warn!(error = ?err, "running without tray icon");
                    app
                }
            };
            #[cfg(not(feature = "tray"))]
            let _ = (icon, title);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!(err.to_string()))
}
