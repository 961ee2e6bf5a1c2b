use eframe::egui::ViewportInfo;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::WindowGeometry;
use crate::controller::Launcher;

/// How long the window must stay put before its new geometry is written.
pub const SETTLE_DELAY: Duration = Duration::from_millis(750);

/// Outer position plus inner size, matching what `ViewportBuilder` restores.
pub fn geometry_from_viewport(info: &ViewportInfo) -> Option<WindowGeometry> {
    let outer = info.outer_rect?;
    let inner = info.inner_rect?;
    let width = inner.width().round();
    let height = inner.height().round();
    if width < 1.0 || height < 1.0 {
        return None;
    }
    Some(WindowGeometry {
        x: outer.min.x.round() as i32,
        y: outer.min.y.round() as i32,
        width: width as u32,
        height: height as u32,
    })
}

#[derive(Debug, Clone, Default)]
pub struct GeometryTracker {
    saved: Option<WindowGeometry>,
    pending: Option<(WindowGeometry, Instant)>,
}

impl GeometryTracker {
    pub fn new(saved: Option<WindowGeometry>) -> Self {
        Self {
            saved,
            pending: None,
        }
    }

    /// Records the window's current geometry. A change restarts the settle
    /// timer; returning to the saved geometry drops the pending write.
    pub fn observe(&mut self, current: WindowGeometry, now: Instant) {
        if self.saved == Some(current) {
            self.pending = None;
            return;
        }
        match self.pending {
            Some((geo, _)) if geo == current => {}
            _ => self.pending = Some((current, now)),
        }
    }

    /// Pending geometry that has been stable for [`SETTLE_DELAY`].
    pub fn due(&mut self, now: Instant) -> Option<WindowGeometry> {
        let (geo, since) = self.pending?;
        if now.saturating_duration_since(since) < SETTLE_DELAY {
            return None;
        }
        self.pending = None;
        Some(geo)
    }

    /// Pending geometry regardless of the timer; used on hide and close.
    pub fn flush(&mut self) -> Option<WindowGeometry> {
        self.pending.take().map(|(geo, _)| geo)
    }

    pub fn mark_saved(&mut self, geometry: WindowGeometry) {
        self.saved = Some(geometry);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, since)| since + SETTLE_DELAY)
    }
}

/// Writes `geometry` to the config and records it as saved.
pub fn store_geometry(
    launcher: &mut Launcher,
    tracker: &mut GeometryTracker,
    geometry: WindowGeometry,
) {
    match launcher.save_geometry(geometry) {
        Ok(()) => tracker.mark_saved(geometry),
        Err(err) => warn!(error = ?err, "could not save window geometry"),
    }
}

/// Writes any pending geometry without waiting for the settle timer.
pub fn flush_geometry(launcher: &mut Launcher, tracker: &mut GeometryTracker) {
    if let Some(geometry) = tracker.flush() {
        store_geometry(launcher, tracker, geometry);
    }
}

/// Runs when the window is hidden: pending geometry is saved and the folder
/// is listed again so the list is current the next time it is shown.
pub fn persist_on_hide(launcher: &mut Launcher, tracker: &mut GeometryTracker) {
    flush_geometry(launcher, tracker);
    launcher.refresh();
}
