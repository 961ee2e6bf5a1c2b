//! State behind the launcher window: the current folder, its launchable
//! entries, the selection, and the persisted config.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{expand_tilde, ConfigStore, LauncherConfig, WindowGeometry};
use crate::launcher::Spawner;
use crate::listing::{is_launchable, list_launchable};

pub const EMPTY_ROW_LABEL: &str = "[No launchable files found]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Entry(String),
    Empty,
}

impl Row {
    pub fn label(&self) -> &str {
        match self {
            Row::Entry(name) => name,
            Row::Empty => EMPTY_ROW_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Nothing launchable was selected; the folder was listed again.
    Relisted,
    Launched { started: usize, failed: usize },
}

#[derive(Debug)]
pub struct Launcher {
    store: ConfigStore,
    config: LauncherConfig,
    current_dir: PathBuf,
    entries: Vec<OsString>,
    selected: BTreeSet<usize>,
    window_open: bool,
}

impl Launcher {
    /// Lists `start_dir` when given, otherwise the configured home folder.
    pub fn new(store: ConfigStore, config: LauncherConfig, start_dir: Option<PathBuf>) -> Self {
        let first = start_dir.unwrap_or_else(|| config.home.clone());
        let mut launcher = Self {
            store,
            current_dir: config.home.clone(),
            config,
            entries: Vec::new(),
            selected: BTreeSet::new(),
            window_open: true,
        };
        launcher.list_files(&first);
        launcher
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn home(&self) -> &Path {
        &self.config.home
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn entries(&self) -> &[OsString] {
        &self.entries
    }

    pub fn rows(&self) -> Vec<Row> {
        if self.entries.is_empty() {
            return vec![Row::Empty];
        }
        self.entries
            .iter()
            .map(|name| Row::Entry(name.to_string_lossy().into_owned()))
            .collect()
    }

    // ── Listing ───────────────────────────────────────────────────────────────

    /// Replaces the displayed entries with the launchable files in `path`.
    /// An unreadable folder falls back to home once; if home cannot be read
    /// either the list is left empty.
    pub fn list_files(&mut self, path: &Path) {
        self.selected.clear();
        match list_launchable(path) {
            Ok(names) => {
                self.current_dir = path.to_path_buf();
                self.entries = names;
                return;
            }
            Err(err) => {
                warn!(dir = %path.display(), error = %err, "cannot list folder; falling back to home");
            }
        }
        let home = self.config.home.clone();
        self.entries = match list_launchable(&home) {
            Ok(names) => names,
            Err(err) => {
                warn!(dir = %home.display(), error = %err, "cannot list home folder");
                Vec::new()
            }
        };
        self.current_dir = home;
    }

    pub fn refresh(&mut self) {
        let dir = self.current_dir.clone();
        self.list_files(&dir);
    }

    pub fn go_home(&mut self) {
        let home = self.config.home.clone();
        self.list_files(&home);
    }

    pub fn go_back(&mut self) {
        let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) else {
            return;
        };
        self.list_files(&parent);
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    /// Selects row `idx`. With `additive` the row is toggled in a
    /// multi-selection; otherwise it replaces the selection. The empty-folder
    /// row is never selectable.
    pub fn select(&mut self, idx: usize, additive: bool) {
        if idx >= self.entries.len() {
            if !additive {
                self.selected.clear();
            }
            return;
        }
        if additive {
            if !self.selected.remove(&idx) {
                self.selected.insert(idx);
            }
        } else {
            self.selected.clear();
            self.selected.insert(idx);
        }
    }

    pub fn is_selected(&self, idx: usize) -> bool {
        self.selected.contains(&idx)
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.selected
            .iter()
            .filter_map(|idx| self.entries.get(*idx))
            .map(|name| self.current_dir.join(name))
            .collect()
    }

    /// Starts one independent process per selected launchable file.
    pub fn load_selection(&mut self, spawner: &mut dyn Spawner) -> LaunchOutcome {
        let targets: Vec<PathBuf> = self
            .selected_paths()
            .into_iter()
            .filter(|p| is_launchable(p))
            .collect();
        if targets.is_empty() {
            self.refresh();
            return LaunchOutcome::Relisted;
        }
        let mut started = 0;
        let mut failed = 0;
        for target in &targets {
            match spawner.spawn(target) {
                Ok(()) => {
                    info!(program = %target.display(), "launched");
                    started += 1;
                }
                Err(err) => {
                    warn!(program = %target.display(), error = %err, "launch failed");
                    failed += 1;
                }
            }
        }
        LaunchOutcome::Launched { started, failed }
    }

    // ── Config ────────────────────────────────────────────────────────────────

    /// Sets a new home folder (creating it if needed), saves the config and
    /// lists the new home.
    pub fn apply_home(&mut self, raw: &str) -> Result<()> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            anyhow::bail!("home folder cannot be empty");
        }
        let home = expand_tilde(trimmed);
        std::fs::create_dir_all(&home)
            .with_context(|| format!("creating home folder {}", home.display()))?;
        self.config.home = home;
        self.store.save(&self.config)?;
        info!(home = %self.config.home.display(), "home folder saved");
        self.go_home();
        Ok(())
    }

    pub fn save_geometry(&mut self, geometry: WindowGeometry) -> Result<()> {
        self.config.geometry = Some(geometry);
        self.store.save(&self.config)
    }

    // ── Visibility ────────────────────────────────────────────────────────────

    pub fn window_open(&self) -> bool {
        self.window_open
    }

    pub fn set_window_open(&mut self, open: bool) {
        self.window_open = open;
    }

    /// Flips the window-open flag and returns the new value.
    pub fn toggle_visibility(&mut self) -> bool {
        self.window_open = !self.window_open;
        self.window_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::launcher::test_support::RecordingSpawner;
    use crate::listing::test_support::write_file;
    use tempfile::TempDir;

    fn launcher_with_home(dir: &TempDir) -> Launcher {
        let home = dir.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME));
        let config = LauncherConfig {
            home,
            geometry: None,
        };
        Launcher::new(store, config, None)
    }

    #[test]
    fn empty_folder_shows_single_placeholder_row() {
        let dir = TempDir::new().unwrap();
        let launcher = launcher_with_home(&dir);

        assert_eq!(launcher.rows(), vec![Row::Empty]);
        assert_eq!(launcher.rows()[0].label(), EMPTY_ROW_LABEL);
    }

    #[cfg(unix)]
    #[test]
    fn all_filtered_folder_shows_placeholder_row() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        write_file(launcher.home(), ".secret", true);
        write_file(launcher.home(), "notes.txt", false);

        launcher.refresh();

        assert_eq!(launcher.rows(), vec![Row::Empty]);
    }

    #[cfg(unix)]
    #[test]
    fn missing_folder_falls_back_to_home() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        write_file(launcher.home(), "rdp.sh", true);

        launcher.list_files(&dir.path().join("does-not-exist"));

        assert_eq!(launcher.current_dir(), dir.path().join("home"));
        assert_eq!(launcher.entries(), [OsString::from("rdp.sh")]);
    }

    #[test]
    fn missing_home_leaves_empty_list() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        std::fs::remove_dir(dir.path().join("home")).unwrap();

        launcher.list_files(&dir.path().join("elsewhere"));

        assert_eq!(launcher.rows(), vec![Row::Empty]);
    }

    #[test]
    fn placeholder_selection_never_spawns() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        let mut spawner = RecordingSpawner::default();

        launcher.select(0, false);
        let outcome = launcher.load_selection(&mut spawner);

        assert_eq!(outcome, LaunchOutcome::Relisted);
        assert!(spawner.spawned.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn each_selected_file_spawns_once() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        write_file(launcher.home(), "a.sh", true);
        write_file(launcher.home(), "b.sh", true);
        write_file(launcher.home(), "c.sh", true);
        launcher.refresh();
        let mut spawner = RecordingSpawner::default();

        launcher.select(0, false);
        launcher.select(2, true);
        let outcome = launcher.load_selection(&mut spawner);

        let home = dir.path().join("home");
        assert_eq!(
            outcome,
            LaunchOutcome::Launched {
                started: 2,
                failed: 0
            }
        );
        assert_eq!(spawner.spawned, vec![home.join("a.sh"), home.join("c.sh")]);
    }

    #[cfg(unix)]
    #[test]
    fn one_failed_spawn_does_not_stop_the_rest() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        write_file(launcher.home(), "a.sh", true);
        write_file(launcher.home(), "b.sh", true);
        launcher.refresh();
        let mut spawner = RecordingSpawner {
            failing: vec![dir.path().join("home").join("a.sh")],
            ..Default::default()
        };

        launcher.select(0, false);
        launcher.select(1, true);
        let outcome = launcher.load_selection(&mut spawner);

        assert_eq!(
            outcome,
            LaunchOutcome::Launched {
                started: 1,
                failed: 1
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn vanished_selection_relists_instead_of_spawning() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        write_file(launcher.home(), "gone.sh", true);
        launcher.refresh();
        launcher.select(0, false);
        std::fs::remove_file(dir.path().join("home").join("gone.sh")).unwrap();
        let mut spawner = RecordingSpawner::default();

        let outcome = launcher.load_selection(&mut spawner);

        assert_eq!(outcome, LaunchOutcome::Relisted);
        assert!(spawner.spawned.is_empty());
        assert_eq!(launcher.rows(), vec![Row::Empty]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_name_launches_with_its_raw_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        let name = OsStr::from_bytes(b"caf\xe9.sh");
        let path = dir.path().join("home").join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        launcher.refresh();
        let mut spawner = RecordingSpawner::default();

        assert_eq!(launcher.rows(), vec![Row::Entry("caf\u{FFFD}.sh".to_string())]);
        launcher.select(0, false);
        let outcome = launcher.load_selection(&mut spawner);

        assert_eq!(
            outcome,
            LaunchOutcome::Launched {
                started: 1,
                failed: 0
            }
        );
        assert_eq!(spawner.spawned, vec![path]);
    }

    #[test]
    fn additive_select_toggles_rows() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        launcher.entries = vec![OsString::from("a"), OsString::from("b")];

        launcher.select(0, false);
        launcher.select(1, true);
        assert!(launcher.is_selected(0) && launcher.is_selected(1));

        launcher.select(0, true);
        assert!(!launcher.is_selected(0));
        assert!(launcher.is_selected(1));

        launcher.select(0, false);
        assert!(launcher.is_selected(0));
        assert!(!launcher.is_selected(1));
    }

    #[test]
    fn go_back_lists_parent_folder() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);

        launcher.go_back();
        assert_eq!(launcher.current_dir(), dir.path());

        launcher.go_home();
        assert_eq!(launcher.current_dir(), dir.path().join("home"));
    }

    #[test]
    fn apply_home_saves_and_lists_new_folder() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);
        let new_home = dir.path().join("servers");

        launcher.apply_home(&format!("  {}  ", new_home.display())).unwrap();

        assert!(new_home.is_dir());
        assert_eq!(launcher.current_dir(), new_home);
        let reloaded = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME))
            .load()
            .unwrap();
        assert_eq!(reloaded.home, new_home);
    }

    #[test]
    fn apply_home_rejects_blank_input() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);

        assert!(launcher.apply_home("   ").is_err());
        assert_eq!(launcher.home(), dir.path().join("home"));
    }

    #[test]
    fn toggle_visibility_flips_flag() {
        let dir = TempDir::new().unwrap();
        let mut launcher = launcher_with_home(&dir);

        assert!(launcher.window_open());
        assert!(!launcher.toggle_visibility());
        assert!(launcher.toggle_visibility());
    }
}
