use anyhow::{Context, Result};
use ini::Ini;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "quickwin.conf";
pub const CONF_SECTION: &str = "conf";

const KEY_HOME: &str = "home";
const KEY_ROOT_X: &str = "root_x";
const KEY_ROOT_Y: &str = "root_y";
const KEY_WIDTH: &str = "width";
const KEY_HEIGHT: &str = "height";

// ── Paths ─────────────────────────────────────────────────────────────────────

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Folder scanned when the config names none: `<data dir>/quickwin`.
pub fn default_home() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        return data.join("quickwin");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".local").join("share").join("quickwin");
    }
    PathBuf::from("quickwin")
}

pub fn expand_tilde(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(format!("{}{}", home.display(), rest));
        }
    }
    PathBuf::from(raw)
}

// ── Config model ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub home: PathBuf,
    /// `None` when any of the four geometry keys is missing or malformed.
    pub geometry: Option<WindowGeometry>,
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    fallback_home: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback_home: default_home(),
        }
    }

    /// Overrides the home folder written when the config names none.
    pub fn with_fallback_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.fallback_home = home.into();
        self
    }

    pub fn at_default_location() -> Self {
        Self::new(default_config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config, writing a default file first when there is none.
    /// Whitespace around `home` is trimmed, and the folder is created if it
    /// does not exist yet.
    pub fn load(&self) -> Result<LauncherConfig> {
        self.ensure_exists()?;
        let mut conf = Ini::load_from_file(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;

        let home_raw = conf
            .section(Some(CONF_SECTION))
            .and_then(|s| s.get(KEY_HOME))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let home = match home_raw {
            Some(raw) => expand_tilde(&raw),
            None => {
                let home = self.fallback_home.clone();
                conf.with_section(Some(CONF_SECTION))
                    .set(KEY_HOME, home.to_string_lossy().to_string());
                self.write(&conf)?;
                info!(config = %self.path.display(), "added default home to config");
                home
            }
        };
        std::fs::create_dir_all(&home)
            .with_context(|| format!("creating home folder {}", home.display()))?;

        let geometry = read_geometry(&conf);
        Ok(LauncherConfig { home, geometry })
    }

    /// Re-reads the file so keys this program does not own survive, then
    /// writes `home` and any known geometry back.
    pub fn save(&self, config: &LauncherConfig) -> Result<()> {
        let mut conf = if self.path.is_file() {
            Ini::load_from_file(&self.path)
                .with_context(|| format!("reading {}", self.path.display()))?
        } else {
            Ini::new()
        };
        {
            let mut section = conf.with_section(Some(CONF_SECTION));
            section.set(KEY_HOME, config.home.to_string_lossy().to_string());
            if let Some(geo) = config.geometry {
                section
                    .set(KEY_ROOT_X, geo.x.to_string())
                    .set(KEY_ROOT_Y, geo.y.to_string())
                    .set(KEY_WIDTH, geo.width.to_string())
                    .set(KEY_HEIGHT, geo.height.to_string());
            }
        }
        self.write(&conf)
    }

    fn ensure_exists(&self) -> Result<()> {
        if self.path.is_file() {
            return Ok(());
        }
        let mut conf = Ini::new();
        conf.with_section(Some(CONF_SECTION))
            .set(KEY_HOME, self.fallback_home.to_string_lossy().to_string());
        self.write(&conf)?;
        info!(config = %self.path.display(), "created default config");
        Ok(())
    }

    fn write(&self, conf: &Ini) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        conf.write_to_file(&self.path)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

fn read_geometry(conf: &Ini) -> Option<WindowGeometry> {
    let section = conf.section(Some(CONF_SECTION))?;
    let parsed = (|| {
        Some(WindowGeometry {
            x: section.get(KEY_ROOT_X)?.trim().parse().ok()?,
            y: section.get(KEY_ROOT_Y)?.trim().parse().ok()?,
            width: section.get(KEY_WIDTH)?.trim().parse().ok()?,
            height: section.get(KEY_HEIGHT)?.trim().parse().ok()?,
        })
    })();
    if parsed.is_none() {
        debug!("window geometry missing or malformed; not restoring it");
    }
    parsed
}
