use std::path::PathBuf;
use tracing::warn;

use crate::config::expand_tilde;

pub const DEFAULT_TITLE: &str = "QuickWin";

/// Start-up overrides given as `/f:<folder>`, `/t:<title>`, `/i:<icon>` and
/// `/c:<config>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    pub folder: Option<PathBuf>,
    pub title: Option<String>,
    pub icon: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl LaunchOptions {
    /// Parses arguments without the program name. Unknown arguments are
    /// logged and skipped; a flag with an empty value is ignored.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            let Some((flag, value)) = split_flag(arg) else {
                warn!(argument = arg, "ignoring unrecognised argument");
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match flag {
                'f' => opts.folder = Some(expand_tilde(value)),
                't' => opts.title = Some(value.to_string()),
                'i' => opts.icon = Some(expand_tilde(value)),
                'c' => opts.config = Some(expand_tilde(value)),
                _ => warn!(argument = arg, "ignoring unknown flag"),
            }
        }
        opts
    }

    pub fn window_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

fn split_flag(arg: &str) -> Option<(char, &str)> {
    let rest = arg.strip_prefix('/')?;
    let mut chars = rest.chars();
    let flag = chars.next()?.to_ascii_lowercase();
    let value = chars.as_str().strip_prefix(':')?;
    Some((flag, value.trim()))
}
