use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Starts a program without waiting on it.
pub trait Spawner {
    fn spawn(&mut self, program: &Path) -> Result<()>;
}

/// Fire-and-forget launches through the OS. The child is never waited on.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSpawner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

pub fn launch_plan(target: &Path) -> LaunchPlan {
    let cwd = target.parent().map(Path::to_path_buf);
    #[cfg(target_os = "windows")]
    {
        LaunchPlan {
            program: PathBuf::from("cmd"),
            args: vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                target.display().to_string(),
            ],
            cwd,
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        LaunchPlan {
            program: target.to_path_buf(),
            args: Vec::new(),
            cwd,
        }
    }
}

impl Spawner for DetachedSpawner {
    fn spawn(&mut self, program: &Path) -> Result<()> {
        let plan = launch_plan(program);
        let mut cmd = Command::new(&plan.program);
        cmd.args(&plan.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = plan.cwd.as_ref().filter(|d| d.is_dir()) {
            cmd.current_dir(dir);
        }
        match cmd.spawn() {
            Ok(_) => Ok(()),
            Err(err) => Err(anyhow!("launch failed for {}: {err}", program.display())),
        }
    }
}
