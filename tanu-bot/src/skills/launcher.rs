//! Side effects the bundled skills perform: starting programs and opening URLs.

use std::fmt;
use std::process::{Command, Stdio};
use tanu::{SkillError, SkillResult};
use tracing::debug;

/// Starts programs and opens URLs on behalf of skills.
pub trait Launcher: Send + Sync {
    /// Start `program` with `args` without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    fn spawn(&self, program: &str, args: &[String]) -> SkillResult<()>;

    /// Open `url` in the default browser.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform opener cannot be started.
    fn open_url(&self, url: &str) -> SkillResult<()> {
        let (opener, mut args) = url_opener();
        args.push(url.to_string());
        self.spawn(opener, &args)
    }
}

impl fmt::Debug for dyn Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Launcher")
    }
}

/// Platform command that opens a URL in the default browser.
fn url_opener() -> (&'static str, Vec<String>) {
    if cfg!(target_os = "windows") {
        ("cmd", vec!["/C".into(), "start".into(), String::new()])
    } else if cfg!(target_os = "macos") {
        ("open", Vec::new())
    } else {
        ("xdg-open", Vec::new())
    }
}

/// Launcher backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn spawn(&self, program: &str, args: &[String]) -> SkillResult<()> {
        debug!(program, ?args, "spawning");
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| SkillError::new(format!("failed to start {program}: {e}")))
    }
}
