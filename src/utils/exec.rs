//! Running external tools.
//!
//! [`Cmd`] collects program, arguments, working directory and environment,
//! then runs the process to completion. Output is either captured through
//! pipes or, with [`Cmd::pty`], read from a pseudo-terminal so the tool keeps
//! its colors and progress output.
//!
//! ```ignore
//! let out = Cmd::from_slice(&["npx", "babel"]).arg("app/main.js").run()?;
//!
//! Cmd::from_slice(&["npx", "webpack"])
//!     .args(["--config", "build/webpack.config.prod.js"])
//!     .cwd(root)
//!     .pty(true)
//!     .echo(Echo::All)
//!     .run()?;
//! ```

use crate::log;
use anyhow::{Context, Result, anyhow, bail};
use portable_pty::{CommandBuilder, NativePtySystem, PtySize, PtySystem};
use regex::Regex;
use std::{
    borrow::Cow,
    ffi::{OsStr, OsString},
    io::Read,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Output},
    sync::LazyLock,
};

// ============================================================================
// Echo
// ============================================================================

/// Which lines of a successful run's output are logged.
#[derive(Debug, Clone, Copy, Default)]
pub enum Echo {
    /// Nothing.
    #[default]
    Off,
    /// Every non-empty line.
    All,
}

impl Echo {
    fn keeps(self, line: &str) -> bool {
        matches!(self, Self::All) && !line.is_empty()
    }

    /// Log the kept lines of `output` under the program name.
    fn emit(self, program: &str, output: &str) {
        if matches!(self, Self::Off) {
            return;
        }
        let kept: Vec<&str> = output
            .lines()
            .filter(|line| self.keeps(strip_ansi(line).trim()))
            .collect();
        if !kept.is_empty() {
            log!(program; "{}", kept.join("\n"));
        }
    }
}

// ============================================================================
// Cmd
// ============================================================================

/// An external process to run.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    pty: bool,
    echo: Echo,
}

impl Cmd {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Split a configured command line (`["npx", "babel"]`) into program and
    /// leading arguments.
    pub fn from_slice<S: AsRef<OsStr>>(argv: &[S]) -> Self {
        match argv.split_first() {
            Some((program, rest)) => Self::new(program).args(rest),
            None => Self::default(),
        }
    }

    /// Append one argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        args.into_iter().fold(self, Self::arg)
    }

    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Extra environment variables on top of the inherited environment.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.envs.extend(
            vars.into_iter()
                .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned())),
        );
        self
    }

    /// Run inside a pseudo-terminal. Stdout and stderr arrive merged in
    /// `Output::stdout`.
    pub fn pty(mut self, enable: bool) -> Self {
        self.pty = enable;
        self
    }

    pub fn echo(mut self, echo: Echo) -> Self {
        self.echo = echo;
        self
    }

    /// Run to completion. A non-zero exit is an error carrying the tool's
    /// own error output.
    pub fn run(self) -> Result<Output> {
        if self.program.is_empty() {
            bail!("empty command");
        }
        if self.pty {
            run_in_pty(self)
        } else {
            run_piped(self)
        }
    }

    fn name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

// ============================================================================
// Runners
// ============================================================================

fn run_piped(cmd: Cmd) -> Result<Output> {
    let name = cmd.name();
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args).envs(cmd.envs.iter().cloned());
    if let Some(dir) = &cmd.cwd {
        command.current_dir(dir);
    }

    let output = command
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        let detail = if stderr.trim().is_empty() {
            String::from_utf8_lossy(&output.stdout)
        } else {
            stderr
        };
        bail!(failure(&name, &output.status.to_string(), &detail));
    }

    cmd.echo.emit(&name, &stderr);
    Ok(output)
}

fn run_in_pty(cmd: Cmd) -> Result<Output> {
    let name = cmd.name();

    let mut builder = CommandBuilder::new(&cmd.program);
    builder.args(&cmd.args);
    for (k, v) in &cmd.envs {
        builder.env(k, v);
    }
    if let Some(dir) = &cmd.cwd {
        builder.cwd(dir);
    }

    let pair = NativePtySystem::default().openpty(PtySize {
        rows: 24,
        cols: 120,
        pixel_width: 0,
        pixel_height: 0,
    })?;
    let mut child = pair
        .slave
        .spawn_command(builder)
        .with_context(|| format!("Failed to execute `{name}`"))?;
    drop(pair.slave);

    // Reads block until the child closes the terminal
    let mut reader = pair.master.try_clone_reader()?;
    let drain = std::thread::spawn(move || {
        let mut buf = String::new();
        let _ = reader.read_to_string(&mut buf);
        buf
    });

    let status = child.wait()?;
    drop(pair.master);
    let text = drain
        .join()
        .map_err(|_| anyhow!("`{name}` output reader panicked"))?;

    if !status.success() {
        bail!(failure(
            &name,
            &format!("exit code {}", status.exit_code()),
            &text
        ));
    }

    cmd.echo.emit(&name, &text);
    Ok(Output {
        status: exit_status(status.exit_code()),
        stdout: text.into_bytes(),
        stderr: Vec::new(),
    })
}

fn failure(name: &str, status: &str, detail: &str) -> String {
    let detail = strip_ansi(detail.trim());
    if detail.is_empty() {
        format!("`{name}` failed with {status}")
    } else {
        format!("`{name}` failed with {status}\n{detail}")
    }
}

#[cfg(unix)]
#[allow(clippy::cast_possible_wrap)]
fn exit_status(code: u32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw((code as i32) << 8)
}

#[cfg(windows)]
fn exit_status(code: u32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code)
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    static ANSI: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("valid ANSI regex"));
    ANSI.replace_all(s, "")
}
