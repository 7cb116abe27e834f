//! Terminal logging.
//!
//! - `log!("module"; ...)` prints a line with a colored `[module]` prefix
//! - `debug!("module"; ...)` does the same, only under `--verbose`
//! - [`ProgressLine`] keeps a live `transpile(3/10) copy(7/40)` line at the
//!   bottom of the terminal while workers run
//!
//! ```ignore
//! log!("bundle"; "done ({} profile)", mode);
//!
//! let progress = ProgressLine::new("mirror", &[("transpile", 42), ("copy", 10)]);
//! progress.inc("transpile");
//! progress.finish();
//! ```

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::io::{StdoutLock, Write, stdout};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set by a live [`ProgressLine`]; log lines must clear it first.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Enable or disable `debug!` output.
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

// ============================================================================
// Macros
// ============================================================================

/// Print a message with a colored module prefix
///
/// ```ignore
/// log!("mirror"; "{} files", count);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Print a message only when `--verbose` is on
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Output
// ============================================================================

/// Print `message` under a `[module]` prefix.
///
/// A live progress line is wiped first; its next update redraws it below.
pub fn log(module: &str, message: &str) {
    let mut out = stdout().lock();
    if PROGRESS_ACTIVE.load(Ordering::Relaxed) {
        clear_line(&mut out);
    }
    writeln!(out, "{} {message}", prefix(module)).ok();
    out.flush().ok();
}

/// `[module]`, colored by module.
fn prefix(module: &str) -> String {
    let tag = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "bundle" => tag.bright_blue().bold().to_string(),
        "mirror" => tag.bright_green().bold().to_string(),
        "build" => tag.bright_cyan().bold().to_string(),
        "error" => tag.bright_red().bold().to_string(),
        "warning" => tag.bright_magenta().bold().to_string(),
        _ => tag.bright_yellow().bold().to_string(),
    }
}

fn clear_line(out: &mut StdoutLock<'_>) {
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

// ============================================================================
// ProgressLine
// ============================================================================

struct Counter {
    name: &'static str,
    total: usize,
    done: AtomicUsize,
}

impl Counter {
    fn render(&self) -> String {
        format!(
            "{}({}/{})",
            self.name,
            self.done.load(Ordering::Relaxed),
            self.total
        )
    }
}

fn render(counters: &[Counter]) -> String {
    counters
        .iter()
        .map(Counter::render)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Live single-line counters, e.g. `[mirror] transpile(42/69) copy(120/371)`.
///
/// Safe to bump from many workers. A redraw is skipped when another thread
/// is already drawing, so workers never wait on the terminal.
pub struct ProgressLine {
    module: &'static str,
    counters: Vec<Counter>,
    draw: Mutex<()>,
}

impl ProgressLine {
    /// Start a progress line. Counters with a zero total are left out.
    pub fn new(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                done: AtomicUsize::new(0),
            })
            .collect();

        PROGRESS_ACTIVE.store(true, Ordering::Relaxed);
        let progress = Self {
            module,
            counters,
            draw: Mutex::new(()),
        };
        progress.redraw(false);
        progress
    }

    /// Count one finished item. Unknown names are ignored.
    pub fn inc(&self, name: &str) {
        if let Some(counter) = self.counters.iter().find(|c| c.name == name) {
            counter.done.fetch_add(1, Ordering::Relaxed);
            if let Some(_guard) = self.draw.try_lock() {
                self.redraw(false);
            }
        }
    }

    /// Leave the final counts on screen.
    pub fn finish(self) {
        PROGRESS_ACTIVE.store(false, Ordering::Relaxed);
        {
            let _guard = self.draw.lock();
            self.redraw(true);
        }
        // Drop would wipe the line
        std::mem::forget(self);
    }

    fn redraw(&self, keep: bool) {
        if self.counters.is_empty() {
            return;
        }
        let mut out = stdout().lock();
        clear_line(&mut out);
        write!(out, "{} {}", prefix(self.module), render(&self.counters)).ok();
        if keep {
            writeln!(out).ok();
        }
        out.flush().ok();
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        PROGRESS_ACTIVE.store(false, Ordering::Relaxed);
        let mut out = stdout().lock();
        clear_line(&mut out);
        out.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(name: &'static str, total: usize, done: usize) -> Counter {
        Counter {
            name,
            total,
            done: AtomicUsize::new(done),
        }
    }

    #[test]
    fn test_render_counters() {
        let counters = vec![counter("transpile", 10, 3), counter("copy", 4, 4)];
        assert_eq!(render(&counters), "transpile(3/10) copy(4/4)");
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_prefix_contains_module() {
        assert!(prefix("mirror").contains("[mirror]"));
        assert!(prefix("Bundle").contains("[Bundle]"));
    }

    #[test]
    fn test_progress_line_skips_empty_counters() {
        let progress = ProgressLine::new("mirror", &[("transpile", 2), ("copy", 0)]);
        assert_eq!(progress.counters.len(), 1);
        progress.inc("transpile");
        progress.inc("copy");
        assert_eq!(progress.counters[0].done.load(Ordering::Relaxed), 1);
        progress.finish();
    }
}
