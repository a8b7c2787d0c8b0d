//! Terminal implementations of the widget's platform seams.

mod scheduler;

pub use scheduler::TokioScheduler;

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use serde_json::json;
use studytimer_core::storage::DisplayConfig;
use studytimer_core::{
    DigitGroup, EffectError, Notification, Notifier, Permission, Renderer, StatusTone, Tone,
    ToneEmitter, ViewModel,
};

const BOLD_INVERSE: &str = "\x1b[1;7m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Pretty,
    Json,
}

/// Redraws a single status line in place.
pub struct TerminalRenderer {
    color: bool,
    bar_width: usize,
    /// Last known fill, kept while no duration is set.
    progress: f64,
}

impl TerminalRenderer {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            color: display.color,
            bar_width: display.bar_width.max(1) as usize,
            progress: 0.0,
        }
    }

    pub fn format_line(&mut self, view: &ViewModel) -> String {
        if let Some(pct) = view.progress_pct {
            self.progress = pct;
        }

        let clock = DigitGroup::ALL
            .iter()
            .map(|&group| {
                let digits = view.digits.get(group);
                if self.color && view.is_bouncing(group) {
                    format!("{BOLD_INVERSE}{digits}{RESET}")
                } else {
                    digits.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(":");

        let filled = ((self.progress / 100.0) * self.bar_width as f64).round() as usize;
        let filled = filled.min(self.bar_width);
        let bar = format!(
            "[{}{}] {:>3.0}%",
            "#".repeat(filled),
            "-".repeat(self.bar_width - filled),
            self.progress
        );

        let status = if self.color {
            format!("{}{}{RESET}", tone_color(view.status.tone), view.status.message)
        } else {
            view.status.message.clone()
        };

        format!("{clock}  {bar}  {status}")
    }
}

fn tone_color(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Idle => "",
        StatusTone::Running => "\x1b[32m",
        StatusTone::Paused => "\x1b[33m",
        StatusTone::Finished => "\x1b[35m",
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &ViewModel) {
        let line = self.format_line(view);
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\r\x1b[2K{line}");
        let _ = out.flush();
    }
}

/// Renderer for `--json` runs, where events are the output.
pub struct SilentRenderer;

impl Renderer for SilentRenderer {
    fn render(&mut self, _view: &ViewModel) {}
}

/// Rings the terminal bell on stderr.
pub struct BellTone;

impl ToneEmitter for BellTone {
    fn play(&mut self, tone: &Tone) -> Result<(), EffectError> {
        tracing::debug!(frequency_hz = tone.frequency_hz, "ringing terminal bell");
        let mut err = std::io::stderr().lock();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}

/// Prints notifications as a banner (or a JSON line).
///
/// The permission is shared with the run loop, which answers an open
/// prompt when the user types `allow` or `deny`.
pub struct TerminalNotifier {
    permission: Rc<Cell<Permission>>,
    output: Output,
}

impl TerminalNotifier {
    pub fn new(permission: Rc<Cell<Permission>>, output: Output) -> Self {
        Self { permission, output }
    }
}

impl Notifier for TerminalNotifier {
    fn permission(&self) -> Permission {
        self.permission.get()
    }

    fn request_permission(&mut self) -> Option<Permission> {
        match self.output {
            Output::Pretty => {
                println!("\nShow a notification when a session completes? Type `allow` or `deny`.")
            }
            Output::Json => println!("{}", json!({ "type": "PermissionRequested" })),
        }
        None
    }

    fn fire(&mut self, notification: &Notification) -> Result<(), EffectError> {
        let mut out = std::io::stdout().lock();
        match self.output {
            Output::Pretty => writeln!(
                out,
                "\n{} {}\n   {}",
                notification.icon, notification.title, notification.body
            )?,
            Output::Json => writeln!(
                out,
                "{}",
                json!({ "type": "Notification", "notification": notification })
            )?,
        }
        Ok(())
    }
}
