use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub(crate) static PROGRESS: OnceLock<ProgressBar> = OnceLock::new();

/// The shared progress bar. Hidden until [`start`] is called.
pub fn get_progress() -> &'static ProgressBar {
    PROGRESS.get_or_init(ProgressBar::hidden)
}

/// Shows the bar for `total` registrations, unless output is silenced.
pub fn start(total: usize, q_level: u8) {
    if q_level > 1 || total == 0 {
        return;
    }

    let pb = get_progress();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}") {
        pb.set_style(style.tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]));
    }
    pb.set_length(total as u64);
    pb.set_position(0);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(100));
}

pub fn working_on(name: &str) {
    get_progress().set_message(format!("Reconciling {}", name.green().bold()));
}

pub fn advance() {
    get_progress().inc(1);
}

pub fn finish() {
    get_progress().finish_and_clear();
}

/// Routes log lines above the progress bar so it is not torn.
pub struct ProgressWriter;

impl std::io::Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        let pb = get_progress();
        if pb.is_hidden() || pb.is_finished() {
            eprintln!("{msg}");
        } else {
            pb.println(msg);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
