use std::io::Write;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Print a Cargo-style status line: `  Publishing com.example:demo:1.0.0`
///
/// The label lands right-aligned in a 12-column gutter, bold green, with
/// the message after it in the terminal's default colour.
pub fn status(label: &str, message: &str) {
    styled_line(Style::new().green().bold(), label, message);
}

/// Like [`status`] but bold cyan, for facts rather than actions.
pub fn status_info(label: &str, message: &str) {
    styled_line(Style::new().cyan().bold(), label, message);
}

/// Like [`status`] but bold yellow.
pub fn status_warn(label: &str, message: &str) {
    styled_line(Style::new().yellow().bold(), label, message);
}

fn styled_line(style: Style, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        style.apply_to(label),
    );
}

/// Progress bar over a known set of files (staging or signing).
///
/// The current file name should be set with [`ProgressBar::set_message`]
/// before each step and the bar finished with
/// [`ProgressBar::finish_and_clear`].
pub fn file_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos:>3}/{len:3} [{bar:30.green/dim}] {wide_msg}")
            .expect("valid template")
            .progress_chars("=> "),
    );
    pb
}
