use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Hands out one spinner per step. Finished steps leave a `✔` or `✖` line
/// behind.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    draw: bool,
}

impl Default for Progress {
    fn default() -> Self {
        Self { draw: true }
    }
}

impl Progress {
    /// Status lines only, no spinner animation.
    #[must_use]
    pub fn hidden() -> Self {
        Self { draw: false }
    }

    #[must_use]
    pub fn start(&self, msg: impl Into<String>) -> Step {
        let bar = if self.draw {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message(msg.into());
        bar.enable_steady_tick(Duration::from_millis(80));

        Step { bar }
    }

    /// A `✔` line without a preceding spinner.
    pub fn done(&self, msg: impl AsRef<str>) {
        succeeded(msg.as_ref());
    }
}

fn succeeded(msg: &str) {
    println!(
        "{} {msg}",
        "✔".if_supports_color(owo_colors::Stream::Stdout, |s| s.green())
    );
}

/// A running step. Consumed by [`Step::succeed`] or [`Step::fail`].
pub struct Step {
    bar: ProgressBar,
}

impl Step {
    pub fn succeed(self, msg: impl AsRef<str>) {
        self.bar.finish_and_clear();
        succeeded(msg.as_ref());
    }

    pub fn fail(self, msg: impl AsRef<str>) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}",
            "✖".if_supports_color(owo_colors::Stream::Stderr, |s| s.red()),
            msg.as_ref()
                .if_supports_color(owo_colors::Stream::Stderr, |s| s.red())
        );
    }

    /// Runs `f` with the spinner off the screen, for work that hands the
    /// terminal to a child process.
    pub fn suspend<T>(&self, f: impl FnOnce() -> T) -> T {
        self.bar.disable_steady_tick();
        self.bar.suspend(f)
    }
}
