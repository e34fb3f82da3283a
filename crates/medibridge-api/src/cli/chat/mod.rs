//! Interactive CLI chat for a doctor-patient conversation.
//!
//! One terminal plays both speakers: plain lines are turns from the active
//! role, slash commands switch roles, change languages, or submit audio
//! files. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Start a steady-ticking spinner with the given message.
pub fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
