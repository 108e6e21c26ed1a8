use crossterm::style::{Color, Stylize};
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_enabled(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Write a diagnostic line to stderr when verbose mode is on
pub fn log(message: &str) {
    if is_enabled() {
        eprintln!("{} {}", "[prflow]".with(Color::Magenta).bold(), message);
    }
}

/// Log an external command line before it runs
pub fn log_command(program: &str, args: &[&str]) {
    if is_enabled() {
        log(&format!("$ {} {}", program, args.join(" ")));
    }
}

/// `format!`-style wrapper around [`log`] that skips formatting when quiet
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::utils::debug::is_enabled() {
            $crate::utils::debug::log(&format!($($arg)*));
        }
    };
}
