//! Lightweight debug logging gated by TITAN_DEBUG=1 (or `--debug` on the CLI).
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

static FROM_ENV: OnceLock<bool> = OnceLock::new();
static FORCED: AtomicBool = AtomicBool::new(false);

pub fn is_enabled() -> bool {
    FORCED.load(Ordering::Relaxed)
        || *FROM_ENV.get_or_init(|| std::env::var("TITAN_DEBUG").ok().as_deref() == Some("1"))
}

/// Turn debug output on for the rest of the process.
pub fn enable() {
    FORCED.store(true, Ordering::Relaxed);
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        if $crate::core::debug::is_enabled() { eprintln!("[titan] {}", format_args!($($arg)*)); }
    }};
}
