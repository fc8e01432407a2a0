//! Logging helpers shared by the posture pipeline.
//!
//! Modules opt in to their log lines with a module-level `ENABLE_LOGS` const:
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn, log_error, log_verbose};
//!
//! log_info!("gate dispatched pose for {}", chair_id);
//! ```
//!
//! `log_verbose!` additionally requires verbose mode, which is switched on at
//! startup from `CHAIRLINK_DEBUG` (see [`set_verbose`]). Per-frame chatter
//! such as dropped uplinks goes through it so a normal run stays quiet.

use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Turn per-frame debug output on or off for the whole process.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn verbose_enabled() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Reads `CHAIRLINK_DEBUG`; `1` or `true` (any case) enables verbose mode.
pub fn verbose_from_env() -> bool {
    std::env::var("CHAIRLINK_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Info line, emitted when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warning line, emitted when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error line, emitted when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

/// Debug line for per-frame events; needs `ENABLE_LOGS` and verbose mode.
#[macro_export]
macro_rules! log_verbose {
    ($($arg:tt)*) => {
        if ENABLE_LOGS && $crate::utils::logging::verbose_enabled() {
            log::debug!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flag_round_trips() {
        set_verbose(true);
        assert!(verbose_enabled());
        set_verbose(false);
        assert!(!verbose_enabled());
    }
}
