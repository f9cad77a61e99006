//! FILENAME: crosstab-engine/src/logging.rs
// PURPOSE: Category-tagged logging macros for the engine.
// CONTEXT: Every line carries a short category ("PIVOT", "GROUP", "BUILD")
//          used as the `log` target, so hosts can filter per stage. The
//          crate never installs a logger; without one these are no-ops.

// ============================================================================
// CATEGORIES
// ============================================================================

pub const CAT_PIVOT: &str = "PIVOT";
pub const CAT_GROUP: &str = "GROUP";
pub const CAT_BUILD: &str = "BUILD";

// ============================================================================
// ENTER/EXIT FORMATTING
// ============================================================================

/// Formats an ENTER line for function entry
pub fn format_enter(func_name: &str, params: &str) -> String {
    if params.is_empty() {
        format!("ENTER {}", func_name)
    } else {
        format!("ENTER {} {}", func_name, params)
    }
}

/// Formats an EXIT line for function exit
pub fn format_exit(func_name: &str, result: &str) -> String {
    if result.is_empty() {
        format!("EXIT {}", func_name)
    } else {
        format!("EXIT {} {}", func_name, result)
    }
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, $($arg)*)
    };
}

macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        ::log::info!(target: $cat, $($arg)*)
    };
}

macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        ::log::warn!(target: $cat, $($arg)*)
    };
}

// ENTER/EXIT macros for function tracing

macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        ::log::debug!(target: $cat, "{}", $crate::logging::format_enter($func, ""))
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, "{}", $crate::logging::format_enter($func, &format!($($arg)*)))
    };
}

macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        ::log::debug!(target: $cat, "{}", $crate::logging::format_exit($func, ""))
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, "{}", $crate::logging::format_exit($func, &format!($($arg)*)))
    };
}

// Re-export the macros so they can be imported via `use crate::logging::log_info;`
pub(crate) use log_debug;
pub(crate) use log_info;
pub(crate) use log_warn;
pub(crate) use log_enter;
pub(crate) use log_exit;
