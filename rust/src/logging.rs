//! Logging macros for the clustering pipeline with verbosity level control.
//!
//! Provides zero-cost logging when disabled (verbosity=0).
//! Verbosity levels:
//! - 0: SILENT (nothing)
//! - 1: PHASES (phase completion and timings)
//! - 2: CLUSTERS (cluster selection and frontier growth)
//! - 3: DEBUG (per-node labels, L1/L2 values)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_PHASES: u8 = 1;
pub const VERBOSITY_CLUSTERS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at PHASES level (verbosity >= 1).
///
/// Used for: ordering, delay computation, labeling and sweep completion.
#[macro_export]
macro_rules! log_phases {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PHASES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CLUSTERS level (verbosity >= 2).
///
/// Used for: selected clusters, queued frontier nodes, skipped candidates.
#[macro_export]
macro_rules! log_clusters {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CLUSTERS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_PHASES);
        assert!(VERBOSITY_PHASES < VERBOSITY_CLUSTERS);
        assert!(VERBOSITY_CLUSTERS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_log_macros_compile() {
        let verbosity = VERBOSITY_SILENT;
        log_phases!(verbosity, "phase {}", 1);
        log_clusters!(verbosity, "cluster {}", 2);
        log_debug!(verbosity, "node {}", 3);
    }
}
