//! Tracing and logging (shared setup).

/// Initialize process-wide observability with JSON output at `info`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(true, "info");
}

/// Initialize process-wide observability with an explicit output format and
/// fallback filter.
pub fn init_with(json_logs: bool, default_filter: &str) {
    tracing::init(json_logs, default_filter);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
