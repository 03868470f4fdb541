/// Initialize tracing/logging for the application.
///
/// This uses a simple `with_max_level` configuration based on `default_level`.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_from_str(default_level))
        .with_target(false)
        .try_init();
}

/// Map a level name to a `tracing::Level`; unknown names fall back to INFO.
pub fn level_from_str(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" | "warning" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    }
}

/// Level for a repeated `-v` flag, starting from the configured level.
///
/// `-v` asks for debug and `-vv` or more for trace. The flags only ever make
/// logging more verbose, so a configured level that is already more verbose
/// than the flag's wins.
pub fn level_for_verbosity(configured: &str, verbosity: u8) -> &str {
    let requested = match verbosity {
        0 => return configured,
        1 => "debug",
        _ => "trace",
    };
    // tracing orders levels by verbosity: TRACE > DEBUG > ... > ERROR.
    if level_from_str(configured) >= level_from_str(requested) {
        configured
    } else {
        requested
    }
}
