//! Environment configuration shared by the binaries.
//!
//! Reads `MONTYHALL_LOG`, `MONTYHALL_SEED`, and `RAYON_NUM_THREADS`.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `MONTYHALL_LOG` takes precedence; otherwise the filter follows the
/// verbosity level: 0 → warn, 1 → info, 2 → debug.
pub fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("MONTYHALL_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Read `RAYON_NUM_THREADS` (default: rayon's own choice) and build the global
/// pool. Tolerates an already-initialized pool. Returns the thread count.
pub fn init_rayon_threads() -> usize {
    let requested: Option<usize> = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok());
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = requested {
        builder = builder.num_threads(n);
    }
    builder.build_global().ok();
    rayon::current_num_threads()
}

/// Read `MONTYHALL_SEED`, if set and numeric.
pub fn env_seed() -> Option<u64> {
    std::env::var("MONTYHALL_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
}
