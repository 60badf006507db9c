//! Skip policy for suites that need an embedded PostgreSQL cluster.
//!
//! The suites run by default. Where the cluster cannot start (no network to
//! fetch binaries, sandboxed CI), `SKIP_TEST_CLUSTER=1` turns setup failures
//! into visible skips instead of panics.

/// Whether `SKIP_TEST_CLUSTER` is set to "1", "true" or "yes" in any case.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a cluster setup failure.
///
/// Prints a skip marker and returns `None` when skipping is allowed; panics
/// otherwise so a broken environment fails the run.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded PostgreSQL setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
