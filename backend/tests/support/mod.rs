//! Embedded PostgreSQL helpers for the store integration tests.
//!
//! Each test gets its own temporary database on a cluster shared by the test
//! binary. When the cluster cannot start, `SKIP_TEST_CLUSTER` decides whether
//! the test is skipped or fails loudly.

use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;

/// Returns true when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when allowed, otherwise panic with the setup failure.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Create an empty database on the shared embedded cluster.
///
/// The database is dropped with the returned handle.
pub fn temporary_database() -> Result<TemporaryDatabase, String> {
    let cluster =
        shared_cluster_handle().map_err(|err| format!("bootstrap cluster: {err:?}"))?;
    cluster
        .create_temporary_database()
        .map_err(|err| format!("create temporary database: {err:?}"))
}
