//! Shared helpers for backend integration tests.

pub mod store_contract;

/// Return the value of `var` when the opt-in suite should run.
///
/// Prints a skip marker otherwise so skipped runs are visible in logs.
pub fn opt_in(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => {
            eprintln!("SKIP: set {var} to run this suite");
            None
        }
    }
}
