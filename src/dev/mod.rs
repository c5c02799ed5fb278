//! Helpers for fuzzing, demos and tests.

pub mod generator;

/// Parse an environment variable, falling back to `default` when it is unset
/// or malformed.
pub fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}
