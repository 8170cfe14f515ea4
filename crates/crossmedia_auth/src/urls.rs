//! URL joining shared by the engine and the dispatcher.

/// Append an absolute path to a base URL without doubling the slash.
pub(crate) fn join_base(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
