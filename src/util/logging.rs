//! Shared tracing filters.

/// Targets whose events are dropped from log output.
pub const NOISY_MODULES: &[&str] = &["rayon", "config"];

pub fn is_noisy(target: &str) -> bool {
    NOISY_MODULES.iter().any(|name| target.starts_with(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_crate_target_when_filtering_then_kept() {
        assert!(!is_noisy("claimdoc::domain::builder"));
        assert!(!is_noisy("claimdoc"));
    }

    #[test]
    fn given_dependency_target_when_filtering_then_dropped() {
        assert!(is_noisy("rayon_core::registry"));
        assert!(is_noisy("config::builder"));
    }
}
