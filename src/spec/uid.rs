//! Component identity tokens and the DOM attributes that carry them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Attribute holding a component's uid on its element.
pub const ID_ATTR: &str = "data-alloy-id";

/// Marker attribute on the element of a component embedded via `premade`.
pub const PREMADE_ATTR: &str = "data-alloy-premade";

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate an opaque, process-unique token: `prefix_` followed by a random
/// number, a monotonic counter and the current time in milliseconds.
///
/// Callers must not parse the result.
pub fn generate(prefix: &str) -> String {
    let random = rand::random::<u32>();
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{prefix}_{random}{count}{millis}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generate_has_prefix() {
        assert!(generate("uid").starts_with("uid_"));
    }

    #[test]
    fn generate_is_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate("uid")).collect();
        assert_eq!(ids.len(), 1000);
    }
}
