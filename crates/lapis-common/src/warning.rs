//! Compiler warnings with deduplication.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer, parser and extension collection to report
//! constructs that are accepted but ignored.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an ignored or unsupported construct (emits once per unique message)
///
/// The warning is emitted as a `tracing` event with target `lapis`, so the
/// embedding program decides where it ends up.
///
/// # Example
/// ```ignore
/// warn_once("extend", "can't extend nested selector '.a .b'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if record(&format!("[{component}] {message}")) {
        tracing::warn!(target: "lapis", component, "{message}");
    }
}

/// Clear all recorded warnings (call before compiling a new stylesheet)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Insert `key` into the warned set, returning `true` the first time it is seen.
fn record(key: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deduplicates() {
        let key = "[test] record dedup";
        assert!(record(key));
        assert!(!record(key));
        assert!(record("[test] record dedup (other)"));
    }
}
