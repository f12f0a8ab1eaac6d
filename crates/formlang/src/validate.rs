//! Structural validation shared by both model constructors.

use indexmap::IndexSet;
use std::hash::Hash;

/// Symmetric difference between a declared symbol set and the key set of a
/// rule/transition table, preserving declaration order.
///
/// Returns `(missing, extra)`: declared entries absent from the table, and
/// table keys that were never declared. Both empty means the sets match
/// exactly.
pub(crate) fn key_set_mismatch<T>(declared: &IndexSet<T>, keys: &IndexSet<T>) -> (Vec<T>, Vec<T>)
where
    T: Eq + Hash + Clone,
{
    let missing = declared.difference(keys).cloned().collect();
    let extra = keys.difference(declared).cloned().collect();
    (missing, extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> IndexSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matching_sets() {
        let declared = set(&["q0", "q1"]);
        let keys = set(&["q1", "q0"]);
        let (missing, extra) = key_set_mismatch(&declared, &keys);
        assert!(missing.is_empty());
        assert!(extra.is_empty());
    }

    #[test]
    fn test_missing_and_extra() {
        let declared = set(&["q0", "q1", "q2"]);
        let keys = set(&["q0", "q3"]);
        let (missing, extra) = key_set_mismatch(&declared, &keys);
        assert_eq!(missing, vec!["q1".to_string(), "q2".to_string()]);
        assert_eq!(extra, vec!["q3".to_string()]);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let declared = set(&["q2", "q0", "q1"]);
        let keys = set(&[]);
        let (missing, _) = key_set_mismatch(&declared, &keys);
        assert_eq!(missing, vec!["q2", "q0", "q1"]);
    }
}
