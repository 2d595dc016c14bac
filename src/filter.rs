use crate::glob::wildcard_match;
use crate::types::BinaryMap;

// =============================================================================
// Property selection
// =============================================================================

/// Pick the attachments named in a comma-separated property list.
/// When none of the named properties exist, every attachment is selected.
pub fn select_binary_properties(binary: &BinaryMap, property_names: &str) -> BinaryMap {
    let selected: BinaryMap = property_names
        .split(',')
        .map(str::trim)
        .filter_map(|name| binary.get_key_value(name))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if selected.is_empty() {
        tracing::debug!(
            "No binary property named '{property_names}', selecting all {} attachments",
            binary.len()
        );
        return binary.clone();
    }
    selected
}

// =============================================================================
// Pattern filtering
// =============================================================================

/// Keep the attachments whose key matches `pattern`.
/// An empty pattern or `*` passes the set through untouched.
pub fn filter_binary_files(files: BinaryMap, pattern: &str) -> BinaryMap {
    if pattern.is_empty() || pattern == "*" {
        return files;
    }

    files
        .into_iter()
        .filter(|(key, _)| wildcard_match(key, pattern))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
