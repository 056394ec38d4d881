//! Boolean permission flags for older clients.
//!
//! Older payloads carried `can_view`, `can_edit`, ... next to the action
//! list. The descriptor list is the only source of truth; these flags are
//! derived from it and never computed independently.

use std::collections::BTreeMap;

use capdev_contracts::action::ActionDescriptor;

/// Derive `can_<key>` flags from an engine result.
///
/// A flag is true only for an enabled descriptor. Keys absent from the list
/// do not appear in the map.
#[deprecated(note = "read `enabled` from the action descriptors instead")]
pub fn legacy_flags(actions: &[ActionDescriptor]) -> BTreeMap<String, bool> {
    actions
        .iter()
        .map(|d| (format!("can_{}", d.key), d.enabled))
        .collect()
}
