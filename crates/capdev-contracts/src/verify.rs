//! Wire-contract verification report types.

use serde::{Deserialize, Serialize};

/// The result of checking a serialized descriptor list against the wire
/// contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every check passed.
    pub passed: bool,
    /// All failures collected during this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

/// A single failed check within a `VerificationReport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Identifier of the check that failed (e.g. `"json-schema"`, `"unique-keys"`).
    pub check_id: String,
    pub message: String,
}
