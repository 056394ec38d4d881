//! Schema-based wire-contract verifier.
//!
//! `ContractVerifier` checks the serialized form of a descriptor list, the
//! exact bytes a remote renderer will read. All failures are collected
//! before returning so operators see the full set in one pass.

use std::collections::HashSet;

use serde_json::{json, Value};
use tracing::{debug, warn};

use capdev_contracts::{
    action::{ActionDescriptor, ActionKey},
    error::{ActionError, ActionResult},
    verify::{VerificationFailure, VerificationReport},
};

/// The JSON Schema of the wire contract: a list of descriptor objects.
pub fn wire_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "array",
        "items": {
            "type": "object",
            "additionalProperties": false,
            "required": [
                "key", "label", "kind", "method", "target",
                "requiresConfirmation", "enabled", "visible"
            ],
            "properties": {
                "key": { "type": "string", "pattern": "^[a-z][a-z_]*$" },
                "label": { "type": "string", "minLength": 1 },
                "kind": { "enum": ["NAVIGATE", "MUTATE", "DIALOG"] },
                "method": { "enum": ["GET", "POST", "PATCH", "DELETE"] },
                "target": { "type": "string", "minLength": 1 },
                "requiresConfirmation": { "type": "boolean" },
                "confirmationMessage": { "type": "string", "minLength": 1 },
                "enabled": { "type": "boolean" },
                "visible": { "type": "boolean" }
            }
        }
    })
}

/// Verifies descriptor lists against the wire contract.
pub struct ContractVerifier {
    validator: jsonschema::Validator,
}

impl ContractVerifier {
    /// Compile the embedded wire schema.
    pub fn new() -> ActionResult<Self> {
        let validator =
            jsonschema::validator_for(&wire_schema()).map_err(|e| ActionError::ConfigError {
                reason: format!("invalid wire schema: {e}"),
            })?;
        Ok(Self { validator })
    }

    /// Serialize `actions` and verify the result.
    pub fn verify(&self, actions: &[ActionDescriptor]) -> ActionResult<VerificationReport> {
        let wire = Self::serialize(actions)?;
        Ok(self.verify_value(&wire))
    }

    /// Serialize and verify, returning the wire value only if every check
    /// passed.
    pub fn ensure(&self, actions: &[ActionDescriptor]) -> ActionResult<Value> {
        let wire = Self::serialize(actions)?;
        let report = self.verify_value(&wire);
        if report.passed {
            return Ok(wire);
        }

        let reason = report
            .failures
            .iter()
            .map(|f| format!("[{}] {}", f.check_id, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ActionError::ContractViolation { reason })
    }

    /// Verify an already-serialized list.
    pub fn verify_value(&self, wire: &Value) -> VerificationReport {
        let mut failures: Vec<VerificationFailure> = Vec::new();

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        for error in self.validator.iter_errors(wire) {
            let message = format!("JSON Schema violation at {}: {}", error.instance_path, error);
            warn!(%message, "structural validation failure");
            failures.push(VerificationFailure {
                check_id: "json-schema".to_string(),
                message,
            });
        }

        // ── Phase 2: Semantic checks ──────────────────────────────────────────
        let items = wire.as_array().map(Vec::as_slice).unwrap_or_default();
        let mut seen = HashSet::new();

        for item in items {
            let key = item.get("key").and_then(Value::as_str).unwrap_or("");
            let flag = |name: &str| item.get(name).and_then(Value::as_bool).unwrap_or(false);

            debug!(key, "checking descriptor");

            if !seen.insert(key.to_string()) {
                failures.push(VerificationFailure {
                    check_id: "unique-keys".to_string(),
                    message: format!("key '{key}' appears more than once"),
                });
            }

            if flag("enabled") && !flag("visible") {
                failures.push(VerificationFailure {
                    check_id: "enabled-visible".to_string(),
                    message: format!("'{key}' is enabled but not visible"),
                });
            }

            let has_message = item.get("confirmationMessage").is_some();
            if flag("requiresConfirmation") != has_message {
                failures.push(VerificationFailure {
                    check_id: "confirmation-message".to_string(),
                    message: format!(
                        "'{key}' requiresConfirmation disagrees with confirmationMessage presence"
                    ),
                });
            }

            match key.parse::<ActionKey>() {
                Ok(parsed) if parsed.is_destructive() && !flag("requiresConfirmation") => {
                    failures.push(VerificationFailure {
                        check_id: "destructive-confirmation".to_string(),
                        message: format!("destructive action '{key}' must require confirmation"),
                    });
                }
                Ok(_) => {}
                Err(e) => failures.push(VerificationFailure {
                    check_id: "known-key".to_string(),
                    message: e.to_string(),
                }),
            }
        }

        VerificationReport {
            passed: failures.is_empty(),
            failures,
        }
    }

    fn serialize(actions: &[ActionDescriptor]) -> ActionResult<Value> {
        serde_json::to_value(actions).map_err(|e| ActionError::ContractViolation {
            reason: format!("descriptor list is not serializable: {e}"),
        })
    }
}
