//! Error types for the action authorization engine.
//!
//! Only genuine faults are errors. An action the principal may not perform
//! is a policy denial and is expressed by omitting or disabling its
//! descriptor, never by returning an `ActionError`.

use thiserror::Error;

/// Broad classification of an `ActionError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Policy or registration bug. Fatal, never retried.
    Configuration,
    /// The caller passed inputs that do not fit together.
    InputMismatch,
    /// A serialized descriptor list broke the wire contract.
    Contract,
}

/// The unified error type for the capdev crates.
#[derive(Debug, Error)]
pub enum ActionError {
    /// No provider is registered for the requested entity type.
    #[error("no action provider registered for entity type '{entity}'")]
    UnregisteredEntity { entity: String },

    /// Two providers were registered for the same entity type.
    #[error("an action provider for entity type '{entity}' is already registered")]
    DuplicateProvider { entity: String },

    /// The snapshot's state tag has no row in the transition table.
    #[error("unknown state '{state}' for entity type '{entity}'")]
    UnknownState { entity: String, state: String },

    /// A stateful entity type was given a snapshot without a state.
    #[error("snapshot of stateful entity type '{entity}' carries no state")]
    MissingState { entity: String },

    /// A permission fact name that the evaluator does not recognize.
    #[error("unknown permission fact '{fact}'")]
    UnknownFact { fact: String },

    #[error("unknown action key '{key}'")]
    UnknownActionKey { key: String },

    /// A provider returned the same key twice in one result.
    #[error("provider for '{entity}' returned duplicate action key '{key}'")]
    DuplicateKey { entity: String, key: String },

    /// A destructive action was described without a confirmation prompt.
    #[error("destructive action '{key}' on '{entity}' does not require confirmation")]
    UnconfirmedDestructive { entity: String, key: String },

    /// A terminal lifecycle state was declared with a state-changing action.
    #[error("terminal state '{state}' of '{entity}' declares mutating action '{key}'")]
    MutatingTerminalState {
        entity: String,
        state: String,
        key: String,
    },

    /// A policy document or other configuration input is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The snapshot's entity type disagrees with the requested one.
    #[error("snapshot is of type '{actual}' but actions were requested for '{requested}'")]
    EntityTypeMismatch { requested: String, actual: String },

    /// The principal was never resolved by the authentication layer.
    #[error("principal is not resolved")]
    UnresolvedPrincipal,

    #[error("unknown action context '{context}'")]
    UnknownContext { context: String },

    /// The wire verifier rejected a descriptor list.
    #[error("wire contract violation: {reason}")]
    ContractViolation { reason: String },
}

impl ActionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ActionError::EntityTypeMismatch { .. }
            | ActionError::UnresolvedPrincipal
            | ActionError::UnknownContext { .. } => ErrorClass::InputMismatch,
            ActionError::ContractViolation { .. } => ErrorClass::Contract,
            _ => ErrorClass::Configuration,
        }
    }

    /// Errors that lenient mode may degrade to an empty action list.
    pub fn is_state_lookup(&self) -> bool {
        matches!(
            self,
            ActionError::UnknownState { .. } | ActionError::MissingState { .. }
        )
    }
}

/// Convenience alias used throughout the capdev crates.
pub type ActionResult<T> = Result<T, ActionError>;
