//! Core trait definitions for the action authorization engine.
//!
//! These three traits are the seams of the engine:
//!
//! - `PermissionEvaluator`: answers named ownership/role/state facts
//! - `ActionProvider`:      builds candidate descriptors for one entity type
//! - `AllowList`:           the engine's independent (entity, context) allow-list
//!
//! The engine owns the order they run in. Providers are never called
//! directly by outside collaborators.

use std::fmt;

use capdev_contracts::{
    action::{ActionContext, ActionDescriptor, ActionKey},
    entity::{EntitySnapshot, EntityType},
    error::ActionResult,
    principal::Principal,
};

/// A stateless library of permission facts.
///
/// Implementations must be pure and total: every fact returns a boolean for
/// every (principal, snapshot) pair, with no I/O and no caching across calls.
/// Ownership can change between calls, so a fact always reflects the
/// snapshot it is given.
pub trait PermissionEvaluator: Send + Sync {
    /// The closed set of fact tags this evaluator understands.
    type Fact: Copy + fmt::Debug + Send + Sync;

    /// Evaluate one fact.
    ///
    /// An `Err` here is a configuration error (for example a state-derived
    /// fact on a snapshot whose state tag is not recognized), never a denial.
    fn evaluate(
        &self,
        fact: Self::Fact,
        principal: &Principal,
        snapshot: &EntitySnapshot,
    ) -> ActionResult<bool>;
}

/// Builds the candidate action list for one entity type.
pub trait ActionProvider: Send + Sync {
    /// The entity type this provider is registered under.
    fn entity_type(&self) -> EntityType;

    /// The fixed menu order for this entity type. The engine sorts the final
    /// result by position in this slice.
    fn key_order(&self) -> &[ActionKey];

    /// Return candidate descriptors for `snapshot` as seen by `principal` in
    /// `context`.
    ///
    /// Actions not declared for `context` must be omitted, not disabled. An
    /// empty `Vec` is a valid result.
    fn provide(
        &self,
        snapshot: &EntitySnapshot,
        principal: &Principal,
        context: ActionContext,
    ) -> ActionResult<Vec<ActionDescriptor>>;
}

/// The engine's final deny-by-default filter.
///
/// Independent of every provider. A key is returned to a renderer only if
/// the allow-list explicitly lists it for the (entity, context) pair.
pub trait AllowList: Send + Sync {
    /// Return true only if `key` is explicitly listed for `entity` in `context`.
    fn permits(&self, entity: EntityType, context: ActionContext, key: ActionKey) -> bool;
}
