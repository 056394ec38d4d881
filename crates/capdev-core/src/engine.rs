//! The action engine: the single entry point for computing actions.
//!
//! Every call runs the same pipeline:
//!
//!   validate inputs → resolve provider → provide → key checks → allow-list → order
//!
//! The guarantee is structural: nothing a provider returns reaches a
//! renderer unless the allow-list explicitly names its key for the
//! (entity type, context) pair. A buggy provider can hide actions, never
//! leak them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use capdev_contracts::{
    action::{ActionContext, ActionDescriptor},
    entity::{EntitySnapshot, EntityType},
    error::{ActionError, ActionResult},
    principal::Principal,
};

use crate::{
    registry::ActionRegistry,
    traits::{ActionProvider, AllowList},
};

/// How the engine reacts to a snapshot whose state has no transition row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Every configuration error propagates. Use in development and tests.
    #[default]
    Strict,
    /// Unknown or missing states degrade to an empty, logged result. All
    /// other configuration errors still propagate.
    Lenient,
}

/// Computes the ordered, allow-listed action list for an entity.
///
/// Build one engine at startup, register a provider per entity type, then
/// share it read-only (e.g. behind an `Arc`) across request handlers.
pub struct ActionEngine {
    registry: ActionRegistry,
    allow_list: Box<dyn AllowList>,
    mode: EngineMode,
}

impl ActionEngine {
    pub fn new(allow_list: Box<dyn AllowList>, mode: EngineMode) -> Self {
        Self {
            registry: ActionRegistry::default(),
            allow_list,
            mode,
        }
    }

    /// Register the provider for one entity type.
    ///
    /// Registering a second provider for the same type is a configuration
    /// error.
    pub fn register(&mut self, provider: Box<dyn ActionProvider>) -> ActionResult<()> {
        debug!(entity = %provider.entity_type(), "registering action provider");
        self.registry.register(provider)
    }

    /// Fail unless every entity type has a registered provider.
    pub fn ensure_complete(&self) -> ActionResult<()> {
        let registered: HashSet<EntityType> = self.registry.registered().collect();
        match EntityType::ALL.into_iter().find(|t| !registered.contains(t)) {
            Some(missing) => Err(ActionError::UnregisteredEntity {
                entity: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    /// Compute the actions `principal` may see for `snapshot` in `context`.
    ///
    /// # Errors
    ///
    /// Input mismatches (`EntityTypeMismatch`, `UnresolvedPrincipal`) and
    /// configuration errors propagate. Denied actions are not errors: they
    /// are simply absent or disabled in the returned list, which may be empty.
    pub fn compute_actions(
        &self,
        entity_type: EntityType,
        snapshot: &EntitySnapshot,
        principal: &Principal,
        context: ActionContext,
    ) -> ActionResult<Vec<ActionDescriptor>> {
        // ── Step 1: Input validation ─────────────────────────────────────────
        if snapshot.entity_type != entity_type {
            return Err(ActionError::EntityTypeMismatch {
                requested: entity_type.to_string(),
                actual: snapshot.entity_type.to_string(),
            });
        }
        if !principal.is_resolved() {
            return Err(ActionError::UnresolvedPrincipal);
        }

        debug!(
            entity = %entity_type,
            entity_id = %snapshot.id,
            principal = %principal.id,
            context = %context,
            "computing actions"
        );

        // ── Step 2: Provider ─────────────────────────────────────────────────
        let provider = self.registry.resolve(entity_type)?;

        let candidates = match provider.provide(snapshot, principal, context) {
            Ok(candidates) => candidates,
            Err(e) if e.is_state_lookup() && self.mode == EngineMode::Lenient => {
                error!(
                    entity = %entity_type,
                    entity_id = %snapshot.id,
                    state = snapshot.state.as_deref().unwrap_or("<none>"),
                    context = %context,
                    error = %e,
                    "state lookup failed; returning no actions"
                );
                return Ok(Vec::new());
            }
            Err(e) => {
                error!(
                    entity = %entity_type,
                    entity_id = %snapshot.id,
                    context = %context,
                    error = %e,
                    "action provider failed"
                );
                return Err(e);
            }
        };

        // ── Step 3: Key checks ───────────────────────────────────────────────
        //
        // A duplicate key or an unconfirmed destructive action is a provider
        // bug and fails the whole call.
        let mut seen = HashSet::new();
        for descriptor in &candidates {
            if !seen.insert(descriptor.key) {
                error!(entity = %entity_type, key = %descriptor.key, "duplicate action key");
                return Err(ActionError::DuplicateKey {
                    entity: entity_type.to_string(),
                    key: descriptor.key.to_string(),
                });
            }
            if descriptor.key.is_destructive() && !descriptor.requires_confirmation {
                error!(entity = %entity_type, key = %descriptor.key, "unconfirmed destructive action");
                return Err(ActionError::UnconfirmedDestructive {
                    entity: entity_type.to_string(),
                    key: descriptor.key.to_string(),
                });
            }
        }

        // ── Step 4: Deny-by-default pass ─────────────────────────────────────
        let mut actions: Vec<ActionDescriptor> = candidates
            .into_iter()
            .filter(|d| {
                let permitted = self.allow_list.permits(entity_type, context, d.key);
                if !permitted {
                    warn!(
                        entity = %entity_type,
                        context = %context,
                        key = %d.key,
                        "action not in allow-list; stripped"
                    );
                }
                permitted
            })
            .collect();

        // ── Step 5: Fixed ordering ───────────────────────────────────────────
        let order = provider.key_order();
        actions.sort_by_key(|d| order.iter().position(|k| *k == d.key).unwrap_or(usize::MAX));

        debug!(
            entity = %entity_type,
            context = %context,
            count = actions.len(),
            "actions computed"
        );

        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use capdev_contracts::{
        action::{ActionKey, ActionKind, HttpMethod},
        entity::Ref,
    };

    use super::*;

    // ── Mock implementations ──────────────────────────────────────────────────

    /// Allow-list backed by a fixed set of (entity, context, key) triples.
    struct FixedAllowList(BTreeSet<(EntityType, ActionContext, ActionKey)>);

    impl AllowList for FixedAllowList {
        fn permits(&self, entity: EntityType, context: ActionContext, key: ActionKey) -> bool {
            self.0.contains(&(entity, context, key))
        }
    }

    /// Allows every key for `Document` in every context.
    fn allow_all_documents() -> Box<dyn AllowList> {
        let mut set = BTreeSet::new();
        for context in ActionContext::ALL {
            for key in ActionKey::ALL {
                set.insert((EntityType::Document, context, key));
            }
        }
        Box::new(FixedAllowList(set))
    }

    fn descriptor(key: ActionKey, confirm: bool) -> ActionDescriptor {
        ActionDescriptor {
            key,
            label: key.to_string(),
            kind: ActionKind::Mutate,
            method: HttpMethod::Post,
            target: format!("/documents/{{id}}/{key}"),
            requires_confirmation: confirm,
            confirmation_message: confirm.then(|| "Are you sure?".to_string()),
            enabled: true,
            visible: true,
        }
    }

    /// Returns a fixed list regardless of input; `order` drives sorting.
    struct ScriptedProvider {
        entity: EntityType,
        order: Vec<ActionKey>,
        returns: Vec<ActionDescriptor>,
    }

    impl ActionProvider for ScriptedProvider {
        fn entity_type(&self) -> EntityType {
            self.entity
        }

        fn key_order(&self) -> &[ActionKey] {
            &self.order
        }

        fn provide(
            &self,
            _snapshot: &EntitySnapshot,
            _principal: &Principal,
            _context: ActionContext,
        ) -> ActionResult<Vec<ActionDescriptor>> {
            Ok(self.returns.clone())
        }
    }

    /// Always fails its state lookup.
    struct BrokenStateProvider;

    impl ActionProvider for BrokenStateProvider {
        fn entity_type(&self) -> EntityType {
            EntityType::Document
        }

        fn key_order(&self) -> &[ActionKey] {
            &[]
        }

        fn provide(
            &self,
            snapshot: &EntitySnapshot,
            _principal: &Principal,
            _context: ActionContext,
        ) -> ActionResult<Vec<ActionDescriptor>> {
            Err(ActionError::UnknownState {
                entity: "Document".to_string(),
                state: snapshot.state.clone().unwrap_or_default(),
            })
        }
    }

    fn engine_with(provider: Box<dyn ActionProvider>, mode: EngineMode) -> ActionEngine {
        let mut engine = ActionEngine::new(allow_all_documents(), mode);
        engine.register(provider).unwrap();
        engine
    }

    fn scripted(returns: Vec<ActionDescriptor>) -> Box<dyn ActionProvider> {
        Box::new(ScriptedProvider {
            entity: EntityType::Document,
            order: vec![ActionKey::View, ActionKey::Download, ActionKey::Delete],
            returns,
        })
    }

    fn document() -> EntitySnapshot {
        EntitySnapshot::new(EntityType::Document, Ref::new(), Ref::new())
    }

    fn principal() -> Principal {
        Principal::new(Ref::new())
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_entity_type_mismatch_rejected() {
        let engine = engine_with(scripted(vec![]), EngineMode::Strict);
        let result = engine.compute_actions(
            EntityType::Offer,
            &document(),
            &principal(),
            ActionContext::Detail,
        );
        assert!(matches!(result, Err(ActionError::EntityTypeMismatch { .. })));
    }

    #[test]
    fn test_unresolved_principal_rejected() {
        let engine = engine_with(scripted(vec![]), EngineMode::Strict);
        let result = engine.compute_actions(
            EntityType::Document,
            &document(),
            &Principal::new(Ref::nil()),
            ActionContext::Detail,
        );
        assert!(matches!(result, Err(ActionError::UnresolvedPrincipal)));
    }

    #[test]
    fn test_unregistered_entity_is_configuration_error() {
        let engine = ActionEngine::new(allow_all_documents(), EngineMode::Strict);
        let result = engine.compute_actions(
            EntityType::Document,
            &document(),
            &principal(),
            ActionContext::Detail,
        );
        match result {
            Err(ActionError::UnregisteredEntity { entity }) => assert_eq!(entity, "Document"),
            other => panic!("expected UnregisteredEntity, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_provider_rejected() {
        let mut engine = engine_with(scripted(vec![]), EngineMode::Strict);
        let result = engine.register(scripted(vec![]));
        assert!(matches!(result, Err(ActionError::DuplicateProvider { .. })));
    }

    #[test]
    fn test_duplicate_descriptor_key_is_fatal() {
        let engine = engine_with(
            scripted(vec![
                descriptor(ActionKey::View, false),
                descriptor(ActionKey::View, false),
            ]),
            EngineMode::Lenient,
        );
        let result = engine.compute_actions(
            EntityType::Document,
            &document(),
            &principal(),
            ActionContext::Detail,
        );
        assert!(matches!(result, Err(ActionError::DuplicateKey { .. })));
    }

    #[test]
    fn test_unconfirmed_destructive_is_fatal() {
        let engine = engine_with(
            scripted(vec![descriptor(ActionKey::Delete, false)]),
            EngineMode::Strict,
        );
        let result = engine.compute_actions(
            EntityType::Document,
            &document(),
            &principal(),
            ActionContext::Detail,
        );
        assert!(matches!(result, Err(ActionError::UnconfirmedDestructive { .. })));
    }

    #[test]
    fn test_allow_list_strips_unlisted_keys() {
        let mut set = BTreeSet::new();
        set.insert((EntityType::Document, ActionContext::List, ActionKey::View));
        let mut engine = ActionEngine::new(Box::new(FixedAllowList(set)), EngineMode::Strict);
        engine
            .register(scripted(vec![
                descriptor(ActionKey::View, false),
                descriptor(ActionKey::Download, false),
                descriptor(ActionKey::Delete, true),
            ]))
            .unwrap();

        let list = engine
            .compute_actions(EntityType::Document, &document(), &principal(), ActionContext::List)
            .unwrap();
        let keys: Vec<ActionKey> = list.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![ActionKey::View]);

        // No entry at all for DETAIL: nothing survives.
        let detail = engine
            .compute_actions(EntityType::Document, &document(), &principal(), ActionContext::Detail)
            .unwrap();
        assert!(detail.is_empty());
    }

    #[test]
    fn test_result_follows_declared_order() {
        let engine = engine_with(
            scripted(vec![
                descriptor(ActionKey::Delete, true),
                descriptor(ActionKey::View, false),
                descriptor(ActionKey::Download, false),
            ]),
            EngineMode::Strict,
        );
        let actions = engine
            .compute_actions(EntityType::Document, &document(), &principal(), ActionContext::Detail)
            .unwrap();
        let keys: Vec<ActionKey> = actions.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![ActionKey::View, ActionKey::Download, ActionKey::Delete]);
    }

    #[test]
    fn test_unknown_state_propagates_in_strict_mode() {
        let engine = engine_with(Box::new(BrokenStateProvider), EngineMode::Strict);
        let snapshot = document().with_state("ARCHIVED");
        let result =
            engine.compute_actions(EntityType::Document, &snapshot, &principal(), ActionContext::Detail);
        assert!(matches!(result, Err(ActionError::UnknownState { .. })));
    }

    #[test]
    fn test_unknown_state_degrades_in_lenient_mode() {
        let engine = engine_with(Box::new(BrokenStateProvider), EngineMode::Lenient);
        let snapshot = document().with_state("ARCHIVED");
        let actions = engine
            .compute_actions(EntityType::Document, &snapshot, &principal(), ActionContext::Detail)
            .unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_ensure_complete_names_missing_type() {
        let engine = engine_with(scripted(vec![]), EngineMode::Strict);
        match engine.ensure_complete() {
            Err(ActionError::UnregisteredEntity { entity }) => assert_eq!(entity, "Request"),
            other => panic!("expected UnregisteredEntity, got {:?}", other),
        }
    }

    #[test]
    fn test_engine_mode_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: EngineMode,
        }
        let w: Wrapper = serde_json::from_str(r#"{ "mode": "lenient" }"#).unwrap();
        assert_eq!(w.mode, EngineMode::Lenient);
        assert_eq!(EngineMode::default(), EngineMode::Strict);
    }
}
