//! The shared provider algorithm.
//!
//! Every provider follows the same shape: take the structurally reachable
//! keys, drop keys not declared for the requesting context, gate each key on
//! its permission facts, attach static confirmation metadata, and emit in the
//! declared order. `ActionCatalog` implements that shape once; providers only
//! supply their specs, their candidate set, and their evaluator.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use capdev_contracts::{
    action::{ActionContext, ActionDescriptor, ActionKey, ActionKind, HttpMethod},
    entity::{EntitySnapshot, EntityType},
    error::{ActionError, ActionResult},
    principal::Principal,
};

use crate::traits::PermissionEvaluator;

/// Static declaration of one action for one entity type.
///
/// `visible_when` is the relationship gate: when it is false the action is
/// omitted entirely. `enabled_when` is an optional condition: when it is
/// false the descriptor is still returned, with `enabled: false`, and with
/// `visible` taken from `show_disabled`.
#[derive(Debug, Clone)]
pub struct ActionSpec<F> {
    pub key: ActionKey,
    pub label: &'static str,
    pub kind: ActionKind,
    pub method: HttpMethod,
    pub target: &'static str,
    pub contexts: &'static [ActionContext],
    pub confirmation: Option<&'static str>,
    pub visible_when: F,
    pub enabled_when: Option<F>,
    pub show_disabled: bool,
}

impl<F: Copy> ActionSpec<F> {
    pub fn new(
        key: ActionKey,
        label: &'static str,
        kind: ActionKind,
        method: HttpMethod,
        target: &'static str,
        visible_when: F,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            method,
            target,
            contexts: &[],
            confirmation: None,
            visible_when,
            enabled_when: None,
            show_disabled: false,
        }
    }

    /// A `GET` link.
    pub fn navigate(key: ActionKey, label: &'static str, target: &'static str, fact: F) -> Self {
        Self::new(key, label, ActionKind::Navigate, HttpMethod::Get, target, fact)
    }

    pub fn mutate(
        key: ActionKey,
        label: &'static str,
        method: HttpMethod,
        target: &'static str,
        fact: F,
    ) -> Self {
        Self::new(key, label, ActionKind::Mutate, method, target, fact)
    }

    /// A dialog whose form posts to `target`.
    pub fn dialog(key: ActionKey, label: &'static str, target: &'static str, fact: F) -> Self {
        Self::new(key, label, ActionKind::Dialog, HttpMethod::Post, target, fact)
    }

    pub fn in_contexts(mut self, contexts: &'static [ActionContext]) -> Self {
        self.contexts = contexts;
        self
    }

    pub fn confirm(mut self, message: &'static str) -> Self {
        self.confirmation = Some(message);
        self
    }

    pub fn enabled_when(mut self, fact: F) -> Self {
        self.enabled_when = Some(fact);
        self
    }

    /// Keep the descriptor visible (greyed out) when `enabled_when` fails.
    pub fn show_disabled(mut self) -> Self {
        self.show_disabled = true;
        self
    }

    fn describe(&self, enabled: bool) -> ActionDescriptor {
        ActionDescriptor {
            key: self.key,
            label: self.label.to_string(),
            kind: self.kind,
            method: self.method,
            target: self.target.to_string(),
            requires_confirmation: self.confirmation.is_some(),
            confirmation_message: self.confirmation.map(str::to_string),
            enabled,
            visible: enabled || self.show_disabled,
        }
    }
}

/// The validated set of action specs for one entity type, in menu order.
#[derive(Debug, Clone)]
pub struct ActionCatalog<F> {
    entity: EntityType,
    specs: Vec<ActionSpec<F>>,
    order: Vec<ActionKey>,
}

impl<F: Copy> ActionCatalog<F> {
    /// Build a catalog. Spec order is menu order.
    ///
    /// Fails on a duplicate key or on a destructive key declared without a
    /// confirmation message.
    pub fn new(entity: EntityType, specs: Vec<ActionSpec<F>>) -> ActionResult<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.key) {
                return Err(ActionError::DuplicateKey {
                    entity: entity.to_string(),
                    key: spec.key.to_string(),
                });
            }
            if spec.key.is_destructive() && spec.confirmation.is_none() {
                return Err(ActionError::UnconfirmedDestructive {
                    entity: entity.to_string(),
                    key: spec.key.to_string(),
                });
            }
        }

        let order = specs.iter().map(|s| s.key).collect();
        Ok(Self { entity, specs, order })
    }

    pub fn order(&self) -> &[ActionKey] {
        &self.order
    }

    pub fn keys(&self) -> BTreeSet<ActionKey> {
        self.order.iter().copied().collect()
    }

    /// Fail unless every key in `keys` has a spec in this catalog.
    ///
    /// Used to check a transition table against its catalog at startup.
    pub fn ensure_declares(&self, keys: &BTreeSet<ActionKey>) -> ActionResult<()> {
        match keys.iter().find(|k| !self.order.contains(k)) {
            Some(key) => Err(ActionError::ConfigError {
                reason: format!(
                    "transition table for '{}' references undeclared action '{}'",
                    self.entity, key
                ),
            }),
            None => Ok(()),
        }
    }

    /// Run the shared provider algorithm over `candidates`.
    pub fn assemble<E>(
        &self,
        candidates: &BTreeSet<ActionKey>,
        evaluator: &E,
        principal: &Principal,
        snapshot: &EntitySnapshot,
        context: ActionContext,
    ) -> ActionResult<Vec<ActionDescriptor>>
    where
        E: PermissionEvaluator<Fact = F>,
    {
        let mut out = Vec::new();

        for spec in &self.specs {
            if !candidates.contains(&spec.key) || !spec.contexts.contains(&context) {
                continue;
            }

            if !evaluator.evaluate(spec.visible_when, principal, snapshot)? {
                continue;
            }

            let enabled = match spec.enabled_when {
                Some(fact) => evaluator.evaluate(fact, principal, snapshot)?,
                None => true,
            };

            out.push(spec.describe(enabled));
        }

        debug!(
            entity = %self.entity,
            context = %context,
            candidates = candidates.len(),
            returned = out.len(),
            "catalog assembled"
        );

        Ok(out)
    }
}
