//! Declarative lifecycle transition tables.
//!
//! A `TransitionTable` maps each state of one entity type to the set of
//! action keys that are structurally reachable from it. Reachability is
//! necessary but not sufficient: permission facts gate each key further.
//!
//! Tables are built once at startup and validated with `validate`:
//!
//! - every state of the closed state enum must have a row
//! - a terminal state may only list read-only keys
//!
//! Looking up a state without a row is a configuration error. It is never
//! treated as "all actions" or quietly as "no actions".

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use capdev_contracts::{
    action::ActionKey,
    entity::EntityType,
    error::{ActionError, ActionResult},
};

#[derive(Debug, Clone)]
pub struct TransitionTable<S> {
    entity: EntityType,
    rows: BTreeMap<S, BTreeSet<ActionKey>>,
    terminal: BTreeSet<S>,
}

impl<S> TransitionTable<S>
where
    S: Copy + Ord + fmt::Display,
{
    pub fn new(entity: EntityType) -> Self {
        Self {
            entity,
            rows: BTreeMap::new(),
            terminal: BTreeSet::new(),
        }
    }

    /// Declare the keys reachable from a non-terminal `state`.
    pub fn state(mut self, state: S, keys: &[ActionKey]) -> Self {
        self.rows.insert(state, keys.iter().copied().collect());
        self
    }

    /// Declare a terminal `state`. Only read-only keys are accepted by
    /// `validate`.
    pub fn terminal(mut self, state: S, keys: &[ActionKey]) -> Self {
        self.terminal.insert(state);
        self.state(state, keys)
    }

    /// Check the table against the full list of states of its enum.
    pub fn validate(self, all_states: &[S]) -> ActionResult<Self> {
        for state in all_states {
            if !self.rows.contains_key(state) {
                return Err(ActionError::UnknownState {
                    entity: self.entity.to_string(),
                    state: state.to_string(),
                });
            }
        }

        for state in &self.terminal {
            let keys = &self.rows[state];
            if let Some(key) = keys.iter().find(|k| !k.is_read_only()) {
                return Err(ActionError::MutatingTerminalState {
                    entity: self.entity.to_string(),
                    state: state.to_string(),
                    key: key.to_string(),
                });
            }
        }

        Ok(self)
    }

    /// The keys structurally reachable from `state`.
    pub fn allowed_transitions(&self, state: S) -> ActionResult<&BTreeSet<ActionKey>> {
        self.rows
            .get(&state)
            .ok_or_else(|| ActionError::UnknownState {
                entity: self.entity.to_string(),
                state: state.to_string(),
            })
    }

    /// Every key that appears in any row.
    pub fn keys(&self) -> BTreeSet<ActionKey> {
        self.rows.values().flatten().copied().collect()
    }
}

impl<S> TransitionTable<S>
where
    S: Copy + Ord + fmt::Display + FromStr,
{
    /// Parse a raw snapshot state tag and look up its row.
    ///
    /// `None` is `MissingState`; a tag that does not parse, or parses to a
    /// state with no row, is `UnknownState`.
    pub fn lookup(&self, raw: Option<&str>) -> ActionResult<&BTreeSet<ActionKey>> {
        let raw = raw.ok_or_else(|| ActionError::MissingState {
            entity: self.entity.to_string(),
        })?;
        let state = raw.parse::<S>().map_err(|_| ActionError::UnknownState {
            entity: self.entity.to_string(),
            state: raw.to_string(),
        })?;
        self.allowed_transitions(state)
    }
}
