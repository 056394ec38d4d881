//! TOML-backed allow-list implementation.
//!
//! `TomlAllowList` indexes a `PolicyConfig` by (entity type, context) and
//! implements the `AllowList` trait from capdev-core. Lookup is
//! deny-by-default: a pair without a rule, or a key missing from its rule,
//! is not permitted.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::info;

use capdev_contracts::{
    action::{ActionContext, ActionKey},
    entity::EntityType,
    error::{ActionError, ActionResult},
};
use capdev_core::{traits::AllowList, EngineMode};

use crate::rule::PolicyConfig;

/// An `AllowList` read from a TOML policy document.
///
/// ```rust,ignore
/// use capdev_policy::TomlAllowList;
///
/// let policy = TomlAllowList::from_file(Path::new("policies/marketplace.toml"))?;
/// let engine = ActionEngine::new(Box::new(policy.clone()), policy.mode());
/// ```
#[derive(Debug, Clone)]
pub struct TomlAllowList {
    mode: EngineMode,
    index: HashMap<(EntityType, ActionContext), BTreeSet<ActionKey>>,
}

impl TomlAllowList {
    /// Parse `s` as TOML and build the allow-list.
    ///
    /// Returns `ActionError::ConfigError` if the TOML is malformed, names an
    /// unknown entity, context, or action, or lists the same
    /// (entity, context) pair twice.
    pub fn from_toml_str(s: &str) -> ActionResult<Self> {
        let config: PolicyConfig = toml::from_str(s).map_err(|e| ActionError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a TOML policy document.
    pub fn from_file(path: &Path) -> ActionResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ActionError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_config(config: PolicyConfig) -> ActionResult<Self> {
        let mut index = HashMap::new();

        for rule in config.allow {
            let pair = (rule.entity, rule.context);
            let keys: BTreeSet<ActionKey> = rule.actions.into_iter().collect();
            if index.insert(pair, keys).is_some() {
                return Err(ActionError::ConfigError {
                    reason: format!(
                        "duplicate allow rule for entity '{}' in context '{}'",
                        rule.entity, rule.context
                    ),
                });
            }
        }

        info!(
            mode = ?config.engine.mode,
            pairs = index.len(),
            "policy allow-list loaded"
        );

        Ok(Self {
            mode: config.engine.mode,
            index,
        })
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    /// The keys listed for a pair, empty when the pair has no rule.
    pub fn allowed(&self, entity: EntityType, context: ActionContext) -> BTreeSet<ActionKey> {
        self.index
            .get(&(entity, context))
            .cloned()
            .unwrap_or_default()
    }
}

impl AllowList for TomlAllowList {
    fn permits(&self, entity: EntityType, context: ActionContext, key: ActionKey) -> bool {
        self.index
            .get(&(entity, context))
            .is_some_and(|keys| keys.contains(&key))
    }
}
