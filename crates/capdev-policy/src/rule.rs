//! Policy document schema.
//!
//! A `PolicyConfig` is deserialized from TOML. It holds the engine settings
//! and one `AllowRule` per (entity type, context) pair. A pair with no rule
//! allows nothing.

use serde::{Deserialize, Serialize};

use capdev_contracts::{
    action::{ActionContext, ActionKey},
    entity::EntityType,
};
use capdev_core::EngineMode;

/// Engine-wide settings.
///
/// Example in TOML:
/// ```toml
/// [engine]
/// mode = "lenient"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub mode: EngineMode,
}

/// The keys allowed for one entity type in one context.
///
/// Entity, context, and keys are closed tag sets; an unknown string fails
/// deserialization rather than being ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowRule {
    pub entity: EntityType,
    pub context: ActionContext,
    #[serde(default)]
    pub actions: Vec<ActionKey>,
}

/// The top-level structure deserialized from a TOML policy file.
///
/// Example:
/// ```toml
/// [engine]
/// mode = "strict"
///
/// [[allow]]
/// entity = "Offer"
/// context = "DETAIL"
/// actions = ["view", "edit", "accept", "reject", "request_clarification"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub allow: Vec<AllowRule>,
}
