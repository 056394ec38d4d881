//! Entity identity and snapshot types.
//!
//! The persistence layer hands the engine an `EntitySnapshot` per read. The
//! engine only ever borrows it, so a snapshot cannot change during a call.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// The closed set of entity types the engine can compute actions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Request,
    Offer,
    Document,
    User,
}

impl EntityType {
    /// Every entity type, in declaration order.
    pub const ALL: [EntityType; 4] = [
        EntityType::Request,
        EntityType::Offer,
        EntityType::Document,
        EntityType::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Request => "Request",
            EntityType::Offer => "Offer",
            EntityType::Document => "Document",
            EntityType::User => "User",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ActionError::UnregisteredEntity {
                entity: s.to_string(),
            })
    }
}

/// Reference to a user, organization, or entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ref(pub uuid::Uuid);

impl Ref {
    /// Create a fresh, random reference.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// The nil reference. Never identifies a real principal or entity.
    pub fn nil() -> Self {
        Self(uuid::Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for Ref {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Relationship and role tags.
///
/// Used both as principal roles and as keys of `EntitySnapshot::related_refs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleTag {
    Owner,
    Partner,
    Admin,
    Viewer,
}

/// A scalar field value carried on a snapshot.
///
/// Deserialized untagged: JSON `null`, booleans, integers, RFC 3339
/// timestamps, then any other string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl Scalar {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Immutable read projection of one domain entity.
///
/// `state` holds the raw lifecycle tag as persisted (e.g. `"ACTIVE"`). It is
/// `None` for stateless entity types such as documents. Providers parse it
/// into their closed state enum; a tag they do not know is a configuration
/// error, never an implicit "all actions".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub entity_type: EntityType,
    pub id: Ref,
    #[serde(default)]
    pub state: Option<String>,
    pub owner_ref: Ref,
    #[serde(default)]
    pub related_refs: BTreeMap<RoleTag, Ref>,
    #[serde(default)]
    pub fields: BTreeMap<String, Scalar>,
}

impl EntitySnapshot {
    /// Start a snapshot with no state, relationships, or fields.
    pub fn new(entity_type: EntityType, id: Ref, owner_ref: Ref) -> Self {
        Self {
            entity_type,
            id,
            state: None,
            owner_ref,
            related_refs: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_related(mut self, role: RoleTag, target: Ref) -> Self {
        self.related_refs.insert(role, target);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Scalar) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn related(&self, role: RoleTag) -> Option<Ref> {
        self.related_refs.get(&role).copied()
    }

    pub fn field(&self, name: &str) -> Option<&Scalar> {
        self.fields.get(name)
    }

    /// Read a boolean field. Missing or non-boolean values read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.field(name).and_then(Scalar::as_bool).unwrap_or(false)
    }
}
