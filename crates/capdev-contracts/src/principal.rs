//! The resolved acting principal.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entity::{Ref, RoleTag};

/// The authenticated actor a permission decision is evaluated for.
///
/// Authentication happens upstream; the engine only sees the resolved
/// identity, its role set, and the organizations it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Ref,
    #[serde(default)]
    pub roles: BTreeSet<RoleTag>,
    #[serde(default)]
    pub organization_refs: BTreeSet<Ref>,
}

impl Principal {
    pub fn new(id: Ref) -> Self {
        Self {
            id,
            roles: BTreeSet::new(),
            organization_refs: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: RoleTag) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn with_organization(mut self, organization: Ref) -> Self {
        self.organization_refs.insert(organization);
        self
    }

    pub fn has_role(&self, role: RoleTag) -> bool {
        self.roles.contains(&role)
    }

    /// True if `target` is this principal or one of its organizations.
    pub fn is_or_belongs_to(&self, target: Ref) -> bool {
        self.id == target || self.organization_refs.contains(&target)
    }

    /// A principal with a nil id was never resolved by the auth layer.
    pub fn is_resolved(&self) -> bool {
        !self.id.is_nil()
    }
}
