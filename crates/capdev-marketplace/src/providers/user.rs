use capdev_contracts::{
    action::{ActionContext, ActionDescriptor, ActionKey, HttpMethod},
    entity::{EntitySnapshot, EntityType},
    error::ActionResult,
    principal::Principal,
};
use capdev_core::{traits::ActionProvider, ActionCatalog, ActionSpec, TransitionTable};

use super::EVERYWHERE;
use crate::facts::{Fact, MarketplaceEvaluator};
use crate::state::UserState;

/// Actions on a platform user account.
///
/// `id` is the user's own ref and `owner_ref` its organization, so members
/// of the same organization can view each other.
pub struct UserProvider {
    table: TransitionTable<UserState>,
    catalog: ActionCatalog<Fact>,
    evaluator: MarketplaceEvaluator,
}

impl UserProvider {
    pub fn new() -> ActionResult<Self> {
        use ActionKey::*;

        let catalog = ActionCatalog::new(EntityType::User, specs())?;
        let table = TransitionTable::new(EntityType::User)
            .state(UserState::Active, &[View, Edit, ChangePassword, Disable, Delete])
            .state(UserState::Disabled, &[View, Enable, Delete])
            .state(
                UserState::PendingVerification,
                &[View, Edit, ResendVerification, Delete],
            )
            .validate(UserState::ALL)?;
        catalog.ensure_declares(&table.keys())?;

        Ok(Self {
            table,
            catalog,
            evaluator: MarketplaceEvaluator,
        })
    }
}

fn specs() -> Vec<ActionSpec<Fact>> {
    use ActionContext::*;

    vec![
        ActionSpec::navigate(ActionKey::View, "View profile", "/users/{id}", Fact::CanViewUser)
            .in_contexts(EVERYWHERE),
        ActionSpec::navigate(ActionKey::Edit, "Edit profile", "/users/{id}/edit", Fact::CanEditUser)
            .in_contexts(&[Detail, Admin, User]),
        ActionSpec::dialog(
            ActionKey::ChangePassword,
            "Change password",
            "/users/{id}/password",
            Fact::IsSelf,
        )
        .in_contexts(&[User]),
        ActionSpec::mutate(
            ActionKey::ResendVerification,
            "Resend verification email",
            HttpMethod::Post,
            "/users/{id}/verification",
            Fact::CanManageUser,
        )
        .in_contexts(&[Detail, Admin]),
        ActionSpec::mutate(
            ActionKey::Enable,
            "Enable account",
            HttpMethod::Patch,
            "/users/{id}/enable",
            Fact::CanManageOtherUser,
        )
        .in_contexts(&[List, Admin]),
        ActionSpec::mutate(
            ActionKey::Disable,
            "Disable account",
            HttpMethod::Patch,
            "/users/{id}/disable",
            Fact::CanManageOtherUser,
        )
        .in_contexts(&[List, Admin])
        .confirm("Disable this account? The user will be signed out immediately."),
        ActionSpec::mutate(
            ActionKey::Delete,
            "Delete account",
            HttpMethod::Delete,
            "/users/{id}",
            Fact::CanManageOtherUser,
        )
        .in_contexts(&[Admin])
        .confirm("Delete this account and all of its personal data?"),
    ]
}

impl ActionProvider for UserProvider {
    fn entity_type(&self) -> EntityType {
        EntityType::User
    }

    fn key_order(&self) -> &[ActionKey] {
        self.catalog.order()
    }

    fn provide(
        &self,
        snapshot: &EntitySnapshot,
        principal: &Principal,
        context: ActionContext,
    ) -> ActionResult<Vec<ActionDescriptor>> {
        let reachable = self.table.lookup(snapshot.state.as_deref())?;
        self.catalog
            .assemble(reachable, &self.evaluator, principal, snapshot, context)
    }
}
