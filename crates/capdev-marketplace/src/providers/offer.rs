use capdev_contracts::{
    action::{ActionContext, ActionDescriptor, ActionKey, HttpMethod},
    entity::{EntitySnapshot, EntityType},
    error::ActionResult,
    principal::Principal,
};
use capdev_core::{traits::ActionProvider, ActionCatalog, ActionSpec, TransitionTable};

use super::EVERYWHERE;
use crate::facts::{Fact, MarketplaceEvaluator};
use crate::state::OfferState;

/// Actions on an offer made by a partner organization against a request.
///
/// `owner_ref` is the requesting organization, which decides on the offer.
/// `related_refs[PARTNER]` is the organization that made it; it may read
/// the offer and its documents. Edits go through administrators.
pub struct OfferProvider {
    table: TransitionTable<OfferState>,
    catalog: ActionCatalog<Fact>,
    evaluator: MarketplaceEvaluator,
}

impl OfferProvider {
    pub fn new() -> ActionResult<Self> {
        use ActionKey::*;

        let catalog = ActionCatalog::new(EntityType::Offer, specs())?;
        let table = TransitionTable::new(EntityType::Offer)
            .state(
                OfferState::Active,
                &[View, Edit, Accept, Reject, RequestClarification, Disable, DownloadDocs, Delete],
            )
            .state(
                OfferState::ClarificationRequested,
                &[View, Edit, Accept, Reject, Disable, DownloadDocs, Delete],
            )
            .state(OfferState::Inactive, &[View, Edit, Enable, DownloadDocs, Delete])
            .terminal(OfferState::Accepted, &[View, DownloadDocs])
            .terminal(OfferState::Rejected, &[View, DownloadDocs])
            .validate(OfferState::ALL)?;
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
        ActionSpec::navigate(ActionKey::View, "View offer", "/offers/{id}", Fact::CanViewOffer)
            .in_contexts(EVERYWHERE),
        ActionSpec::navigate(ActionKey::Edit, "Edit offer", "/offers/{id}/edit", Fact::CanEditOffer)
            .in_contexts(&[Detail, Admin]),
        ActionSpec::mutate(
            ActionKey::Accept,
            "Accept offer",
            HttpMethod::Post,
            "/offers/{id}/accept",
            Fact::CanDecideOffer,
        )
        .in_contexts(&[List, Detail, User])
        .enabled_when(Fact::CanAccept)
        .show_disabled(),
        ActionSpec::dialog(ActionKey::Reject, "Reject offer", "/offers/{id}/reject", Fact::CanDecideOffer)
            .in_contexts(&[List, Detail, User])
            .enabled_when(Fact::CanReject)
            .confirm("Reject this offer? The partner will be notified and this cannot be undone."),
        ActionSpec::dialog(
            ActionKey::RequestClarification,
            "Request clarification",
            "/offers/{id}/clarifications",
            Fact::CanDecideOffer,
        )
        .in_contexts(&[Detail])
        .enabled_when(Fact::CanRequestClarification),
        ActionSpec::mutate(
            ActionKey::Enable,
            "Enable offer",
            HttpMethod::Patch,
            "/offers/{id}/enable",
            Fact::CanManageOffer,
        )
        .in_contexts(&[List, Admin]),
        ActionSpec::mutate(
            ActionKey::Disable,
            "Disable offer",
            HttpMethod::Patch,
            "/offers/{id}/disable",
            Fact::CanManageOffer,
        )
        .in_contexts(&[List, Admin])
        .confirm("Disable this offer? The requester will no longer see it."),
        ActionSpec::navigate(
            ActionKey::DownloadDocs,
            "Download documents",
            "/offers/{id}/documents/archive",
            Fact::CanViewOffer,
        )
        .in_contexts(&[Detail, Admin, User]),
        ActionSpec::mutate(ActionKey::Delete, "Delete offer", HttpMethod::Delete, "/offers/{id}", Fact::CanManageOffer)
            .in_contexts(&[Admin])
            .confirm("Delete this offer permanently?"),
    ]
}

impl ActionProvider for OfferProvider {
    fn entity_type(&self) -> EntityType {
        EntityType::Offer
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
