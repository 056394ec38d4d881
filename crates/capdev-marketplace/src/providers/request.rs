use capdev_contracts::{
    action::{ActionContext, ActionDescriptor, ActionKey, HttpMethod},
    entity::{EntitySnapshot, EntityType},
    error::ActionResult,
    principal::Principal,
};
use capdev_core::{traits::ActionProvider, ActionCatalog, ActionSpec, TransitionTable};

use super::EVERYWHERE;
use crate::facts::{Fact, MarketplaceEvaluator};
use crate::state::RequestState;

/// Actions on a capacity-development request.
///
/// `owner_ref` is the requesting organization. `related_refs[PARTNER]` is
/// set once a partner has been matched.
pub struct RequestProvider {
    table: TransitionTable<RequestState>,
    catalog: ActionCatalog<Fact>,
    evaluator: MarketplaceEvaluator,
}

impl RequestProvider {
    pub fn new() -> ActionResult<Self> {
        use ActionKey::*;

        let catalog = ActionCatalog::new(EntityType::Request, specs())?;
        let table = TransitionTable::new(EntityType::Request)
            .state(RequestState::Draft, &[View, Edit, Submit, Delete])
            .state(RequestState::UnderReview, &[View, Approve, Reject, Delete])
            .state(
                RequestState::Validated,
                &[View, Edit, ExpressInterest, ViewOffers, Close, Delete],
            )
            .state(RequestState::Matched, &[View, ViewOffers, Close])
            .state(RequestState::Rejected, &[View, Edit, Submit, Delete])
            .terminal(RequestState::Closed, &[View, ViewOffers])
            .validate(RequestState::ALL)?;
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
        ActionSpec::navigate(ActionKey::View, "View request", "/requests/{id}", Fact::CanViewRequest)
            .in_contexts(EVERYWHERE),
        ActionSpec::navigate(
            ActionKey::Edit,
            "Edit request",
            "/requests/{id}/edit",
            Fact::CanEditRequest,
        )
        .in_contexts(&[Detail, Admin, User]),
        ActionSpec::mutate(
            ActionKey::Submit,
            "Submit for review",
            HttpMethod::Post,
            "/requests/{id}/submit",
            Fact::CanSubmitRequest,
        )
        .in_contexts(&[Detail, User]),
        ActionSpec::mutate(
            ActionKey::Approve,
            "Approve request",
            HttpMethod::Post,
            "/requests/{id}/approve",
            Fact::CanReviewRequest,
        )
        .in_contexts(&[List, Detail, Admin]),
        ActionSpec::dialog(
            ActionKey::Reject,
            "Return to requester",
            "/requests/{id}/reject",
            Fact::CanReviewRequest,
        )
        .in_contexts(&[Detail, Admin])
        .confirm("Return this request to the requester? They will need to resubmit it."),
        ActionSpec::dialog(
            ActionKey::ExpressInterest,
            "Express interest",
            "/requests/{id}/interest",
            Fact::CanExpressInterest,
        )
        .in_contexts(&[Detail, User]),
        ActionSpec::navigate(
            ActionKey::ViewOffers,
            "View offers",
            "/requests/{id}/offers",
            Fact::CanViewOffers,
        )
        .in_contexts(&[Detail, Admin, User]),
        ActionSpec::mutate(
            ActionKey::Close,
            "Close request",
            HttpMethod::Post,
            "/requests/{id}/close",
            Fact::CanEditRequest,
        )
        .in_contexts(&[Detail, Admin])
        .confirm("Close this request? No further offers will be accepted."),
        ActionSpec::mutate(
            ActionKey::Delete,
            "Delete request",
            HttpMethod::Delete,
            "/requests/{id}",
            Fact::CanDeleteRequest,
        )
        .in_contexts(&[Detail, Admin])
        .confirm("Delete this request permanently?"),
    ]
}

impl ActionProvider for RequestProvider {
    fn entity_type(&self) -> EntityType {
        EntityType::Request
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
