//! The marketplace permission fact library.
//!
//! Primitive facts read the principal and the snapshot directly. Composite
//! facts (`can_*`) are boolean expressions over primitives, declared here
//! once so every provider shares the same definition.

use std::fmt;
use std::str::FromStr;

use capdev_contracts::{
    entity::{EntitySnapshot, EntityType, RoleTag},
    error::{ActionError, ActionResult},
    principal::Principal,
};
use capdev_core::traits::PermissionEvaluator;

use crate::state::{OfferState, RequestState};

/// Snapshot field set by persistence when the offer's request already has
/// an accepted offer.
pub const REQUEST_HAS_ACCEPTED_OFFER: &str = "request_has_accepted_offer";

macro_rules! facts {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A named permission fact.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Fact {
            $($variant),+
        }

        impl Fact {
            pub const ALL: &'static [Fact] = &[$(Fact::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Fact::$variant => $name),+
                }
            }
        }

        impl FromStr for Fact {
            type Err = ActionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Fact::$variant),)+
                    _ => Err(ActionError::UnknownFact { fact: s.to_string() }),
                }
            }
        }
    };
}

facts! {
    // primitives
    IsAdmin => "is_admin",
    IsOwner => "is_owner",
    IsPartnerMatch => "is_partner_match",
    HasPartnerRole => "has_partner_role",
    IsSelf => "is_self",
    IsOfferActive => "is_offer_active",
    IsOfferOpen => "is_offer_open",
    IsAlreadyAccepted => "is_already_accepted",
    IsRequestDraft => "is_request_draft",
    IsRequestPublic => "is_request_public",

    // offers
    CanViewOffer => "can_view_offer",
    CanEditOffer => "can_edit_offer",
    CanDecideOffer => "can_decide_offer",
    CanAccept => "can_accept",
    CanReject => "can_reject",
    CanRequestClarification => "can_request_clarification",
    CanManageOffer => "can_manage_offer",

    // requests
    CanViewRequest => "can_view_request",
    CanEditRequest => "can_edit_request",
    CanSubmitRequest => "can_submit_request",
    CanReviewRequest => "can_review_request",
    CanExpressInterest => "can_express_interest",
    CanViewOffers => "can_view_offers",
    CanDeleteRequest => "can_delete_request",

    // documents
    CanViewDocument => "can_view_document",
    CanDeleteDocument => "can_delete_document",

    // users
    CanViewUser => "can_view_user",
    CanEditUser => "can_edit_user",
    CanManageUser => "can_manage_user",
    CanManageOtherUser => "can_manage_other_user",
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluates `Fact`s. Stateless; one shared instance serves every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketplaceEvaluator;

impl MarketplaceEvaluator {
    /// Evaluate a fact given by name, as a transport layer would receive it.
    pub fn evaluate_named(
        &self,
        name: &str,
        principal: &Principal,
        snapshot: &EntitySnapshot,
    ) -> ActionResult<bool> {
        self.evaluate(name.parse()?, principal, snapshot)
    }
}

/// The offer state, or `None` when the snapshot is not an offer.
fn offer_state(snapshot: &EntitySnapshot) -> ActionResult<Option<OfferState>> {
    if snapshot.entity_type != EntityType::Offer {
        return Ok(None);
    }
    parse_state(snapshot).map(Some)
}

fn request_state(snapshot: &EntitySnapshot) -> ActionResult<Option<RequestState>> {
    if snapshot.entity_type != EntityType::Request {
        return Ok(None);
    }
    parse_state(snapshot).map(Some)
}

fn parse_state<S: FromStr<Err = ActionError>>(snapshot: &EntitySnapshot) -> ActionResult<S> {
    snapshot
        .state
        .as_deref()
        .ok_or_else(|| ActionError::MissingState {
            entity: snapshot.entity_type.to_string(),
        })?
        .parse()
}

impl PermissionEvaluator for MarketplaceEvaluator {
    type Fact = Fact;

    fn evaluate(
        &self,
        fact: Fact,
        principal: &Principal,
        snapshot: &EntitySnapshot,
    ) -> ActionResult<bool> {
        let eval = |f: Fact| self.evaluate(f, principal, snapshot);

        let value = match fact {
            // ── Primitives ───────────────────────────────────────────────────
            Fact::IsAdmin => principal.has_role(RoleTag::Admin),
            Fact::IsOwner => principal.is_or_belongs_to(snapshot.owner_ref),
            Fact::IsPartnerMatch => snapshot
                .related(RoleTag::Partner)
                .is_some_and(|partner| principal.is_or_belongs_to(partner)),
            Fact::HasPartnerRole => principal.has_role(RoleTag::Partner),
            Fact::IsSelf => snapshot.entity_type == EntityType::User && snapshot.id == principal.id,
            Fact::IsOfferActive => offer_state(snapshot)? == Some(OfferState::Active),
            Fact::IsOfferOpen => matches!(
                offer_state(snapshot)?,
                Some(OfferState::Active | OfferState::ClarificationRequested)
            ),
            Fact::IsAlreadyAccepted => snapshot.flag(REQUEST_HAS_ACCEPTED_OFFER),
            Fact::IsRequestDraft => request_state(snapshot)? == Some(RequestState::Draft),
            Fact::IsRequestPublic => matches!(
                request_state(snapshot)?,
                Some(RequestState::Validated | RequestState::Matched | RequestState::Closed)
            ),

            // ── Offers ───────────────────────────────────────────────────────
            Fact::CanViewOffer => {
                eval(Fact::IsAdmin)? || eval(Fact::IsOwner)? || eval(Fact::IsPartnerMatch)?
            }
            Fact::CanEditOffer => eval(Fact::IsAdmin)?,
            Fact::CanDecideOffer => eval(Fact::IsOwner)?,
            Fact::CanAccept => {
                eval(Fact::CanDecideOffer)?
                    && eval(Fact::IsOfferOpen)?
                    && !eval(Fact::IsAlreadyAccepted)?
            }
            Fact::CanReject => eval(Fact::CanDecideOffer)? && eval(Fact::IsOfferOpen)?,
            Fact::CanRequestClarification => {
                eval(Fact::CanDecideOffer)? && eval(Fact::IsOfferActive)?
            }
            Fact::CanManageOffer => eval(Fact::IsAdmin)?,

            // ── Requests ─────────────────────────────────────────────────────
            Fact::CanViewRequest => {
                eval(Fact::IsAdmin)?
                    || eval(Fact::IsOwner)?
                    || eval(Fact::IsPartnerMatch)?
                    || (eval(Fact::HasPartnerRole)? && eval(Fact::IsRequestPublic)?)
            }
            Fact::CanEditRequest => eval(Fact::IsOwner)? || eval(Fact::IsAdmin)?,
            Fact::CanSubmitRequest => eval(Fact::IsOwner)?,
            Fact::CanReviewRequest => eval(Fact::IsAdmin)?,
            Fact::CanExpressInterest => {
                eval(Fact::HasPartnerRole)?
                    && !eval(Fact::IsOwner)?
                    && !eval(Fact::IsPartnerMatch)?
            }
            Fact::CanViewOffers => {
                eval(Fact::IsOwner)? || eval(Fact::IsAdmin)? || eval(Fact::IsPartnerMatch)?
            }
            Fact::CanDeleteRequest => {
                eval(Fact::IsAdmin)? || (eval(Fact::IsOwner)? && eval(Fact::IsRequestDraft)?)
            }

            // ── Documents ────────────────────────────────────────────────────
            Fact::CanViewDocument => {
                eval(Fact::IsAdmin)? || eval(Fact::IsOwner)? || eval(Fact::IsPartnerMatch)?
            }
            Fact::CanDeleteDocument => eval(Fact::IsAdmin)? || eval(Fact::IsOwner)?,

            // ── Users ────────────────────────────────────────────────────────
            Fact::CanViewUser => {
                eval(Fact::IsAdmin)? || eval(Fact::IsSelf)? || eval(Fact::IsOwner)?
            }
            Fact::CanEditUser => eval(Fact::IsAdmin)? || eval(Fact::IsSelf)?,
            Fact::CanManageUser => eval(Fact::IsAdmin)?,
            Fact::CanManageOtherUser => eval(Fact::IsAdmin)? && !eval(Fact::IsSelf)?,
        };

        Ok(value)
    }
}
