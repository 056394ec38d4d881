//! One `ActionProvider` per marketplace entity type.
//!
//! Each provider declares its action catalog (menu order, contexts, facts,
//! confirmation prompts) and, for entities with a lifecycle, its transition
//! table. Both are validated when the provider is built.

mod document;
mod offer;
mod request;
mod user;

pub use document::DocumentProvider;
pub use offer::OfferProvider;
pub use request::RequestProvider;
pub use user::UserProvider;

use capdev_contracts::action::ActionContext;

pub(crate) const EVERYWHERE: &[ActionContext] = &[
    ActionContext::List,
    ActionContext::Detail,
    ActionContext::Admin,
    ActionContext::User,
];
