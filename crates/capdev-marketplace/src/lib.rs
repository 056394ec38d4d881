//! # capdev-marketplace
//!
//! The marketplace domain for the capdev action engine.
//!
//! Provides one action provider for each entity type of the
//! capacity-development marketplace:
//!
//! 1. **Request**: a capacity-development request moving from draft through
//!    review to matching and closure.
//! 2. **Offer**: a partner's offer against a request, accepted, rejected,
//!    or questioned by the requester and moderated by administrators.
//! 3. **Document**: a stateless attachment with a fixed view/download/delete
//!    set.
//! 4. **User**: a platform account with self-service and admin actions.
//!
//! Permission facts live in [`facts`], lifecycle enums and status labels in
//! [`state`], and [`wiring::default_engine`] assembles a ready engine from
//! the shipped policy.

pub mod facts;
pub mod providers;
pub mod state;
pub mod wiring;

pub use facts::{Fact, MarketplaceEvaluator};
pub use wiring::{default_engine, engine_from_file, marketplace_engine, MARKETPLACE_POLICY};
