//! # capdev-core
//!
//! The action authorization engine.
//!
//! This crate provides:
//! - The three seams (`PermissionEvaluator`, `ActionProvider`, `AllowList`)
//! - `TransitionTable` and `ActionCatalog`, the building blocks providers
//!   are declared with
//! - The `ActionEngine` facade that resolves providers, enforces key
//!   invariants, applies the deny-by-default pass, and orders results
//!
//! ## Usage
//!
//! ```rust,ignore
//! use capdev_core::{ActionEngine, EngineMode};
//!
//! let mut engine = ActionEngine::new(allow_list, EngineMode::Strict);
//! engine.register(Box::new(offer_provider))?;
//! let actions = engine.compute_actions(EntityType::Offer, &snapshot, &principal, ActionContext::Detail)?;
//! ```

pub mod catalog;
pub mod engine;
pub mod legacy;
mod registry;
pub mod traits;
pub mod transition;

pub use catalog::{ActionCatalog, ActionSpec};
pub use engine::{ActionEngine, EngineMode};
#[allow(deprecated)]
pub use legacy::legacy_flags;
pub use transition::TransitionTable;
