//! # capdev-policy
//!
//! TOML-driven, deny-by-default context allow-lists for the capdev action
//! engine.
//!
//! ## Overview
//!
//! This crate provides [`TomlAllowList`], which implements the
//! [`AllowList`](capdev_core::traits::AllowList) trait. The policy file
//! names, for each (entity type, context) pair, the action keys the engine
//! may return. Anything not named is stripped by the engine's final pass.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use capdev_policy::TomlAllowList;
//!
//! let policy = TomlAllowList::from_file(Path::new("policies/marketplace.toml"))?;
//! // Pass `Box::new(policy)` to `capdev_core::ActionEngine::new(...)`.
//! ```

pub mod allow_list;
pub mod rule;

pub use allow_list::TomlAllowList;
pub use rule::{AllowRule, EngineSettings, PolicyConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
