//! # capdev-verify
//!
//! Wire-contract verification for action descriptor lists.
//!
//! This crate provides [`engine::ContractVerifier`]. Transport collaborators
//! run it on the engine's output before handing the list to a remote
//! renderer. Verification runs in two phases:
//!
//! 1. **Structural**: JSON Schema validation of the serialized list via the
//!    `jsonschema` crate.
//! 2. **Semantic**: unique keys, `enabled` implies `visible`, confirmation
//!    flags agree with their messages, destructive keys require confirmation.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use capdev_verify::engine::ContractVerifier;
//!
//! let verifier = ContractVerifier::new()?;
//! let wire = verifier.ensure(&actions)?;
//! println!("{}", serde_json::to_string_pretty(&wire)?);
//! ```

pub mod engine;
