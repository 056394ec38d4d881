//! Engine assembly for the marketplace.

use std::path::Path;

use tracing::info;

use capdev_contracts::error::ActionResult;
use capdev_core::ActionEngine;
use capdev_policy::TomlAllowList;

use crate::providers::{DocumentProvider, OfferProvider, RequestProvider, UserProvider};

/// The allow-list policy shipped with the marketplace.
pub const MARKETPLACE_POLICY: &str = include_str!("../policies/marketplace.toml");

/// Build an engine with every marketplace provider registered against
/// `policy`.
///
/// Fails if any provider's catalog or transition table is inconsistent, or
/// if an entity type ends up without a provider.
pub fn marketplace_engine(policy: TomlAllowList) -> ActionResult<ActionEngine> {
    let mode = policy.mode();
    let mut engine = ActionEngine::new(Box::new(policy), mode);

    engine.register(Box::new(RequestProvider::new()?))?;
    engine.register(Box::new(OfferProvider::new()?))?;
    engine.register(Box::new(DocumentProvider::new()?))?;
    engine.register(Box::new(UserProvider::new()?))?;
    engine.ensure_complete()?;

    info!(mode = ?mode, "marketplace action engine ready");
    Ok(engine)
}

/// Build an engine from the shipped policy.
pub fn default_engine() -> ActionResult<ActionEngine> {
    marketplace_engine(TomlAllowList::from_toml_str(MARKETPLACE_POLICY)?)
}

/// Build an engine from a policy file on disk.
pub fn engine_from_file(path: &Path) -> ActionResult<ActionEngine> {
    marketplace_engine(TomlAllowList::from_file(path)?)
}
