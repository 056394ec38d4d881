//! Entity type → provider registry.

use std::collections::HashMap;

use capdev_contracts::{
    entity::EntityType,
    error::{ActionError, ActionResult},
};

use crate::traits::ActionProvider;

/// Maps each entity type to exactly one provider.
///
/// Resolving an unregistered type is a configuration error; there is no
/// fallback provider.
#[derive(Default)]
pub(crate) struct ActionRegistry {
    providers: HashMap<EntityType, Box<dyn ActionProvider>>,
}

impl ActionRegistry {
    pub(crate) fn register(&mut self, provider: Box<dyn ActionProvider>) -> ActionResult<()> {
        let entity = provider.entity_type();
        if self.providers.contains_key(&entity) {
            return Err(ActionError::DuplicateProvider {
                entity: entity.to_string(),
            });
        }
        self.providers.insert(entity, provider);
        Ok(())
    }

    pub(crate) fn resolve(&self, entity: EntityType) -> ActionResult<&dyn ActionProvider> {
        self.providers
            .get(&entity)
            .map(|p| p.as_ref())
            .ok_or_else(|| ActionError::UnregisteredEntity {
                entity: entity.to_string(),
            })
    }

    pub(crate) fn registered(&self) -> impl Iterator<Item = EntityType> + '_ {
        self.providers.keys().copied()
    }
}
