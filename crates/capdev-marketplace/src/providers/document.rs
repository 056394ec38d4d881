use capdev_contracts::{
    action::{ActionContext, ActionDescriptor, ActionKey, HttpMethod},
    entity::{EntitySnapshot, EntityType},
    error::{ActionError, ActionResult},
    principal::Principal,
};
use capdev_core::{traits::ActionProvider, ActionCatalog, ActionSpec};

use super::EVERYWHERE;
use crate::facts::{Fact, MarketplaceEvaluator};

/// Actions on an uploaded document.
///
/// Documents have no lifecycle: every catalog key is always a candidate and
/// only permission facts and context decide. A snapshot carrying a state tag
/// is `UnknownState`.
///
/// `owner_ref` is the owning organization or uploading user;
/// `related_refs[PARTNER]` is a partner the document is shared with.
pub struct DocumentProvider {
    catalog: ActionCatalog<Fact>,
    evaluator: MarketplaceEvaluator,
}

impl DocumentProvider {
    pub fn new() -> ActionResult<Self> {
        use ActionContext::*;

        let catalog = ActionCatalog::new(
            EntityType::Document,
            vec![
                ActionSpec::navigate(
                    ActionKey::View,
                    "View document",
                    "/documents/{id}",
                    Fact::CanViewDocument,
                )
                .in_contexts(EVERYWHERE),
                ActionSpec::navigate(
                    ActionKey::Download,
                    "Download",
                    "/documents/{id}/download",
                    Fact::CanViewDocument,
                )
                .in_contexts(EVERYWHERE),
                ActionSpec::mutate(
                    ActionKey::Delete,
                    "Delete document",
                    HttpMethod::Delete,
                    "/documents/{id}",
                    Fact::CanDeleteDocument,
                )
                .in_contexts(&[Detail, Admin, User])
                .confirm("Delete this document? It will be removed from every offer it is attached to."),
            ],
        )?;

        Ok(Self {
            catalog,
            evaluator: MarketplaceEvaluator,
        })
    }
}

impl ActionProvider for DocumentProvider {
    fn entity_type(&self) -> EntityType {
        EntityType::Document
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
        if let Some(state) = &snapshot.state {
            return Err(ActionError::UnknownState {
                entity: EntityType::Document.to_string(),
                state: state.clone(),
            });
        }
        self.catalog.assemble(
            &self.catalog.keys(),
            &self.evaluator,
            principal,
            snapshot,
            context,
        )
    }
}

#[cfg(test)]
mod tests {
    use capdev_contracts::entity::{Ref, RoleTag};

    use super::*;

    #[test]
    fn test_owner_gets_full_static_set() {
        let provider = DocumentProvider::new().unwrap();
        let org = Ref::new();
        let snapshot = EntitySnapshot::new(EntityType::Document, Ref::new(), org);
        let owner = Principal::new(Ref::new()).with_organization(org);

        let actions = provider.provide(&snapshot, &owner, ActionContext::Detail).unwrap();
        let keys: Vec<ActionKey> = actions.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![ActionKey::View, ActionKey::Download, ActionKey::Delete]);
    }

    #[test]
    fn test_shared_partner_reads_but_cannot_delete() {
        let provider = DocumentProvider::new().unwrap();
        let partner_org = Ref::new();
        let snapshot = EntitySnapshot::new(EntityType::Document, Ref::new(), Ref::new())
            .with_related(RoleTag::Partner, partner_org);
        let partner = Principal::new(Ref::new()).with_organization(partner_org);

        let actions = provider.provide(&snapshot, &partner, ActionContext::Detail).unwrap();
        let keys: Vec<ActionKey> = actions.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![ActionKey::View, ActionKey::Download]);
    }

    #[test]
    fn test_stranger_gets_nothing() {
        let provider = DocumentProvider::new().unwrap();
        let snapshot = EntitySnapshot::new(EntityType::Document, Ref::new(), Ref::new());
        let stranger = Principal::new(Ref::new()).with_role(RoleTag::Viewer);

        let actions = provider.provide(&snapshot, &stranger, ActionContext::List).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_state_tag_is_unknown_state() {
        let provider = DocumentProvider::new().unwrap();
        let org = Ref::new();
        let snapshot =
            EntitySnapshot::new(EntityType::Document, Ref::new(), org).with_state("ARCHIVED");
        let owner = Principal::new(Ref::new()).with_organization(org);

        match provider.provide(&snapshot, &owner, ActionContext::Detail) {
            Err(ActionError::UnknownState { entity, state }) => {
                assert_eq!(entity, "Document");
                assert_eq!(state, "ARCHIVED");
            }
            other => panic!("expected UnknownState, got {:?}", other),
        }
    }
}
