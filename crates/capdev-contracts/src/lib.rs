//! # capdev-contracts
//!
//! Shared value types for the capdev action authorization engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only snapshots, principals, descriptors, and error types.

pub mod action;
pub mod entity;
pub mod error;
pub mod principal;
pub mod verify;

#[cfg(test)]
mod tests {
    use super::*;
    use action::{ActionContext, ActionDescriptor, ActionKey, ActionKind, HttpMethod};
    use entity::{EntitySnapshot, EntityType, Ref, RoleTag, Scalar};
    use error::{ActionError, ErrorClass};
    use principal::Principal;

    // ── Principal ────────────────────────────────────────────────────────────

    #[test]
    fn principal_membership_covers_self_and_organizations() {
        let org = Ref::new();
        let other = Ref::new();
        let principal = Principal::new(Ref::new()).with_organization(org);

        assert!(principal.is_or_belongs_to(principal.id));
        assert!(principal.is_or_belongs_to(org));
        assert!(!principal.is_or_belongs_to(other));
    }

    #[test]
    fn nil_principal_is_unresolved() {
        assert!(!Principal::new(Ref::nil()).is_resolved());
        assert!(Principal::new(Ref::new()).is_resolved());
    }

    // ── EntitySnapshot ───────────────────────────────────────────────────────

    #[test]
    fn snapshot_flag_reads_missing_and_non_bool_as_false() {
        let snapshot = EntitySnapshot::new(EntityType::Offer, Ref::new(), Ref::new())
            .with_field("accepted", Scalar::Bool(true))
            .with_field("note", Scalar::Text("true".to_string()));

        assert!(snapshot.flag("accepted"));
        assert!(!snapshot.flag("note"));
        assert!(!snapshot.flag("missing"));
    }

    #[test]
    fn snapshot_deserializes_from_persistence_json() {
        let id = Ref::new();
        let owner = Ref::new();
        let partner = Ref::new();
        let json = serde_json::json!({
            "entity_type": "Offer",
            "id": id,
            "state": "ACTIVE",
            "owner_ref": owner,
            "related_refs": { "PARTNER": partner },
            "fields": {
                "request_has_accepted_offer": false,
                "amount": 1200,
                "updated_at": "2026-03-01T10:00:00Z",
                "title": "Ocean literacy training"
            }
        });

        let snapshot: EntitySnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.entity_type, EntityType::Offer);
        assert_eq!(snapshot.state.as_deref(), Some("ACTIVE"));
        assert_eq!(snapshot.related(RoleTag::Partner), Some(partner));
        assert_eq!(snapshot.field("amount"), Some(&Scalar::Int(1200)));
        assert!(matches!(snapshot.field("updated_at"), Some(Scalar::Timestamp(_))));
        assert!(matches!(snapshot.field("title"), Some(Scalar::Text(_))));
    }

    // ── Tag parsing ──────────────────────────────────────────────────────────

    #[test]
    fn entity_type_parse_rejects_unknown_names() {
        assert_eq!("Offer".parse::<EntityType>().unwrap(), EntityType::Offer);
        match "Subscription".parse::<EntityType>() {
            Err(ActionError::UnregisteredEntity { entity }) => assert_eq!(entity, "Subscription"),
            other => panic!("expected UnregisteredEntity, got {:?}", other),
        }
    }

    #[test]
    fn action_key_strings_match_serde_names() {
        for key in ActionKey::ALL {
            let json = serde_json::to_value(key).unwrap();
            assert_eq!(json, serde_json::Value::String(key.as_str().to_string()));
            assert_eq!(key.as_str().parse::<ActionKey>().unwrap(), key);
        }
    }

    #[test]
    fn context_parse_is_input_mismatch_on_unknown() {
        assert_eq!("DETAIL".parse::<ActionContext>().unwrap(), ActionContext::Detail);
        let err = "SIDEBAR".parse::<ActionContext>().unwrap_err();
        assert_eq!(err.class(), ErrorClass::InputMismatch);
    }

    #[test]
    fn read_only_keys_are_never_destructive() {
        for key in ActionKey::ALL {
            assert!(!(key.is_read_only() && key.is_destructive()), "{key}");
        }
        assert!(ActionKey::Delete.is_destructive());
        assert!(ActionKey::DownloadDocs.is_read_only());
    }

    // ── ActionDescriptor wire shape ──────────────────────────────────────────

    #[test]
    fn descriptor_serializes_to_camel_case_wire_shape() {
        let descriptor = ActionDescriptor {
            key: ActionKey::RequestClarification,
            label: "Request clarification".to_string(),
            kind: ActionKind::Dialog,
            method: HttpMethod::Post,
            target: "/offers/{id}/clarifications".to_string(),
            requires_confirmation: false,
            confirmation_message: None,
            enabled: true,
            visible: true,
        };

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["key"], "request_clarification");
        assert_eq!(json["kind"], "DIALOG");
        assert_eq!(json["method"], "POST");
        assert_eq!(json["requiresConfirmation"], false);
        assert!(json.get("confirmationMessage").is_none());
    }

    // ── ActionError ──────────────────────────────────────────────────────────

    #[test]
    fn error_classes() {
        let unknown_state = ActionError::UnknownState {
            entity: "Offer".to_string(),
            state: "ARCHIVED".to_string(),
        };
        assert_eq!(unknown_state.class(), ErrorClass::Configuration);
        assert!(unknown_state.is_state_lookup());

        let mismatch = ActionError::EntityTypeMismatch {
            requested: "Offer".to_string(),
            actual: "Request".to_string(),
        };
        assert_eq!(mismatch.class(), ErrorClass::InputMismatch);
        assert!(!mismatch.is_state_lookup());

        assert_eq!(ActionError::UnresolvedPrincipal.class(), ErrorClass::InputMismatch);
    }

    #[test]
    fn error_unknown_state_display() {
        let err = ActionError::UnknownState {
            entity: "Offer".to_string(),
            state: "ARCHIVED".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("unknown state"));
        assert!(msg.contains("ARCHIVED"));
        assert!(msg.contains("Offer"));
    }

    #[test]
    fn error_duplicate_key_display() {
        let err = ActionError::DuplicateKey {
            entity: "Document".to_string(),
            key: "delete".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("duplicate action key"));
        assert!(msg.contains("delete"));
    }
}
