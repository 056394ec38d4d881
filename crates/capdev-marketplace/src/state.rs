//! Closed lifecycle state sets and their display labels.
//!
//! Persistence stores states as upper-case tags (`"CLARIFICATION_REQUESTED"`).
//! Each enum parses exactly its own tags; anything else is an unknown state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use capdev_contracts::{entity::EntityType, error::ActionError};

macro_rules! lifecycle {
    (
        $(#[$meta:meta])*
        $name:ident for $entity:path {
            $($variant:ident => ($tag:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The persisted tag.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }

            /// Human-readable status label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ActionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    _ => Err(ActionError::UnknownState {
                        entity: $entity.to_string(),
                        state: s.to_string(),
                    }),
                }
            }
        }
    };
}

lifecycle! {
    /// Lifecycle of an offer made against a request.
    OfferState for EntityType::Offer {
        Active => ("ACTIVE", "Active"),
        Inactive => ("INACTIVE", "Inactive"),
        ClarificationRequested => ("CLARIFICATION_REQUESTED", "Clarification requested"),
        Accepted => ("ACCEPTED", "Accepted"),
        Rejected => ("REJECTED", "Rejected"),
    }
}

lifecycle! {
    /// Lifecycle of a capacity-development request.
    RequestState for EntityType::Request {
        Draft => ("DRAFT", "Draft"),
        UnderReview => ("UNDER_REVIEW", "Under review"),
        Validated => ("VALIDATED", "Open for offers"),
        Matched => ("MATCHED", "Matched"),
        Closed => ("CLOSED", "Closed"),
        Rejected => ("REJECTED", "Returned to requester"),
    }
}

lifecycle! {
    /// Account status of a platform user.
    UserState for EntityType::User {
        Active => ("ACTIVE", "Active"),
        Disabled => ("DISABLED", "Disabled"),
        PendingVerification => ("PENDING_VERIFICATION", "Pending verification"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for state in OfferState::ALL {
            assert_eq!(state.as_str().parse::<OfferState>().unwrap(), *state);
        }
        for state in RequestState::ALL {
            assert_eq!(state.as_str().parse::<RequestState>().unwrap(), *state);
        }
        for state in UserState::ALL {
            assert_eq!(state.as_str().parse::<UserState>().unwrap(), *state);
        }
    }

    #[test]
    fn test_unknown_tag_names_entity() {
        match "ARCHIVED".parse::<OfferState>() {
            Err(ActionError::UnknownState { entity, state }) => {
                assert_eq!(entity, "Offer");
                assert_eq!(state, "ARCHIVED");
            }
            other => panic!("expected UnknownState, got {:?}", other),
        }
        // Tags are case-sensitive.
        assert!("active".parse::<UserState>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(OfferState::ClarificationRequested.label(), "Clarification requested");
        assert_eq!(RequestState::Validated.label(), "Open for offers");
        assert_eq!(UserState::PendingVerification.label(), "Pending verification");
    }

    #[test]
    fn test_serde_uses_persisted_tags() {
        let json = serde_json::to_value(OfferState::ClarificationRequested).unwrap();
        assert_eq!(json, "CLARIFICATION_REQUESTED");
    }
}
