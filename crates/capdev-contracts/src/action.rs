//! Action descriptors and the closed tag sets they are built from.
//!
//! A descriptor is pure data: it never references the principal or the
//! snapshot it was computed from, so it can be serialized across a process
//! boundary as is. The serialized shape is the wire contract consumed by
//! remote renderers:
//!
//! ```json
//! { "key": "accept", "label": "Accept offer", "kind": "MUTATE", "method": "POST",
//!   "target": "/offers/{id}/accept", "requiresConfirmation": false,
//!   "enabled": true, "visible": true }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// The UI surface requesting actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionContext {
    List,
    Detail,
    Admin,
    User,
}

impl ActionContext {
    pub const ALL: [ActionContext; 4] = [
        ActionContext::List,
        ActionContext::Detail,
        ActionContext::Admin,
        ActionContext::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionContext::List => "LIST",
            ActionContext::Detail => "DETAIL",
            ActionContext::Admin => "ADMIN",
            ActionContext::User => "USER",
        }
    }
}

impl fmt::Display for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionContext {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionContext::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ActionError::UnknownContext {
                context: s.to_string(),
            })
    }
}

/// Every action key known to any entity type.
///
/// Keys serialize as snake_case strings (`"request_clarification"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    View,
    Edit,
    Submit,
    Approve,
    Accept,
    Reject,
    RequestClarification,
    ExpressInterest,
    ViewOffers,
    Close,
    Enable,
    Disable,
    Download,
    DownloadDocs,
    ChangePassword,
    ResendVerification,
    Delete,
}

impl ActionKey {
    pub const ALL: [ActionKey; 17] = [
        ActionKey::View,
        ActionKey::Edit,
        ActionKey::Submit,
        ActionKey::Approve,
        ActionKey::Accept,
        ActionKey::Reject,
        ActionKey::RequestClarification,
        ActionKey::ExpressInterest,
        ActionKey::ViewOffers,
        ActionKey::Close,
        ActionKey::Enable,
        ActionKey::Disable,
        ActionKey::Download,
        ActionKey::DownloadDocs,
        ActionKey::ChangePassword,
        ActionKey::ResendVerification,
        ActionKey::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKey::View => "view",
            ActionKey::Edit => "edit",
            ActionKey::Submit => "submit",
            ActionKey::Approve => "approve",
            ActionKey::Accept => "accept",
            ActionKey::Reject => "reject",
            ActionKey::RequestClarification => "request_clarification",
            ActionKey::ExpressInterest => "express_interest",
            ActionKey::ViewOffers => "view_offers",
            ActionKey::Close => "close",
            ActionKey::Enable => "enable",
            ActionKey::Disable => "disable",
            ActionKey::Download => "download",
            ActionKey::DownloadDocs => "download_docs",
            ActionKey::ChangePassword => "change_password",
            ActionKey::ResendVerification => "resend_verification",
            ActionKey::Delete => "delete",
        }
    }

    /// Keys that never change entity state. The only keys a terminal
    /// lifecycle state may expose.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            ActionKey::View | ActionKey::ViewOffers | ActionKey::Download | ActionKey::DownloadDocs
        )
    }

    /// Destructive or irreversible keys. Every descriptor carrying one of
    /// these must require confirmation.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            ActionKey::Delete | ActionKey::Reject | ActionKey::Disable | ActionKey::Close
        )
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKey {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ActionError::UnknownActionKey { key: s.to_string() })
    }
}

/// How a renderer invokes an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Follow a link to `target`.
    Navigate,
    /// Send a request to `target` directly.
    Mutate,
    /// Open a dialog whose form submits to `target`.
    Dialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

/// One potentially-available action and its invocation metadata.
///
/// Renderers must treat `enabled: false` and `visible: false` as
/// authoritative and never invoke the target of such an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    /// Unique within one result.
    pub key: ActionKey,
    pub label: String,
    pub kind: ActionKind,
    pub method: HttpMethod,
    /// Route template, opaque to the engine.
    pub target: String,
    pub requires_confirmation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_message: Option<String>,
    pub enabled: bool,
    pub visible: bool,
}
