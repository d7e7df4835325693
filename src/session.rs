//! Session identity
//!
//! The signed-in user is passed explicitly to every operation that needs it
//! instead of being read from ambient storage. How the identity was obtained
//! (sign-in, settings file) is not this module's concern.

use crate::message::UNKNOWN_SENDER;
use serde::{Deserialize, Serialize};

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend user id
    pub user_id: String,
    /// Display name attached to optimistic messages
    pub user_name: Option<String>,
}

impl Identity {
    /// Create an identity
    pub fn new(user_id: impl Into<String>, user_name: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name,
        }
    }

    /// Display name, falling back to a generic label
    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_SENDER)
    }
}

/// Session context handed to the chat and summary operations
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// Session with a signed-in user
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Session without a user
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a session from optional settings values
    ///
    /// A blank user id counts as no user.
    pub fn from_parts(user_id: Option<&str>, user_name: Option<&str>) -> Self {
        let identity = user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Identity::new(id, user_name.map(str::to_string)));
        Self { identity }
    }

    /// Resolve the signed-in user, if any
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Resolve the signed-in user id, if any
    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.user_id.as_str())
    }

    /// Check whether the given sender id is the signed-in user
    pub fn is_own(&self, sender_id: &str) -> bool {
        self.user_id() == Some(sender_id)
    }
}
