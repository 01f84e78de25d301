//! # Owner Scoping
//!
//! Every firm, vehicle and record query is filtered by the requesting user's id.
//! [`OwnerScope`] is the only way handlers obtain that id, so a repository call
//! without an owner predicate cannot be expressed.

use serde::Serialize;

use crate::error::{ApiError, validation_error};

/// Resolved identity of the user a request acts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OwnerScope(i32);

impl OwnerScope {
    /// Resolve the owner id carried by a request (query string or JSON body).
    ///
    /// Missing, non-positive or out-of-range ids are a validation failure.
    pub fn resolve(owner_id: Option<i64>) -> Result<Self, ApiError> {
        let Some(raw) = owner_id else {
            return Err(validation_error(
                "ownerId is required",
                serde_json::json!({ "ownerId": "required" }),
            ));
        };

        match i32::try_from(raw) {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(validation_error(
                "ownerId must be a positive integer",
                serde_json::json!({ "ownerId": "invalid" }),
            )),
        }
    }

    /// Scope for an owner id already known to be valid (freshly created users, tests).
    pub fn for_user(user_id: i32) -> Self {
        Self(user_id)
    }

    pub fn id(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
