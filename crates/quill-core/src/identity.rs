//! Caller identity for Quill requests.
//!
//! Requests are either made by an authenticated user (resolved from a bearer
//! token) or anonymously. Anonymous callers can browse published content;
//! anything that writes requires a [`UserCaller`] with the right role.

use crate::id::AuthorId;
use serde::{Deserialize, Serialize};

/// A role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May create stories and manage their own.
    Author,
    /// May manage any story.
    Admin,
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCaller {
    /// Stable user identifier (also the author id on owned stories).
    pub user_id: AuthorId,
    /// Display name for projections and logs.
    pub display_name: String,
    /// Granted roles.
    pub roles: Vec<Role>,
}

/// The caller of a request.
///
/// # Example
///
/// ```
/// use quill_core::{Caller, Role};
///
/// let caller = Caller::user("u-1", "Alice", vec![Role::Author]);
/// assert!(caller.has_role(Role::Author));
/// assert_eq!(caller.log_id(), "user:u-1");
///
/// let anon = Caller::anonymous();
/// assert_eq!(anon.log_id(), "anonymous");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Caller {
    /// An authenticated user.
    User(UserCaller),
    /// An unauthenticated caller.
    Anonymous,
}

impl Caller {
    /// Creates a user caller.
    #[must_use]
    pub fn user(
        user_id: impl Into<AuthorId>,
        display_name: impl Into<String>,
        roles: Vec<Role>,
    ) -> Self {
        Self::User(UserCaller {
            user_id: user_id.into(),
            display_name: display_name.into(),
            roles,
        })
    }

    /// Creates an anonymous caller.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Returns the user, if authenticated.
    #[must_use]
    pub const fn as_user(&self) -> Option<&UserCaller> {
        match self {
            Self::User(u) => Some(u),
            Self::Anonymous => None,
        }
    }

    /// Returns the user id, if authenticated.
    #[must_use]
    pub fn user_id(&self) -> Option<&AuthorId> {
        self.as_user().map(|u| &u.user_id)
    }

    /// Returns `true` if the caller holds the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.as_user().is_some_and(|u| u.roles.contains(&role))
    }

    /// Returns `true` if the caller is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Returns `true` if the caller is the given author or an admin.
    #[must_use]
    pub fn owns_or_admin(&self, author: &AuthorId) -> bool {
        self.is_admin() || self.user_id() == Some(author)
    }

    /// Returns a string identifier suitable for logging.
    ///
    /// Never includes tokens or other sensitive material.
    #[must_use]
    pub fn log_id(&self) -> String {
        match self {
            Self::User(u) => format!("user:{}", u.user_id),
            Self::Anonymous => "anonymous".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_log_id() {
        let caller = Caller::user("user-123", "Alice", vec![Role::Author]);
        assert_eq!(caller.log_id(), "user:user-123");
    }

    #[test]
    fn test_anonymous_log_id() {
        assert_eq!(Caller::anonymous().log_id(), "anonymous");
    }

    #[test]
    fn test_roles() {
        let caller = Caller::user("u1", "Alice", vec![Role::Author]);
        assert!(caller.has_role(Role::Author));
        assert!(!caller.has_role(Role::Admin));
        assert!(!caller.is_admin());
    }

    #[test]
    fn test_anonymous_has_no_roles() {
        let caller = Caller::anonymous();
        assert!(!caller.has_role(Role::Author));
        assert!(caller.user_id().is_none());
    }

    #[test]
    fn test_owns_or_admin() {
        let alice = AuthorId::from("alice");
        let owner = Caller::user("alice", "Alice", vec![Role::Author]);
        let other = Caller::user("bob", "Bob", vec![Role::Author]);
        let admin = Caller::user("root", "Root", vec![Role::Admin]);

        assert!(owner.owns_or_admin(&alice));
        assert!(!other.owns_or_admin(&alice));
        assert!(admin.owns_or_admin(&alice));
        assert!(!Caller::anonymous().owns_or_admin(&alice));
    }

    #[test]
    fn test_serialization() {
        let caller = Caller::user("u1", "Alice", vec![Role::Author, Role::Admin]);
        let json = serde_json::to_string(&caller).expect("serialization should work");
        assert!(json.contains("\"type\":\"user\""));
        assert!(json.contains("\"user_id\":\"u1\""));

        let parsed: Caller = serde_json::from_str(&json).expect("deserialization should work");
        assert_eq!(caller, parsed);
    }
}
