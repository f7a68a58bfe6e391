//! Account domain - registered users and moderation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, Role, Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub banned: bool,
    pub created_at: Timestamp,
}

impl User {
    pub fn new(email: impl Into<String>, name: Option<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            name,
            role,
            banned: false,
            created_at: Timestamp::now(),
        }
    }

    /// Identity attached to requests once the account has been checked.
    pub fn to_authenticated(&self) -> AuthenticatedUser {
        AuthenticatedUser::new(self.id, self.email.clone(), self.name.clone(), self.role)
    }
}

/// A moderation action taken by an admin on an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moderation {
    Ban,
    Unban,
    SetRole(Role),
}

impl Moderation {
    /// Applies the action. Admins cannot ban or demote themselves.
    pub fn apply(self, actor: &AuthenticatedUser, target: &mut User) -> Result<(), DomainError> {
        if actor.id == target.id && matches!(self, Moderation::Ban | Moderation::SetRole(Role::User)) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Admins cannot ban or demote themselves",
            ));
        }
        match self {
            Moderation::Ban => target.banned = true,
            Moderation::Unban => target.banned = false,
            Moderation::SetRole(role) => target.role = role,
        }
        Ok(())
    }
}
