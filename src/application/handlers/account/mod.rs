//! Account handlers - admin moderation.

use std::sync::Arc;

use crate::domain::account::{Moderation, User};
use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, UserId};
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct ModerateUserCommand {
    pub actor: AuthenticatedUser,
    pub target: UserId,
    pub action: Moderation,
}

pub struct ModerateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl ModerateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: ModerateUserCommand) -> Result<User, DomainError> {
        let mut user = self.users.find_by_id(&cmd.target).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", cmd.target))
        })?;

        cmd.action.apply(&cmd.actor, &mut user)?;
        self.users.update(&user).await?;

        tracing::info!(
            actor_id = %cmd.actor.id,
            user_id = %user.id,
            action = ?cmd.action,
            "User moderated"
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::Role;

    async fn setup() -> (InMemoryStore, AuthenticatedUser, User) {
        let store = InMemoryStore::new();
        let admin = User::new("admin@example.com", None, Role::Admin);
        let reader = User::new("reader@example.com", None, Role::User);
        store.save(&admin).await.unwrap();
        store.save(&reader).await.unwrap();
        (store, admin.to_authenticated(), reader)
    }

    #[tokio::test]
    async fn ban_is_persisted() {
        let (store, admin, reader) = setup().await;
        ModerateUserHandler::new(Arc::new(store.clone()))
            .handle(ModerateUserCommand {
                actor: admin,
                target: reader.id,
                action: Moderation::Ban,
            })
            .await
            .unwrap();

        let stored = store.find_by_id(&reader.id).await.unwrap().unwrap();
        assert!(stored.banned);
    }

    #[tokio::test]
    async fn self_ban_is_forbidden() {
        let (store, admin, _) = setup().await;
        let err = ModerateUserHandler::new(Arc::new(store.clone()))
            .handle(ModerateUserCommand {
                target: admin.id,
                actor: admin,
                action: Moderation::Ban,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (store, admin, _) = setup().await;
        let err = ModerateUserHandler::new(Arc::new(store))
            .handle(ModerateUserCommand {
                actor: admin,
                target: UserId::new(),
                action: Moderation::SetRole(Role::Admin),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}
