use super::events::{UserCreated, UserEvent};
use async_trait::async_trait;
use outbox_domain::eventing::TypedEventHandler;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// 用户目录读模型中的一条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub name: String,
}

impl From<&UserCreated> for UserSummary {
    fn from(event: &UserCreated) -> Self {
        Self {
            user_id: event.user_id.clone(),
            email: event.email.clone(),
            username: event.username.clone(),
            name: event.name.clone(),
        }
    }
}

/// 用户目录（读模型），按用户 ID 覆盖写入，重复投递不会产生重复记录
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    entries: Arc<RwLock<HashMap<String, UserSummary>>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入记录，返回是否为新用户
    pub async fn upsert(&self, summary: UserSummary) -> bool {
        self.entries
            .write()
            .await
            .insert(summary.user_id.clone(), summary)
            .is_none()
    }

    pub async fn get(&self, user_id: &str) -> Option<UserSummary> {
        self.entries.read().await.get(user_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// 按用户名排序的全部记录
    pub async fn all(&self) -> Vec<UserSummary> {
        let mut all: Vec<UserSummary> = self.entries.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        all
    }
}

/// 处理 `UserCreatedEvent`：记录日志并投影到用户目录
#[derive(Debug, Clone)]
pub struct UserCreatedHandler {
    directory: UserDirectory,
}

impl UserCreatedHandler {
    pub fn new(directory: UserDirectory) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl TypedEventHandler<UserEvent> for UserCreatedHandler {
    fn handler_name(&self) -> &str {
        "user-created"
    }

    async fn handle(&self, event: UserEvent) -> anyhow::Result<()> {
        match event {
            UserEvent::Created(created) => {
                info!(
                    user_id = %created.user_id,
                    email = %created.email,
                    username = %created.username,
                    "user created"
                );
                let fresh = self.directory.upsert(UserSummary::from(&created)).await;
                if !fresh {
                    info!(user_id = %created.user_id, "duplicate delivery, directory entry refreshed");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_delivery_is_idempotent() {
        let directory = UserDirectory::new();
        let handler = UserCreatedHandler::new(directory.clone());
        let event = UserEvent::Created(UserCreated::new("u-1", "ada@example.com", "ada", "Ada"));

        handler.handle(event.clone()).await.unwrap();
        handler.handle(event).await.unwrap();

        assert_eq!(directory.len().await, 1);
        assert_eq!(
            directory.get("u-1").await,
            Some(UserSummary {
                user_id: "u-1".into(),
                email: "ada@example.com".into(),
                username: "ada".into(),
                name: "Ada".into(),
            })
        );
    }

    #[tokio::test]
    async fn listing_is_sorted_by_username() {
        let directory = UserDirectory::new();
        let handler = UserCreatedHandler::new(directory.clone());
        for (id, username) in [("u-1", "zoe"), ("u-2", "ada"), ("u-3", "max")] {
            let created = UserCreated::new(id, format!("{username}@example.com"), username, username);
            handler.handle(UserEvent::Created(created)).await.unwrap();
        }

        let names: Vec<String> = directory.all().await.into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["ada", "max", "zoe"]);
    }
}
