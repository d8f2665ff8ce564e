use super::InMemoryDatabase;
use crate::error::DomainResult as Result;
use crate::outbox::{OutboxMessage, OutboxStore};
use async_trait::async_trait;
use chrono::Utc;

/// 自动提交的内存 Outbox 存储：每次调用立即作用于已提交数据
///
/// 跟踪失败次数与死信状态，可配合处理器的死信策略使用。
#[derive(Debug, Clone)]
pub struct InMemoryOutboxStore {
    db: InMemoryDatabase,
}

impl InMemoryOutboxStore {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OutboxStore for InMemoryOutboxStore {
    async fn append(&self, message: OutboxMessage) -> Result<()> {
        self.db.tables().write().await.append(message)
    }

    async fn get_unprocessed(&self, limit: usize) -> Result<Vec<OutboxMessage>> {
        Ok(self.db.tables().read().await.unprocessed(limit))
    }

    async fn mark_processed(&self, id: &str) -> Result<()> {
        self.db
            .tables()
            .write()
            .await
            .message_mut(id)?
            .mark_processed(Utc::now());
        Ok(())
    }

    async fn mark_failed(&self, id: &str, error: &str) -> Result<()> {
        self.db.tables().write().await.message_mut(id)?.mark_failed(error);
        Ok(())
    }

    async fn increment_attempts(&self, id: &str) -> Result<Option<u32>> {
        let attempts = self
            .db
            .tables()
            .write()
            .await
            .message_mut(id)?
            .increment_attempts();
        Ok(Some(attempts))
    }

    async fn mark_dead_lettered(&self, id: &str, error: &str) -> Result<()> {
        self.db
            .tables()
            .write()
            .await
            .message_mut(id)?
            .mark_dead_lettered(Utc::now(), error);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    fn message(id: &str) -> OutboxMessage {
        OutboxMessage::builder()
            .id(id)
            .aggregate_id("u-1")
            .aggregate_type("User")
            .event_type("UserCreatedEvent")
            .payload("{}")
            .build()
    }

    #[tokio::test]
    async fn mark_processed_is_idempotent() {
        let db = InMemoryDatabase::new();
        let store = db.outbox_store();
        store.append(message("m-1")).await.unwrap();

        store.mark_processed("m-1").await.unwrap();
        let first = db.find_message("m-1").await.unwrap().processed_at();
        store.mark_processed("m-1").await.unwrap();

        assert!(first.is_some());
        assert_eq!(db.find_message("m-1").await.unwrap().processed_at(), first);
        assert!(store.get_unprocessed(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failures_keep_message_pending_with_latest_error() {
        let db = InMemoryDatabase::new();
        let store = db.outbox_store();
        store.append(message("m-1")).await.unwrap();

        store.mark_failed("m-1", "first").await.unwrap();
        store.mark_failed("m-1", "second").await.unwrap();

        let pending = store.get_unprocessed(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].error(), Some("second"));

        // 成功后错误信息保留
        store.mark_processed("m-1").await.unwrap();
        let done = db.find_message("m-1").await.unwrap();
        assert!(done.is_processed());
        assert_eq!(done.error(), Some("second"));
    }

    #[tokio::test]
    async fn unknown_ids_are_reported() {
        let store = InMemoryDatabase::new().outbox_store();
        assert!(matches!(
            store.mark_processed("nope").await.unwrap_err(),
            DomainError::MessageNotFound { .. }
        ));
        assert!(matches!(
            store.mark_failed("nope", "x").await.unwrap_err(),
            DomainError::MessageNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn dead_lettered_messages_leave_the_pending_set() {
        let db = InMemoryDatabase::new();
        let store = db.outbox_store();
        store.append(message("m-1")).await.unwrap();
        store.append(message("m-2")).await.unwrap();

        assert_eq!(store.increment_attempts("m-1").await.unwrap(), Some(1));
        assert_eq!(store.increment_attempts("m-1").await.unwrap(), Some(2));
        store.mark_dead_lettered("m-1", "gave up").await.unwrap();

        let pending = store.get_unprocessed(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), "m-2");

        let dead = db.find_message("m-1").await.unwrap();
        assert!(dead.is_dead_lettered());
        assert_eq!(dead.attempts(), 2);
        assert_eq!(dead.error(), Some("gave up"));
    }
}
