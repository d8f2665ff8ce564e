use super::{OutboxMessage, OutboxStore};
use crate::domain_event::DomainEvent;
use crate::error::DomainResult as Result;

/// 单批次默认拉取条数
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Outbox 服务：在 `DomainEvent` 与 `OutboxMessage` 之间转换，并提供待处理消息的访问
#[derive(Debug, Clone)]
pub struct OutboxService<S> {
    store: S,
}

impl<S> OutboxService<S>
where
    S: OutboxStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 序列化事件并追加为新消息；`event_type` 取自事件名称。
    /// 应在调用方的活动事务内执行。
    pub async fn add_message<E>(
        &self,
        event: &E,
        aggregate_id: &str,
        aggregate_type: &str,
    ) -> Result<()>
    where
        E: DomainEvent,
    {
        let payload = serde_json::to_string(event)?;
        let message = OutboxMessage::builder()
            .aggregate_id(aggregate_id)
            .aggregate_type(aggregate_type)
            .event_type(event.event_name())
            .payload(payload)
            .build();

        self.store.append(message).await
    }

    /// 拉取未处理消息，`limit` 缺省为 [`DEFAULT_BATCH_SIZE`]
    pub async fn get_unprocessed_messages(&self, limit: Option<usize>) -> Result<Vec<OutboxMessage>> {
        self.store
            .get_unprocessed(limit.unwrap_or(DEFAULT_BATCH_SIZE))
            .await
    }

    pub async fn mark_as_processed(&self, id: &str) -> Result<()> {
        self.store.mark_processed(id).await
    }

    pub async fn mark_as_failed(&self, id: &str, error: &str) -> Result<()> {
        self.store.mark_failed(id, error).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::{EventMetadata, ReceivedEvent};
    use async_trait::async_trait;
    use serde::Serialize;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct OrderPlaced {
        #[serde(flatten)]
        metadata: EventMetadata,
        order_id: String,
        amount: i64,
    }

    impl DomainEvent for OrderPlaced {
        fn metadata(&self) -> &EventMetadata {
            &self.metadata
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        appended: Mutex<Vec<OutboxMessage>>,
        limits: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl OutboxStore for RecordingStore {
        async fn append(&self, message: OutboxMessage) -> Result<()> {
            self.appended.lock().unwrap().push(message);
            Ok(())
        }
        async fn get_unprocessed(&self, limit: usize) -> Result<Vec<OutboxMessage>> {
            self.limits.lock().unwrap().push(limit);
            Ok(vec![])
        }
        async fn mark_processed(&self, _id: &str) -> Result<()> {
            Ok(())
        }
        async fn mark_failed(&self, _id: &str, _error: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn add_message_serializes_event_with_metadata() {
        let service = OutboxService::new(RecordingStore::default());
        let event = OrderPlaced {
            metadata: EventMetadata::new("OrderPlaced"),
            order_id: "o-1".into(),
            amount: 42,
        };

        service.add_message(&event, "o-1", "Order").await.unwrap();

        let appended = service.store().appended.lock().unwrap().clone();
        assert_eq!(appended.len(), 1);
        let message = &appended[0];
        assert_eq!(message.event_type(), "OrderPlaced");
        assert_eq!(message.aggregate_id(), "o-1");
        assert_eq!(message.aggregate_type(), "Order");
        assert!(message.is_pending());

        let received = ReceivedEvent::from_json(message.payload()).unwrap();
        assert_eq!(received.event_id(), event.event_id());
        assert_eq!(received.event_name(), "OrderPlaced");
        assert_eq!(received.occurred_on(), event.occurred_on());
        assert_eq!(received.field("amount"), Some(&serde_json::json!(42)));
    }

    #[tokio::test]
    async fn default_limit_is_ten() {
        let service = OutboxService::new(RecordingStore::default());
        service.get_unprocessed_messages(None).await.unwrap();
        service.get_unprocessed_messages(Some(3)).await.unwrap();
        assert_eq!(*service.store().limits.lock().unwrap(), vec![10, 3]);
    }
}
