use super::message::OutboxMessage;
use crate::error::DomainResult as Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Outbox 存储：持久化的只追加消息表
///
/// 实现需与聚合状态的持久化保持事务一致；未处理消息按 `created_at` 升序
/// （同一时间按追加顺序）返回。
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// 追加一条新消息
    async fn append(&self, message: OutboxMessage) -> Result<()>;

    /// 拉取至多 `limit` 条未处理消息
    async fn get_unprocessed(&self, limit: usize) -> Result<Vec<OutboxMessage>>;

    /// 标记为已处理（幂等：重复标记不报错、不修改 `processed_at`）
    async fn mark_processed(&self, id: &str) -> Result<()>;

    /// 记录失败原因，消息保持未处理以便重试
    async fn mark_failed(&self, id: &str, error: &str) -> Result<()>;

    /// 失败计数加一并返回新值；返回 `None` 表示该存储不跟踪次数
    async fn increment_attempts(&self, _id: &str) -> Result<Option<u32>> {
        Ok(None)
    }

    /// 将消息移入死信，不再被轮询取出
    async fn mark_dead_lettered(&self, id: &str, error: &str) -> Result<()> {
        self.mark_failed(id, error).await
    }
}

#[async_trait]
impl<T> OutboxStore for Arc<T>
where
    T: OutboxStore + ?Sized,
{
    async fn append(&self, message: OutboxMessage) -> Result<()> {
        (**self).append(message).await
    }

    async fn get_unprocessed(&self, limit: usize) -> Result<Vec<OutboxMessage>> {
        (**self).get_unprocessed(limit).await
    }

    async fn mark_processed(&self, id: &str) -> Result<()> {
        (**self).mark_processed(id).await
    }

    async fn mark_failed(&self, id: &str, error: &str) -> Result<()> {
        (**self).mark_failed(id, error).await
    }

    async fn increment_attempts(&self, id: &str) -> Result<Option<u32>> {
        (**self).increment_attempts(id).await
    }

    async fn mark_dead_lettered(&self, id: &str, error: &str) -> Result<()> {
        (**self).mark_dead_lettered(id, error).await
    }
}
