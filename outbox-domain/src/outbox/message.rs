use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outbox 消息：一条已持久化、等待投递的领域事件
///
/// 只有“未处理”（`processed_at` 为空）与“已处理”两种持久化状态；
/// `error` 可以与“未处理”共存，表示上一次投递失败、等待下次轮询重试。
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct OutboxMessage {
    /// 消息唯一标识（默认 UUIDv7）
    #[builder(into, default = Uuid::now_v7().to_string())]
    id: String,
    /// 产生事件的聚合 ID
    #[builder(into)]
    aggregate_id: String,
    /// 产生事件的聚合类型
    #[builder(into)]
    aggregate_type: String,
    /// 事件类型，等于事件的逻辑名称，用于处理器查找
    #[builder(into)]
    event_type: String,
    /// 序列化后的事件（JSON）
    #[builder(into)]
    payload: String,
    /// 追加时间
    #[builder(default = Utc::now())]
    created_at: DateTime<Utc>,
    /// 处理成功时间，仅设置一次
    processed_at: Option<DateTime<Utc>>,
    /// 最近一次失败原因，重试时不会自动清除
    error: Option<String>,
    /// 失败次数（仅在启用死信策略时累加）
    #[builder(default)]
    attempts: u32,
    /// 进入死信的时间（仅在启用死信策略时设置）
    dead_lettered_at: Option<DateTime<Utc>>,
}

impl OutboxMessage {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn dead_lettered_at(&self) -> Option<DateTime<Utc>> {
        self.dead_lettered_at
    }

    pub fn is_processed(&self) -> bool {
        self.processed_at.is_some()
    }

    pub fn is_dead_lettered(&self) -> bool {
        self.dead_lettered_at.is_some()
    }

    /// 是否仍在未处理集合中（可被下一次轮询取出）
    pub fn is_pending(&self) -> bool {
        !self.is_processed() && !self.is_dead_lettered()
    }

    /// 标记为已处理；已处理的消息保持原 `processed_at`，返回是否发生变更
    pub fn mark_processed(&mut self, at: DateTime<Utc>) -> bool {
        if self.processed_at.is_some() {
            return false;
        }
        self.processed_at = Some(at);
        true
    }

    /// 记录失败原因（覆盖上一次），消息保持未处理
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// 失败计数加一并返回新值
    pub fn increment_attempts(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// 移出未处理集合，等待人工处理
    pub fn mark_dead_lettered(&mut self, at: DateTime<Utc>, error: impl Into<String>) {
        self.error = Some(error.into());
        if self.dead_lettered_at.is_none() {
            self.dead_lettered_at = Some(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn message() -> OutboxMessage {
        OutboxMessage::builder()
            .aggregate_id("u-1")
            .aggregate_type("User")
            .event_type("UserCreatedEvent")
            .payload("{}")
            .build()
    }

    #[test]
    fn builder_assigns_id_and_created_at() {
        let a = message();
        let b = message();
        assert_ne!(a.id(), b.id());
        assert!(a.is_pending());
        assert_eq!(a.attempts(), 0);
        assert!(a.error().is_none());
    }

    #[test]
    fn mark_processed_only_once() {
        let mut m = message();
        let first = Utc::now();
        assert!(m.mark_processed(first));
        assert!(!m.mark_processed(first + Duration::seconds(5)));
        assert_eq!(m.processed_at(), Some(first));
        assert!(!m.is_pending());
    }

    #[test]
    fn mark_failed_overwrites_and_stays_pending() {
        let mut m = message();
        m.mark_failed("first");
        m.mark_failed("second");
        assert_eq!(m.error(), Some("second"));
        assert!(m.is_pending());
        assert_eq!(m.attempts(), 0);
    }

    #[test]
    fn dead_lettered_leaves_pending_set() {
        let mut m = message();
        assert_eq!(m.increment_attempts(), 1);
        m.mark_dead_lettered(Utc::now(), "boom");
        assert!(m.is_dead_lettered());
        assert!(!m.is_processed());
        assert!(!m.is_pending());
        assert_eq!(m.error(), Some("boom"));
    }
}
