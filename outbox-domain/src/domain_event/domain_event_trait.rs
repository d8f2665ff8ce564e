use super::metadata::EventMetadata;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// 领域事件载荷需要满足的通用能力边界
///
/// 具体事件通过 `#[serde(flatten)]` 将 `EventMetadata` 展开到载荷顶层，
/// 使序列化后的 JSON 对象同时携带 `eventId`、`eventName`、`occurredOn` 与业务字段。
pub trait DomainEvent: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// 事件元数据（标识、逻辑名称、发生时间）
    fn metadata(&self) -> &EventMetadata;

    /// 事件唯一标识
    fn event_id(&self) -> &str {
        self.metadata().event_id()
    }

    /// 事件逻辑名称，持久化时原样作为 `event_type`
    fn event_name(&self) -> &str {
        self.metadata().event_name()
    }

    /// 事件发生时间（UTC）
    fn occurred_on(&self) -> DateTime<Utc> {
        self.metadata().occurred_on()
    }
}
