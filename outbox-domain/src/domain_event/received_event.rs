use super::metadata::EventMetadata;
use crate::error::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// 从 Outbox 载荷重建的事件
///
/// 至少还原 `eventId`、`eventName`、`occurredOn`，并保留完整的 JSON 对象，
/// 处理器可按需读取字段或解码为具体事件类型。
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedEvent {
    metadata: EventMetadata,
    payload: Map<String, Value>,
}

impl ReceivedEvent {
    /// 解析序列化载荷；载荷必须是携带事件元数据的 JSON 对象
    pub fn from_json(raw: &str) -> DomainResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> DomainResult<Self> {
        let Value::Object(payload) = value else {
            return Err(DomainError::invalid_event("payload is not a JSON object"));
        };

        let metadata = EventMetadata::builder()
            .event_id(required_str(&payload, "eventId")?)
            .event_name(required_str(&payload, "eventName")?)
            .occurred_on(required_str(&payload, "occurredOn")?.parse::<DateTime<Utc>>()?)
            .build();

        Ok(Self { metadata, payload })
    }

    pub fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    pub fn event_id(&self) -> &str {
        self.metadata.event_id()
    }

    pub fn event_name(&self) -> &str {
        self.metadata.event_name()
    }

    pub fn occurred_on(&self) -> DateTime<Utc> {
        self.metadata.occurred_on()
    }

    /// 读取载荷中的单个字段
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// 完整载荷（包含元数据字段）
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// 将载荷解码为具体事件类型
    pub fn decode<T>(&self) -> DomainResult<T>
    where
        T: DeserializeOwned,
    {
        let value = Value::Object(self.payload.clone());
        Ok(serde_json::from_value(value)?)
    }
}

fn required_str<'a>(payload: &'a Map<String, Value>, key: &str) -> DomainResult<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::invalid_event(format!("missing or non-string field `{key}`")))
}
