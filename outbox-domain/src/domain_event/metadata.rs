use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 事件元数据
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    #[builder(into)]
    event_id: String,
    #[builder(into)]
    event_name: String,
    occurred_on: DateTime<Utc>,
}

impl EventMetadata {
    /// 构造时分配全局唯一 ID（UUIDv7）与当前 UTC 时间
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::now_v7().to_string(),
            event_name: event_name.into(),
            occurred_on: Utc::now(),
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn occurred_on(&self) -> DateTime<Utc> {
        self.occurred_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assigns_unique_ids() {
        let a = EventMetadata::new("Ping");
        let b = EventMetadata::new("Ping");
        assert_ne!(a.event_id(), b.event_id());
        assert_eq!(a.event_name(), "Ping");
    }

    #[test]
    fn serializes_camel_case() {
        let meta = EventMetadata::builder()
            .event_id("e-1")
            .event_name("Ping")
            .occurred_on(Utc::now())
            .build();
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["eventId"], "e-1");
        assert_eq!(json["eventName"], "Ping");
        assert!(json["occurredOn"].is_string());
    }
}
