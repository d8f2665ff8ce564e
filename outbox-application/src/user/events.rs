use outbox_domain::domain_event::{Decoded, DomainEvent, EventMetadata, EventSet, ReceivedEvent};
use outbox_domain::error::DomainResult;
use serde::{Deserialize, Serialize};

/// 用户已创建
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreated {
    #[serde(flatten)]
    metadata: EventMetadata,
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub name: String,
}

impl UserCreated {
    pub const NAME: &'static str = "UserCreatedEvent";

    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(Self::NAME),
            user_id: user_id.into(),
            email: email.into(),
            username: username.into(),
            name: name.into(),
        }
    }
}

impl DomainEvent for UserCreated {
    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

/// 用户聚合的事件集合；序列化时不带变体标签，载荷即事件本身
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UserEvent {
    Created(UserCreated),
}

impl DomainEvent for UserEvent {
    fn metadata(&self) -> &EventMetadata {
        match self {
            UserEvent::Created(e) => e.metadata(),
        }
    }
}

impl EventSet for UserEvent {
    fn decode(event: &ReceivedEvent) -> DomainResult<Decoded<Self>> {
        match event.event_name() {
            UserCreated::NAME => Ok(Decoded::Known(UserEvent::Created(event.decode()?))),
            _ => Ok(Decoded::Unknown(event.clone())),
        }
    }
}
