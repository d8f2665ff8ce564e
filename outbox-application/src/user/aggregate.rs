use super::events::{UserCreated, UserEvent};
use outbox_domain::aggregate::{Aggregate, EventBuffer};
use outbox_domain::entity::Entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户聚合
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: String,
    email: String,
    username: String,
    name: String,
    #[serde(skip)]
    events: EventBuffer<UserEvent>,
}

impl User {
    /// 创建用户并记录 `UserCreated`
    pub fn create(
        email: impl Into<String>,
        username: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let mut user = Self {
            id: Uuid::now_v7().to_string(),
            email: email.into(),
            username: username.into(),
            name: name.into(),
            events: EventBuffer::new(),
        };
        user.events.record(UserEvent::Created(UserCreated::new(
            user.id.clone(),
            user.email.clone(),
            user.username.clone(),
            user.name.clone(),
        )));
        user
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for User {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Aggregate for User {
    const TYPE: &'static str = "User";
    type Event = UserEvent;

    fn pending_events(&self) -> &[Self::Event] {
        self.events.as_slice()
    }

    fn clear_events(&mut self) {
        self.events.clear();
    }
}
