//! 事件处理器（EventHandler）
//!
//! 定义消费某一类事件的处理逻辑与元信息（名称）。处理器按事件类型注册，
//! 可能因整条消息重投而收到重复事件，因此需自行保证幂等。
//!
use crate::domain_event::{Decoded, EventSet, ReceivedEvent};
use async_trait::async_trait;
use std::marker::PhantomData;

/// 事件处理器：处理一条已重建的事件
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// 处理器名称（用于日志与失败标记）
    fn handler_name(&self) -> &str;

    /// 处理事件；返回错误即视为本次投递失败
    async fn handle(&self, event: &ReceivedEvent) -> anyhow::Result<()>;
}

/// 强类型事件处理器：按 `EventSet` 解码后处理
#[async_trait]
pub trait TypedEventHandler<E>: Send + Sync
where
    E: EventSet,
{
    fn handler_name(&self) -> &str;

    async fn handle(&self, event: E) -> anyhow::Result<()>;

    /// 事件名不在集合内时的回退；默认记录日志并视为成功
    async fn handle_unknown(&self, event: ReceivedEvent) -> anyhow::Result<()> {
        tracing::warn!(
            handler = self.handler_name(),
            event_id = event.event_id(),
            event_name = event.event_name(),
            "event not part of the handler's event set, skipping"
        );
        Ok(())
    }
}

/// 将 `TypedEventHandler` 适配为 `EventHandler`
pub struct Typed<E, H> {
    inner: H,
    _marker: PhantomData<fn() -> E>,
}

impl<E, H> Typed<E, H>
where
    E: EventSet,
    H: TypedEventHandler<E>,
{
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<E, H> EventHandler for Typed<E, H>
where
    E: EventSet,
    H: TypedEventHandler<E>,
{
    fn handler_name(&self) -> &str {
        self.inner.handler_name()
    }

    async fn handle(&self, event: &ReceivedEvent) -> anyhow::Result<()> {
        match E::decode(event)? {
            Decoded::Known(typed) => self.inner.handle(typed).await,
            Decoded::Unknown(raw) => self.inner.handle_unknown(raw).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainResult;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Deposited {
        amount: i64,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum AccountEvent {
        Deposited(Deposited),
    }

    impl EventSet for AccountEvent {
        fn decode(event: &ReceivedEvent) -> DomainResult<Decoded<Self>> {
            match event.event_name() {
                "Deposited" => Ok(Decoded::Known(AccountEvent::Deposited(event.decode()?))),
                _ => Ok(Decoded::Unknown(event.clone())),
            }
        }
    }

    #[derive(Default)]
    struct Ledger {
        seen: Mutex<Vec<AccountEvent>>,
    }

    #[async_trait]
    impl TypedEventHandler<AccountEvent> for Ledger {
        fn handler_name(&self) -> &str {
            "ledger"
        }

        async fn handle(&self, event: AccountEvent) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn received(name: &str, extra: &str) -> ReceivedEvent {
        ReceivedEvent::from_json(&format!(
            r#"{{"eventId":"e-1","eventName":"{name}","occurredOn":"2024-01-01T00:00:00Z"{extra}}}"#
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn known_events_are_decoded() {
        let handler = Typed::new(Ledger::default());
        handler
            .handle(&received("Deposited", r#","amount":5"#))
            .await
            .unwrap();

        assert_eq!(handler.handler_name(), "ledger");
        assert_eq!(
            *handler.inner().seen.lock().unwrap(),
            vec![AccountEvent::Deposited(Deposited { amount: 5 })]
        );
    }

    #[tokio::test]
    async fn unknown_events_fall_back_without_failing() {
        let handler = Typed::new(Ledger::default());
        handler.handle(&received("Withdrawn", "")).await.unwrap();
        assert!(handler.inner().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn undecodable_known_event_is_an_error() {
        let handler = Typed::new(Ledger::default());
        let err = handler
            .handle(&received("Deposited", r#","amount":"lots""#))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("serialization error"));
    }
}
