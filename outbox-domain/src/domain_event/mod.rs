//! 领域事件（Domain Event）与事件重建
//!
//! 定义事件载荷需要实现的最小接口（`DomainEvent`）、随事件持久化的元数据
//! （`EventMetadata`），以及从 Outbox 载荷重建事件的 `ReceivedEvent` 与
//! 按事件名解码的 `EventSet`/`Decoded`。

mod domain_event_trait;
mod event_set;
mod metadata;
mod received_event;

pub use domain_event_trait::DomainEvent;
pub use event_set::{Decoded, EventSet};
pub use metadata::EventMetadata;
pub use received_event::ReceivedEvent;
