//! 聚合（Aggregate）抽象
//!
//! 约束一个聚合的核心行为：
//! - 通过 `Entity` 约束聚合具备标识；
//! - 在两次提交之间缓冲领域事件（`EventBuffer`），对外只读；
//! - 仅在聚合与其 Outbox 消息在同一事务内提交成功后，由调用方清空缓冲。
//!
use crate::domain_event::DomainEvent;
use crate::entity::Entity;
use serde::{Serialize, de::DeserializeOwned};
use std::slice::Iter;

/// 聚合根接口
pub trait Aggregate: Entity + Serialize + DeserializeOwned + 'static {
    /// 聚合类型标签（持久化为 `aggregate_type`）
    const TYPE: &'static str;

    /// 该聚合产生的领域事件类型
    type Event: DomainEvent;

    /// 已缓冲、尚未提交的事件
    fn pending_events(&self) -> &[Self::Event];

    /// 清空事件缓冲（仅在提交成功后调用）
    fn clear_events(&mut self);
}

/// 聚合私有的、只追加的事件缓冲
#[derive(Debug, Clone)]
pub struct EventBuffer<E> {
    events: Vec<E>,
}

impl<E> Default for EventBuffer<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBuffer<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个事件
    pub fn record(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    pub fn iter(&self) -> Iter<'_, E> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<'a, E> IntoIterator for &'a EventBuffer<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
