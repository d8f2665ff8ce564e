use super::received_event::ReceivedEvent;
use crate::error::DomainResult;

/// 按事件名解码的结果：已知变体，或显式的未知回退
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<E> {
    Known(E),
    Unknown(ReceivedEvent),
}

impl<E> Decoded<E> {
    pub fn known(self) -> Option<E> {
        match self {
            Decoded::Known(e) => Some(e),
            Decoded::Unknown(_) => None,
        }
    }
}

/// 一组已知事件（通常是某聚合的事件枚举），按 `eventName` 选择变体解码
///
/// 名称匹配但字段无法解码时返回错误；名称不在集合内时返回 `Decoded::Unknown`。
pub trait EventSet: Sized + Send + Sync + 'static {
    fn decode(event: &ReceivedEvent) -> DomainResult<Decoded<Self>>;
}
