//! 事件分发子系统（eventing）
//!
//! 提供从 Outbox 到事件处理器的可靠分发：
//! - `EventHandler` / `TypedEventHandler`：按事件类型消费事件；
//! - `HandlerRegistry`：事件类型 → 处理器的映射；
//! - `OutboxProcessor`：单飞、逐条隔离的批处理引擎，至少一次投递；
//! - `OutboxPoller`：按固定间隔驱动处理器的长驻任务。
//!
//! 该模块只依赖 `OutboxStore` 协议，不绑定具体存储实现。
//!
pub mod handler;
pub mod poller;
pub mod processor;
pub mod registry;

pub use handler::{EventHandler, Typed, TypedEventHandler};
pub use poller::{OutboxPoller, OutboxPollerConfig, PollerHandle};
pub use processor::{DeadLetterPolicy, OutboxProcessor, OutboxProcessorConfig};
pub use registry::HandlerRegistry;
