//! 事务性 Outbox
//!
//! - `OutboxMessage`：一条待投递事件的持久化记录；
//! - `OutboxStore`：追加、查询未处理消息、标记成功/失败的存储协议；
//! - `OutboxService`：在领域事件与 Outbox 记录之间转换，并暴露待处理工作。
//!
//! 存储引擎本身不在此定义；追加操作必须与聚合写入处于同一事务。
//!
mod message;
mod service;
mod store;

pub use message::OutboxMessage;
pub use service::{DEFAULT_BATCH_SIZE, OutboxService};
pub use store::OutboxStore;
