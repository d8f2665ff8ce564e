//! 事务性 Outbox 领域层基础库（outbox-domain）
//!
//! 提供“状态变更与事件在同一事务内提交、再异步可靠分发”所需的抽象与构件：
//! - 聚合（`aggregate`）与实体（`entity`）建模，聚合内缓冲待发布事件
//! - 领域事件（`domain_event`）：事件元数据、从载荷重建事件与按事件名解码
//! - 仓储（`persist`）与工作单元（`unit_of_work`）：事务边界
//! - Outbox（`outbox`）：消息记录、存储协议与服务
//! - 事件分发（`eventing`）：处理器、注册表、批处理引擎与轮询器
//! - 内存实现（`memory`）：用于测试、示例与本地开发
//!
//! 本 crate 仅定义领域层接口与最小必要的错误类型，存储后端由上层适配实现；
//! 投递语义为“至少一次”，处理器需自行保证幂等。
//!
//! 典型用法：
//! 1. 定义聚合与事件，实现 `Aggregate` 与 `DomainEvent`；
//! 2. 在 `UnitOfWork::execute` 内写入聚合，并通过 `outbox().add_message` 追加其事件；
//! 3. 为每个事件类型向 `OutboxProcessor` 注册处理器；
//! 4. 使用 `OutboxPoller`（或自有调度器）周期调用 `process_batch`。
//!
pub mod aggregate;
pub mod domain_event;
pub mod entity;
pub mod error;
#[cfg(feature = "eventing")]
pub mod eventing;
#[cfg(feature = "inmemory")]
pub mod memory;
pub mod outbox;
pub mod persist;
pub mod unit_of_work;
