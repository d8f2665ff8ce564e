//! 内存实现（memory）
//!
//! 面向测试、示例与本地开发的进程内存储：
//! - `InMemoryDatabase`：已提交的聚合记录表与 Outbox 表；
//! - `InMemoryUnitOfWork`：暂存写入，提交时整体校验并原子替换；
//! - `InMemoryRepository` / `TransactionalOutbox`：绑定到工作单元的仓储与 Outbox；
//! - `InMemoryOutboxStore`：供处理器使用的自动提交 Outbox 存储。
//!
mod database;
mod outbox_store;
mod repository;
mod tables;
mod unit_of_work;

pub use database::InMemoryDatabase;
pub use outbox_store::InMemoryOutboxStore;
pub use repository::InMemoryRepository;
pub use unit_of_work::{InMemoryUnitOfWork, TransactionalOutbox};
