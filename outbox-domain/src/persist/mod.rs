//! 持久化（persist）
//!
//! 定义聚合仓储协议。具体存储后端由上层提供实现并注入；
//! 在工作单元内获取的仓储与 Outbox 追加共享同一事务。
//!
mod repository;

pub use repository::Repository;
