//! 应用层（outbox-application）
//!
//! 命令、命令处理器与进程内命令总线，以及基于事务性 Outbox 的用户创建用例。
//!
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod context;
pub mod error;
pub mod inmemory_command_bus;
pub mod user;

pub use inmemory_command_bus::InMemoryCommandBus;
