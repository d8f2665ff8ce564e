//! 用户（user）
//!
//! 用户创建用例：命令在一个工作单元内保存 `User` 并将其 `UserCreatedEvent` 追加到 Outbox；
//! `UserCreatedHandler` 由 Outbox 处理器异步调用，投影到 `UserDirectory` 读模型。
//!
mod aggregate;
mod create_user;
mod events;
mod projection;

pub use aggregate::User;
pub use create_user::{CreateUser, CreateUserHandler};
pub use events::{UserCreated, UserEvent};
pub use projection::{UserCreatedHandler, UserDirectory, UserSummary};
