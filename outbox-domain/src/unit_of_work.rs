//! 工作单元（Unit of Work）
//!
//! 定义一次业务操作的事务边界：聚合写入与其事件的 Outbox 追加在同一事务内
//! 一起提交或一起回滚。`execute` 由 `begin/commit/rollback` 三个原语组合而成。
//!
use crate::{
    aggregate::Aggregate,
    error::DomainError,
    outbox::{OutboxService, OutboxStore},
    persist::Repository,
};
use async_trait::async_trait;
use std::future::Future;

/// 工作单元：事务原语 + 绑定到当前事务的仓储与 Outbox
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 绑定到当前事务的聚合仓储
    type Repo<'a, A>: Repository<A>
    where
        Self: 'a,
        A: Aggregate;

    /// 绑定到当前事务的 Outbox 存储
    type Outbox<'a>: OutboxStore
    where
        Self: 'a;

    /// 获取聚合类型 `A` 的事务内仓储
    fn repository<A>(&self) -> Self::Repo<'_, A>
    where
        A: Aggregate;

    /// 获取事务内的 Outbox 服务
    fn outbox(&self) -> OutboxService<Self::Outbox<'_>>;

    async fn begin_transaction(&self) -> Result<(), DomainError>;

    async fn commit_transaction(&self) -> Result<(), DomainError>;

    async fn rollback_transaction(&self) -> Result<(), DomainError>;

    /// 在单个事务内执行 `work`：
    /// - 返回 `Ok` 时提交，提交失败则返回提交错误；
    /// - 返回 `Err` 时回滚并返回原错误（回滚失败仅记录日志）。
    fn execute<'a, F, Fut, T, E>(&'a self, work: F) -> impl Future<Output = Result<T, E>> + Send + 'a
    where
        Self: Sized,
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<T, E>> + Send + 'a,
        T: Send + 'a,
        E: From<DomainError> + Send + 'a,
    {
        async move {
            self.begin_transaction().await?;

            match work().await {
                Ok(value) => {
                    self.commit_transaction().await?;
                    Ok(value)
                }
                Err(err) => {
                    if let Err(rollback_err) = self.rollback_transaction().await {
                        tracing::error!(error = %rollback_err, "rollback failed after unit of work error");
                    }
                    Err(err)
                }
            }
        }
    }
}

/// 工作单元工厂：每次业务操作创建一个独立的工作单元
pub trait UnitOfWorkFactory: Send + Sync {
    type UnitOfWork: UnitOfWork;

    fn create(&self) -> Self::UnitOfWork;
}
