use super::InMemoryDatabase;
use super::InMemoryRepository;
use super::tables::{Change, ChangeSet, RecordKey};
use crate::aggregate::Aggregate;
use crate::error::{DomainError, DomainResult};
use crate::outbox::{OutboxMessage, OutboxService, OutboxStore};
use crate::unit_of_work::UnitOfWork;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

/// 内存工作单元：写入先暂存，提交时一次性校验并应用
///
/// 同一工作单元一次只允许一个活动事务；仓储可读到本事务内尚未提交的写入，
/// Outbox 的读取只看到已提交数据。
#[derive(Debug)]
pub struct InMemoryUnitOfWork {
    db: InMemoryDatabase,
    tx: Mutex<Option<ChangeSet>>,
}

impl InMemoryUnitOfWork {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self {
            db,
            tx: Mutex::new(None),
        }
    }

    pub fn database(&self) -> &InMemoryDatabase {
        &self.db
    }

    pub async fn in_transaction(&self) -> bool {
        self.tx.lock().await.is_some()
    }

    pub(crate) async fn stage(&self, change: Change) -> DomainResult<()> {
        let mut tx = self.tx.lock().await;
        let changes = tx.as_mut().ok_or(DomainError::NoActiveTransaction)?;
        changes.push(change);
        Ok(())
    }

    /// 先查本事务暂存的写入，再查已提交数据
    pub(crate) async fn load_record(&self, key: &RecordKey) -> Option<Value> {
        if let Some(changes) = self.tx.lock().await.as_ref() {
            if let Some(staged) = changes.staged_record(key) {
                return staged.cloned();
            }
        }
        self.db.tables().read().await.record(key).cloned()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    type Repo<'a, A>
        = InMemoryRepository<'a, A>
    where
        Self: 'a,
        A: Aggregate;

    type Outbox<'a>
        = TransactionalOutbox<'a>
    where
        Self: 'a;

    fn repository<A>(&self) -> Self::Repo<'_, A>
    where
        A: Aggregate,
    {
        InMemoryRepository::new(self)
    }

    fn outbox(&self) -> OutboxService<Self::Outbox<'_>> {
        OutboxService::new(TransactionalOutbox { uow: self })
    }

    async fn begin_transaction(&self) -> DomainResult<()> {
        let mut tx = self.tx.lock().await;
        if tx.is_some() {
            return Err(DomainError::TransactionAlreadyActive);
        }
        *tx = Some(ChangeSet::default());
        Ok(())
    }

    async fn commit_transaction(&self) -> DomainResult<()> {
        let changes = self
            .tx
            .lock()
            .await
            .take()
            .ok_or(DomainError::NoActiveTransaction)?;
        self.db.commit(changes.into_changes()).await
    }

    async fn rollback_transaction(&self) -> DomainResult<()> {
        let changes = self
            .tx
            .lock()
            .await
            .take()
            .ok_or(DomainError::NoActiveTransaction)?;
        debug!(discarded = changes.len(), "transaction rolled back");
        Ok(())
    }
}

/// 绑定到工作单元事务的 Outbox 存储：写入随事务提交，读取只看到已提交数据
#[derive(Debug, Clone, Copy)]
pub struct TransactionalOutbox<'a> {
    uow: &'a InMemoryUnitOfWork,
}

#[async_trait]
impl<'a> OutboxStore for TransactionalOutbox<'a> {
    async fn append(&self, message: OutboxMessage) -> DomainResult<()> {
        self.uow.stage(Change::Append(message)).await
    }

    async fn get_unprocessed(&self, limit: usize) -> DomainResult<Vec<OutboxMessage>> {
        Ok(self.uow.db.tables().read().await.unprocessed(limit))
    }

    async fn mark_processed(&self, id: &str) -> DomainResult<()> {
        self.uow
            .stage(Change::MarkProcessed {
                id: id.to_string(),
                at: Utc::now(),
            })
            .await
    }

    async fn mark_failed(&self, id: &str, error: &str) -> DomainResult<()> {
        self.uow
            .stage(Change::MarkFailed {
                id: id.to_string(),
                error: error.to_string(),
            })
            .await
    }
}
