use super::tables::{Change, Tables};
use super::{InMemoryOutboxStore, InMemoryUnitOfWork};
use crate::aggregate::Aggregate;
use crate::error::DomainResult;
use crate::outbox::OutboxMessage;
use crate::unit_of_work::UnitOfWorkFactory;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 进程内数据库：聚合记录表与 Outbox 表，可廉价克隆并在任务间共享
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// 自动提交的 Outbox 存储（供处理器使用）
    pub fn outbox_store(&self) -> InMemoryOutboxStore {
        InMemoryOutboxStore::new(self.clone())
    }

    /// 新建一个工作单元
    pub fn unit_of_work(&self) -> InMemoryUnitOfWork {
        InMemoryUnitOfWork::new(self.clone())
    }

    /// 已提交的全部 Outbox 消息（追加顺序）
    pub async fn messages(&self) -> Vec<OutboxMessage> {
        self.tables.read().await.messages().to_vec()
    }

    pub async fn find_message(&self, id: &str) -> Option<OutboxMessage> {
        self.tables.read().await.message(id).cloned()
    }

    /// 读取已提交的聚合
    pub async fn find_aggregate<A>(&self, id: &A::Id) -> DomainResult<Option<A>>
    where
        A: Aggregate,
    {
        let key = (A::TYPE.to_string(), id.to_string());
        match self.tables.read().await.record(&key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// 已提交的某类聚合总数
    pub async fn count_aggregates<A>(&self) -> usize
    where
        A: Aggregate,
    {
        self.tables.read().await.records_of(A::TYPE).count()
    }

    pub(crate) fn tables(&self) -> &Arc<RwLock<Tables>> {
        &self.tables
    }

    /// 在副本上依次应用全部写入，全部成功后整体替换；任一失败则不留下部分状态
    pub(crate) async fn commit(&self, changes: Vec<Change>) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        let mut next = tables.clone();
        for change in changes {
            next.apply(change)?;
        }
        *tables = next;
        Ok(())
    }
}

impl UnitOfWorkFactory for InMemoryDatabase {
    type UnitOfWork = InMemoryUnitOfWork;

    fn create(&self) -> Self::UnitOfWork {
        self.unit_of_work()
    }
}
