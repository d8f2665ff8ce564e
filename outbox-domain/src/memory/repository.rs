use super::InMemoryUnitOfWork;
use super::tables::{Change, RecordKey};
use crate::aggregate::Aggregate;
use crate::error::DomainResult as Result;
use crate::persist::Repository;
use async_trait::async_trait;
use std::marker::PhantomData;

/// 绑定到内存工作单元的聚合仓储；聚合以 JSON 形式按 (类型, ID) 保存
pub struct InMemoryRepository<'a, A> {
    uow: &'a InMemoryUnitOfWork,
    _marker: PhantomData<fn() -> A>,
}

impl<'a, A> InMemoryRepository<'a, A>
where
    A: Aggregate,
{
    pub(crate) fn new(uow: &'a InMemoryUnitOfWork) -> Self {
        Self {
            uow,
            _marker: PhantomData,
        }
    }

    fn key(id: &A::Id) -> RecordKey {
        (A::TYPE.to_string(), id.to_string())
    }
}

#[async_trait]
impl<'a, A> Repository<A> for InMemoryRepository<'a, A>
where
    A: Aggregate,
{
    async fn find_by_id(&self, id: &A::Id) -> Result<Option<A>> {
        match self.uow.load_record(&Self::key(id)).await {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, aggregate: &A) -> Result<()> {
        let value = serde_json::to_value(aggregate)?;
        self.uow
            .stage(Change::Create {
                key: Self::key(aggregate.id()),
                value,
            })
            .await
    }

    async fn update(&self, aggregate: &A) -> Result<()> {
        let value = serde_json::to_value(aggregate)?;
        self.uow
            .stage(Change::Update {
                key: Self::key(aggregate.id()),
                value,
            })
            .await
    }

    async fn delete(&self, id: &A::Id) -> Result<()> {
        self.uow.stage(Change::Delete { key: Self::key(id) }).await
    }
}
