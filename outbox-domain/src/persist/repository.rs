use crate::{aggregate::Aggregate, error::DomainResult as Result};
use async_trait::async_trait;
use std::sync::Arc;

/// 聚合仓储：按聚合类型读写聚合状态
#[async_trait]
pub trait Repository<A>: Send + Sync
where
    A: Aggregate,
{
    async fn find_by_id(&self, id: &A::Id) -> Result<Option<A>>;

    async fn create(&self, aggregate: &A) -> Result<()>;

    async fn update(&self, aggregate: &A) -> Result<()>;

    async fn delete(&self, id: &A::Id) -> Result<()>;
}

#[async_trait]
impl<A, T> Repository<A> for Arc<T>
where
    A: Aggregate,
    T: Repository<A> + ?Sized,
{
    async fn find_by_id(&self, id: &A::Id) -> Result<Option<A>> {
        (**self).find_by_id(id).await
    }

    async fn create(&self, aggregate: &A) -> Result<()> {
        (**self).create(aggregate).await
    }

    async fn update(&self, aggregate: &A) -> Result<()> {
        (**self).update(aggregate).await
    }

    async fn delete(&self, id: &A::Id) -> Result<()> {
        (**self).delete(id).await
    }
}
