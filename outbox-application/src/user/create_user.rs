use super::aggregate::User;
use crate::{command::Command, command_handler::CommandHandler, context::AppContext, error::AppError};
use async_trait::async_trait;
use outbox_domain::aggregate::Aggregate;
use outbox_domain::entity::Entity;
use outbox_domain::persist::Repository;
use outbox_domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use tracing::info;

/// 创建用户
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub name: String,
}

impl Command for CreateUser {
    const NAME: &'static str = "CreateUser";
    type Output = String;
}

impl CreateUser {
    /// 事务开始前的输入校验
    fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("email", &self.email),
            ("username", &self.username),
            ("name", &self.name),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{field} cannot be empty")));
            }
        }
        if !self.email.contains('@') {
            return Err(AppError::validation("email is not valid"));
        }
        Ok(())
    }
}

/// 在一个工作单元内保存用户，并把其事件追加到 Outbox
pub struct CreateUserHandler<F> {
    uow_factory: F,
}

impl<F> CreateUserHandler<F>
where
    F: UnitOfWorkFactory,
{
    pub fn new(uow_factory: F) -> Self {
        Self { uow_factory }
    }
}

#[async_trait]
impl<F> CommandHandler<CreateUser> for CreateUserHandler<F>
where
    F: UnitOfWorkFactory + 'static,
{
    async fn handle(&self, ctx: &AppContext, cmd: CreateUser) -> Result<String, AppError> {
        cmd.validate()?;

        let mut user = User::create(cmd.email, cmd.username, cmd.name);
        let uow = self.uow_factory.create();
        let staged = &user;

        uow.execute(|| async {
            uow.repository::<User>().create(staged).await?;
            let outbox = uow.outbox();
            for event in staged.pending_events() {
                outbox.add_message(event, staged.id(), User::TYPE).await?;
            }
            Ok::<_, AppError>(())
        })
        .await?;

        // 仅在提交成功后清空事件缓冲
        user.clear_events();
        info!(
            user_id = %user.id(),
            correlation_id = ctx.correlation_id.as_deref().unwrap_or_default(),
            "user persisted with outbox messages"
        );
        Ok(user.id().clone())
    }
}
