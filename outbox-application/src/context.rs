/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用所需的横切信息，例如：
/// - 关联追踪 `correlation_id`：贯穿命令、事务与日志；
/// - 执行者 `actor_id`：审计主体。
///
/// 典型用法：
/// ```rust
/// use outbox_application::context::AppContext;
///
/// let ctx = AppContext::default()
///     .with_correlation_id("cor-123")
///     .with_actor_id("u-1");
/// assert_eq!(ctx.correlation_id.as_deref(), Some("cor-123"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    /// 关联 ID（可选）
    pub correlation_id: Option<String>,
    /// 执行者 ID（可选）
    pub actor_id: Option<String>,
}

impl AppContext {
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }
}
