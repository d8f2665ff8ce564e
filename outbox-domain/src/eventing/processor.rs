//! Outbox 处理器（OutboxProcessor）
//!
//! 分发引擎：按批拉取未处理消息，按 `event_type` 查找处理器并调用，回写消息状态。
//! - 单飞保护：同一进程内重叠的批处理调用直接返回 0，不会拉取消息；
//! - 逐条隔离：任一消息的失败（包括处理器 panic）只影响该消息本身；
//! - 未注册类型：记录配置告警后标记为已处理，避免无法投递的消息堆积；
//! - 至少一次：失败消息保持未处理并记录原因，由后续批次重投。
//!
use super::{EventHandler, HandlerRegistry};
use crate::domain_event::ReceivedEvent;
use crate::outbox::{DEFAULT_BATCH_SIZE, OutboxMessage, OutboxService, OutboxStore};
use bon::Builder;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, warn};

/// 死信策略（扩展，默认关闭）：失败次数达到 `max_attempts` 后移出未处理集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadLetterPolicy {
    pub max_attempts: u32,
}

impl DeadLetterPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

/// 处理器配置
#[derive(Debug, Clone, Copy, Builder)]
pub struct OutboxProcessorConfig {
    /// `process_batch` 单批拉取条数
    #[builder(default = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
    /// 死信策略；为空时无限重试
    pub dead_letter: Option<DeadLetterPolicy>,
}

impl Default for OutboxProcessorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            dead_letter: None,
        }
    }
}

pub struct OutboxProcessor<S> {
    outbox: OutboxService<S>,
    registry: HandlerRegistry,
    config: OutboxProcessorConfig,
    processing: AtomicBool,
}

/// 单条消息的处理结果
enum Outcome {
    Handled,
    Skipped,
    Failed,
}

impl<S> OutboxProcessor<S>
where
    S: OutboxStore,
{
    pub fn new(outbox: OutboxService<S>) -> Self {
        Self::with_config(outbox, OutboxProcessorConfig::default())
    }

    pub fn with_config(outbox: OutboxService<S>, config: OutboxProcessorConfig) -> Self {
        Self {
            outbox,
            registry: HandlerRegistry::new(),
            config,
            processing: AtomicBool::new(false),
        }
    }

    /// 为事件类型注册处理器（后注册者覆盖）；应在启动阶段、开始轮询之前调用
    pub fn register_event_handler(
        &mut self,
        event_type: impl Into<String>,
        handler: Arc<dyn EventHandler>,
    ) {
        let event_type = event_type.into();
        if let Some(previous) = self.registry.register(event_type.clone(), handler) {
            debug!(
                event_type = %event_type,
                replaced = previous.handler_name(),
                "event handler replaced"
            );
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &OutboxProcessorConfig {
        &self.config
    }

    pub fn outbox(&self) -> &OutboxService<S> {
        &self.outbox
    }

    /// 当前是否有批处理在运行
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// 按配置的批大小（默认 10）处理一批消息
    pub async fn process_batch(&self) -> usize {
        self.process_batch_of(self.config.batch_size).await
    }

    /// 处理至多 `batch_size` 条消息，返回进入“已处理”终态的条数
    /// （成功分发与跳过的未注册类型都计入）。
    ///
    /// 从不返回错误：拉取失败记录日志并返回 0，单条失败记录在消息的 `error` 上。
    pub async fn process_batch_of(&self, batch_size: usize) -> usize {
        let Some(_guard) = ProcessingGuard::acquire(&self.processing) else {
            debug!("outbox batch already in progress, skipping");
            return 0;
        };

        let messages = match self.outbox.get_unprocessed_messages(Some(batch_size)).await {
            Ok(messages) => messages,
            Err(err) => {
                error!(error = %err, "failed to fetch unprocessed outbox messages");
                return 0;
            }
        };

        let fetched = messages.len();
        let mut handled = 0;
        let mut skipped = 0;
        for message in &messages {
            match self.process_message(message).await {
                Outcome::Handled => handled += 1,
                Outcome::Skipped => skipped += 1,
                Outcome::Failed => {}
            }
        }

        if fetched > 0 {
            debug!(fetched, handled, skipped, "outbox batch finished");
        }
        handled + skipped
    }

    async fn process_message(&self, message: &OutboxMessage) -> Outcome {
        let Some(handler) = self.registry.get(message.event_type()) else {
            warn!(
                message_id = message.id(),
                event_type = message.event_type(),
                "no handler registered for event type, marking message as processed"
            );
            return match self.outbox.mark_as_processed(message.id()).await {
                Ok(()) => Outcome::Skipped,
                Err(err) => {
                    self.record_failure(message, &err.to_string()).await;
                    Outcome::Failed
                }
            };
        };

        if let Err(reason) = Self::dispatch(handler.as_ref(), message).await {
            error!(
                message_id = message.id(),
                event_type = message.event_type(),
                handler = handler.handler_name(),
                error = %reason,
                "outbox message dispatch failed"
            );
            self.record_failure(message, &reason).await;
            return Outcome::Failed;
        }

        match self.outbox.mark_as_processed(message.id()).await {
            Ok(()) => Outcome::Handled,
            Err(err) => {
                error!(
                    message_id = message.id(),
                    error = %err,
                    "failed to mark outbox message as processed"
                );
                self.record_failure(message, &err.to_string()).await;
                Outcome::Failed
            }
        }
    }

    /// 重建事件并调用处理器；任何失败都转换为错误文本
    async fn dispatch(handler: &dyn EventHandler, message: &OutboxMessage) -> Result<(), String> {
        let event = ReceivedEvent::from_json(message.payload()).map_err(|err| err.to_string())?;

        match AssertUnwindSafe(handler.handle(&event)).catch_unwind().await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.to_string()),
            Err(panic) => Err(panic_message(panic)),
        }
    }

    async fn record_failure(&self, message: &OutboxMessage, reason: &str) {
        if let Err(err) = self.outbox.mark_as_failed(message.id(), reason).await {
            error!(
                message_id = message.id(),
                error = %err,
                "failed to mark outbox message as failed"
            );
            return;
        }

        let Some(policy) = self.config.dead_letter else {
            return;
        };

        let store = self.outbox.store();
        match store.increment_attempts(message.id()).await {
            Ok(Some(attempts)) if attempts >= policy.max_attempts => {
                match store.mark_dead_lettered(message.id(), reason).await {
                    Ok(()) => warn!(
                        message_id = message.id(),
                        event_type = message.event_type(),
                        attempts,
                        "outbox message moved to dead letter"
                    ),
                    Err(err) => error!(
                        message_id = message.id(),
                        error = %err,
                        "failed to dead-letter outbox message"
                    ),
                }
            }
            Ok(_) => {}
            Err(err) => error!(
                message_id = message.id(),
                error = %err,
                "failed to increment outbox message attempts"
            ),
        }
    }
}

impl<S> std::fmt::Debug for OutboxProcessor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboxProcessor")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("processing", &self.processing.load(Ordering::Relaxed))
            .finish()
    }
}

/// 单飞保护：获取成功后在任意退出路径（含 panic）上释放
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "event handler panicked".to_string()
    }
}
