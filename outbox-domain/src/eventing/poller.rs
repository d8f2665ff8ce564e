//! 轮询器（OutboxPoller）
//!
//! 处理器之外的调度边界：按固定间隔驱动 `process_batch_of`，
//! 通过 `CancellationToken` 关闭，并提供等待任务结束的 `PollerHandle`。
//! 间隔内未完成的批次不会排队补跑（`MissedTickBehavior::Skip`）。
//!
use super::OutboxProcessor;
use crate::outbox::{DEFAULT_BATCH_SIZE, OutboxStore};
use bon::Builder;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// 轮询配置
#[derive(Clone, Copy, Debug, Builder)]
pub struct OutboxPollerConfig {
    /// 两次批处理之间的间隔
    #[builder(default = Duration::from_secs(1))]
    pub poll_interval: Duration,
    /// 每次批处理的拉取条数
    #[builder(default = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

impl Default for OutboxPollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

pub struct OutboxPoller<S> {
    processor: Arc<OutboxProcessor<S>>,
    config: OutboxPollerConfig,
}

impl<S> OutboxPoller<S>
where
    S: OutboxStore + 'static,
{
    pub fn new(processor: Arc<OutboxProcessor<S>>, config: OutboxPollerConfig) -> Self {
        Self { processor, config }
    }

    /// 启动轮询任务，返回可用于关闭/等待的句柄
    pub fn start(self) -> PollerHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(Self::poll_loop(
            self.processor,
            self.config,
            token.clone(),
        ));

        PollerHandle {
            token,
            task: Some(task),
        }
    }

    async fn poll_loop(
        processor: Arc<OutboxProcessor<S>>,
        config: OutboxPollerConfig,
        token: CancellationToken,
    ) {
        let mut ticker = time::interval(config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            interval_ms = config.poll_interval.as_millis() as u64,
            batch_size = config.batch_size,
            "outbox poller started"
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let handled = processor.process_batch_of(config.batch_size).await;
                    if handled > 0 {
                        debug!(handled, "outbox poll handled messages");
                    }
                }
            }
        }

        info!("outbox poller stopped");
    }
}

/// 轮询运行句柄：用于优雅关闭与等待任务结束；丢弃时自动关闭
pub struct PollerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 等待轮询任务退出（需先调用 `shutdown`，否则一直等待）
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
