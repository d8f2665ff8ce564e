//! Outbox（内存版）示例
//! 展示 聚合写入 + Outbox 追加（同一事务） -> 处理器分发 -> 失败重投 的闭环
use anyhow::Result as AnyResult;
use async_trait::async_trait;
use outbox_domain::domain_event::{DomainEvent, EventMetadata, ReceivedEvent};
use outbox_domain::error::DomainError;
use outbox_domain::eventing::{EventHandler, OutboxProcessor};
use outbox_domain::memory::InMemoryDatabase;
use outbox_domain::outbox::OutboxService;
use outbox_domain::unit_of_work::UnitOfWork;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceIssued {
    #[serde(flatten)]
    metadata: EventMetadata,
    invoice_id: String,
    amount: i64,
}

impl DomainEvent for InvoiceIssued {
    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

/// 第一次调用失败，之后成功
#[derive(Default)]
struct Mailer {
    warmed_up: AtomicBool,
}

#[async_trait]
impl EventHandler for Mailer {
    fn handler_name(&self) -> &str {
        "mailer"
    }

    async fn handle(&self, event: &ReceivedEvent) -> anyhow::Result<()> {
        if !self.warmed_up.swap(true, Ordering::SeqCst) {
            anyhow::bail!("smtp connection reset");
        }
        println!(
            "[mailer] invoice {} issued, amount={}",
            event.field("invoiceId").and_then(|v| v.as_str()).unwrap_or("?"),
            event.field("amount").and_then(|v| v.as_i64()).unwrap_or_default()
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    let db = InMemoryDatabase::new();

    // 1) 业务事务：追加事件到 Outbox
    let uow = db.unit_of_work();
    uow.execute(|| async {
        let issued = InvoiceIssued {
            metadata: EventMetadata::new("InvoiceIssued"),
            invoice_id: "inv-1".into(),
            amount: 1200,
        };
        uow.outbox().add_message(&issued, "inv-1", "Invoice").await?;
        Ok::<_, DomainError>(())
    })
    .await?;

    // 2) 处理器：第一次失败，消息保留并记录原因
    let mut processor = OutboxProcessor::new(OutboxService::new(db.outbox_store()));
    processor.register_event_handler("InvoiceIssued", std::sync::Arc::new(Mailer::default()));

    let handled = processor.process_batch().await;
    let message = &db.messages().await[0];
    println!("first batch handled={handled}, error={:?}", message.error());

    // 3) 下一批次重投成功
    let handled = processor.process_batch().await;
    let message = &db.messages().await[0];
    println!(
        "second batch handled={handled}, processed_at={:?}",
        message.processed_at()
    );

    Ok(())
}
