use anyhow::Result as AnyResult;
use outbox_application::command_bus::CommandBus;
use outbox_application::context::AppContext;
use outbox_application::user::{
    CreateUser, CreateUserHandler, UserCreated, UserCreatedHandler, UserDirectory,
};
use outbox_application::InMemoryCommandBus;
use outbox_domain::eventing::{
    OutboxPoller, OutboxPollerConfig, OutboxProcessor, OutboxProcessorConfig, Typed,
};
use outbox_domain::memory::InMemoryDatabase;
use outbox_domain::outbox::OutboxService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db = InMemoryDatabase::new();

    // 命令侧：CreateUser -> 工作单元（用户 + Outbox 消息）
    let bus = InMemoryCommandBus::new();
    bus.register::<CreateUser, _>(Arc::new(CreateUserHandler::new(db.clone())))?;

    // 分发侧：Outbox 处理器 + 轮询器
    let directory = UserDirectory::new();
    let mut processor = OutboxProcessor::with_config(
        OutboxService::new(db.outbox_store()),
        OutboxProcessorConfig::default(),
    );
    processor.register_event_handler(
        UserCreated::NAME,
        Arc::new(Typed::new(UserCreatedHandler::new(directory.clone()))),
    );
    let poller = OutboxPoller::new(
        Arc::new(processor),
        OutboxPollerConfig::builder()
            .poll_interval(Duration::from_millis(200))
            .build(),
    )
    .start();

    let ctx = AppContext::default().with_correlation_id("demo");
    let commands = [
        ("ada@example.com", "ada", "Ada Lovelace"),
        ("alan@example.com", "alan", "Alan Turing"),
        ("grace.example.com", "grace", "Grace Hopper"),
        ("edsger@example.com", "edsger", "Edsger Dijkstra"),
    ];
    for (email, username, name) in commands {
        let cmd = CreateUser {
            email: email.into(),
            username: username.into(),
            name: name.into(),
        };
        match bus.dispatch(&ctx, cmd).await {
            Ok(user_id) => info!(%user_id, username, "command accepted"),
            Err(err) => warn!(error = %err, username, "command rejected"),
        }
    }

    tokio::time::sleep(Duration::from_millis(600)).await;
    poller.shutdown();
    poller.join().await;

    for user in directory.all().await {
        println!("{:<8} {:<20} {}", user.username, user.email, user.name);
    }
    let pending = db.messages().await.iter().filter(|m| m.is_pending()).count();
    println!("pending outbox messages: {pending}");

    Ok(())
}
