//! Headless demo: full lifecycle against a simulated product page.
//!
//! load → restore → start → (rising edge → purchase → notify) → stop_all → save

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{Duration, sleep};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockwatch_core::app::{NotificationDispatcher, TaskManager};
use stockwatch_core::domain::{
    AutomationError, MonitorError, MonitoringState, NotificationOutcome, ProductInfo, TaskId,
};
use stockwatch_core::impls::JsonSnapshotStore;
use stockwatch_core::ports::{
    AutomationLauncher, MessageChannel, PageAutomation, SnapshotStore, StatusSink, Subscriber,
    SubscriberDirectory, SystemClock, UlidGenerator,
};

/// Simulated product page: sold out for two polls, then in stock for two,
/// repeating. Every repeat is a fresh rising edge.
struct DemoPage {
    polls: usize,
}

#[async_trait]
impl PageAutomation for DemoPage {
    async fn open(&mut self, url: &str) -> Result<(), AutomationError> {
        info!(url, "demo page opened");
        Ok(())
    }

    async fn product_info(&mut self) -> Result<ProductInfo, AutomationError> {
        Ok(ProductInfo {
            title: "Demo Mechanical Keyboard".to_string(),
            price: Some("$49.00".to_string()),
            stock_detail: Some("Black x3".to_string()),
        })
    }

    async fn is_available(&mut self) -> Result<bool, AutomationError> {
        let available = self.polls % 4 >= 2;
        self.polls += 1;
        Ok(available)
    }

    async fn purchase(&mut self) -> Result<bool, AutomationError> {
        Ok(true)
    }

    async fn close(&mut self) -> Result<(), AutomationError> {
        Ok(())
    }
}

struct DemoLauncher;

#[async_trait]
impl AutomationLauncher for DemoLauncher {
    async fn launch(&self) -> Result<Box<dyn PageAutomation>, AutomationError> {
        Ok(Box::new(DemoPage { polls: 0 }))
    }
}

/// Prints transitions instead of driving a table widget.
struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn on_transition(&self, task_id: TaskId, state: MonitoringState) {
        println!("[{task_id}] -> {state}");
    }

    fn on_product_title(&self, task_id: TaskId, title: &str) {
        println!("[{task_id}] product: {title}");
    }

    fn on_dispatch(&self, task_id: TaskId, outcomes: &[NotificationOutcome]) {
        let sent = outcomes.iter().filter(|o| o.success).count();
        println!("[{task_id}] notified {sent}/{} subscribers", outcomes.len());
    }
}

struct DemoDirectory;

#[async_trait]
impl SubscriberDirectory for DemoDirectory {
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, MonitorError> {
        Ok(vec![Subscriber::new(100), Subscriber::new(200)])
    }
}

/// Stands in for the Telegram channel: prints instead of POSTing.
struct ConsoleChannel;

#[async_trait]
impl MessageChannel for ConsoleChannel {
    async fn send(&self, chat_id: i64, body: &str) -> NotificationOutcome {
        println!("--- message to {chat_id} ---\n{body}\n---");
        NotificationOutcome::delivered(chat_id, "printed")
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (A) Wire the collaborators.
    let store = JsonSnapshotStore::new("active_tasks.json");
    let ids = Arc::new(UlidGenerator::new(SystemClock));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(DemoDirectory),
        Arc::new(ConsoleChannel),
        ids.clone(),
    ));
    let manager = TaskManager::new(Arc::new(DemoLauncher), Arc::new(ConsoleSink), dispatcher, ids);

    // (B) Restore whatever the last session left behind.
    let restored = manager.restore(store.load().await).await;
    println!("restored {restored} task(s) from the previous session");

    // (C) Start a fresh task against the simulated page.
    let id = manager
        .start_task("https://shop.tiktok.com/view/product/1729382256910231033", 2)
        .await
        .expect("demo URL and interval are valid");
    println!("started {id}");

    // (D) Let it run through a couple of availability cycles.
    sleep(Duration::from_secs(12)).await;
    println!("counts: {:?}", manager.counts().await);

    // (E) Snapshot what is still monitoring, then shut everything down.
    let snapshot = manager.snapshot().await;
    let report = manager.stop_all().await;
    println!(
        "stopped {} task(s), {} with cleanup errors",
        report.stopped, report.failed
    );

    if let Err(e) = store.save(&snapshot).await {
        eprintln!("could not save snapshot: {e}");
    } else {
        println!(
            "saved {} task(s) to {}",
            snapshot.len(),
            store.path().display()
        );
    }
}
