//! Shared test doubles: scripted page automation, recording sink,
//! static subscriber list, scripted message channel.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{
    AutomationError, MonitorError, MonitoringState, NotificationOutcome, ProductInfo, TaskId,
};
use crate::ports::{
    AutomationLauncher, MessageChannel, PageAutomation, StatusSink, Subscriber,
    SubscriberDirectory,
};

/// Shared script for one or more automation sessions.
///
/// `availability` is the per-session answer sequence for `is_available`;
/// once exhausted the last value repeats. The atomic counters aggregate over
/// every session launched from this script.
#[derive(Debug, Default)]
pub(crate) struct Script {
    availability: Vec<bool>,
    fail_launch: bool,
    fail_open: bool,
    /// 1-based global poll number whose `is_available` call errors.
    fail_poll_at: Option<usize>,
    fail_purchase: bool,
    fail_close: bool,
    polls: AtomicUsize,
    purchases: AtomicUsize,
    closed: AtomicBool,
}

impl Script {
    pub fn with_availability(seq: &[bool]) -> Self {
        Self {
            availability: seq.to_vec(),
            ..Self::default()
        }
    }

    pub fn launch_fails(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    #[allow(dead_code)]
    pub fn open_fails(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn poll_fails_at(mut self, nth: usize) -> Self {
        self.fail_poll_at = Some(nth);
        self
    }

    pub fn purchase_fails(mut self) -> Self {
        self.fail_purchase = true;
        self
    }

    pub fn close_fails(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn launcher(self: Arc<Self>) -> Arc<dyn AutomationLauncher> {
        Arc::new(ScriptedLauncher { script: self })
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn purchases(&self) -> usize {
        self.purchases.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub(crate) struct ScriptedLauncher {
    script: Arc<Script>,
}

#[async_trait]
impl AutomationLauncher for ScriptedLauncher {
    async fn launch(&self) -> Result<Box<dyn PageAutomation>, AutomationError> {
        if self.script.fail_launch {
            return Err(AutomationError::new("scripted launch failure"));
        }
        Ok(Box::new(ScriptedAutomation {
            script: Arc::clone(&self.script),
            cursor: AtomicUsize::new(0),
        }))
    }
}

pub(crate) struct ScriptedAutomation {
    script: Arc<Script>,
    /// Per-session position in the availability sequence.
    cursor: AtomicUsize,
}

#[async_trait]
impl PageAutomation for ScriptedAutomation {
    async fn open(&mut self, _url: &str) -> Result<(), AutomationError> {
        if self.script.fail_open {
            return Err(AutomationError::new("scripted open failure"));
        }
        Ok(())
    }

    async fn product_info(&mut self) -> Result<ProductInfo, AutomationError> {
        Ok(ProductInfo {
            title: "Scripted Product".to_string(),
            price: Some("$9.99".to_string()),
            stock_detail: Some("One left".to_string()),
        })
    }

    async fn is_available(&mut self) -> Result<bool, AutomationError> {
        let nth = self.script.polls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.script.fail_poll_at == Some(nth) {
            return Err(AutomationError::new("scripted poll failure"));
        }
        let at = self.cursor.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .script
            .availability
            .get(at)
            .or(self.script.availability.last())
            .copied()
            .unwrap_or(false))
    }

    async fn purchase(&mut self) -> Result<bool, AutomationError> {
        self.script.purchases.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_purchase {
            return Err(AutomationError::new("scripted purchase failure"));
        }
        Ok(true)
    }

    async fn close(&mut self) -> Result<(), AutomationError> {
        self.script.closed.store(true, Ordering::SeqCst);
        if self.script.fail_close {
            return Err(AutomationError::new("scripted close failure"));
        }
        Ok(())
    }
}

/// Sink that records everything and lets tests await a given state.
#[derive(Default)]
pub(crate) struct RecordingSink {
    transitions: StdMutex<Vec<(TaskId, MonitoringState)>>,
    titles: StdMutex<Vec<(TaskId, String)>>,
    dispatches: StdMutex<Vec<(TaskId, Vec<NotificationOutcome>)>>,
    notify: Notify,
}

impl RecordingSink {
    /// Transition tags, across all workers, in arrival order.
    pub fn transitions_for_display(&self) -> Vec<&'static str> {
        self.transitions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, state)| state.tag())
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles
            .lock()
            .unwrap()
            .iter()
            .map(|(_, title)| title.clone())
            .collect()
    }

    #[allow(dead_code)]
    pub fn dispatches(&self) -> Vec<(TaskId, Vec<NotificationOutcome>)> {
        self.dispatches.lock().unwrap().clone()
    }

    pub fn first_transition_for(&self, id: TaskId) -> Option<MonitoringState> {
        self.transitions
            .lock()
            .unwrap()
            .iter()
            .find(|(task, _)| *task == id)
            .map(|(_, state)| *state)
    }

    pub fn last_transition_for(&self, id: TaskId) -> Option<MonitoringState> {
        self.transitions
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(task, _)| *task == id)
            .map(|(_, state)| *state)
    }

    fn saw(&self, id: TaskId, state: MonitoringState) -> bool {
        self.transitions
            .lock()
            .unwrap()
            .iter()
            .any(|entry| *entry == (id, state))
    }

    /// Block until the given worker has reported the given state.
    pub async fn wait_for(&self, id: TaskId, state: MonitoringState) {
        loop {
            let notified = self.notify.notified();
            if self.saw(id, state) {
                return;
            }
            notified.await;
        }
    }

    /// Block until the given state has been reported `count` times
    /// (across all workers).
    pub async fn wait_for_count(&self, state: MonitoringState, count: usize) {
        loop {
            let notified = self.notify.notified();
            let seen = self
                .transitions
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, s)| *s == state)
                .count();
            if seen >= count {
                return;
            }
            notified.await;
        }
    }
}

impl StatusSink for RecordingSink {
    fn on_transition(&self, task_id: TaskId, state: MonitoringState) {
        self.transitions.lock().unwrap().push((task_id, state));
        self.notify.notify_waiters();
    }

    fn on_product_title(&self, task_id: TaskId, title: &str) {
        self.titles.lock().unwrap().push((task_id, title.to_string()));
    }

    fn on_dispatch(&self, task_id: TaskId, outcomes: &[NotificationOutcome]) {
        self.dispatches
            .lock()
            .unwrap()
            .push((task_id, outcomes.to_vec()));
    }
}

/// Fixed subscriber list.
pub(crate) struct StaticDirectory {
    subscribers: Vec<Subscriber>,
}

impl StaticDirectory {
    pub fn with_chat_ids(chat_ids: &[i64]) -> Self {
        Self {
            subscribers: chat_ids.iter().copied().map(Subscriber::new).collect(),
        }
    }
}

#[async_trait]
impl SubscriberDirectory for StaticDirectory {
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, MonitorError> {
        Ok(self.subscribers.clone())
    }
}

/// Channel that records sends and fails for a chosen set of chat ids.
#[derive(Default)]
pub(crate) struct ScriptedChannel {
    fail_for: Vec<i64>,
    sent: StdMutex<Vec<(i64, String)>>,
}

impl ScriptedChannel {
    pub fn failing_for(mut self, chat_ids: &[i64]) -> Self {
        self.fail_for = chat_ids.to_vec();
        self
    }

    /// Successful sends only, in completion-record order.
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageChannel for ScriptedChannel {
    async fn send(&self, chat_id: i64, body: &str) -> NotificationOutcome {
        if self.fail_for.contains(&chat_id) {
            return NotificationOutcome::failed(chat_id, "scripted send failure");
        }
        self.sent.lock().unwrap().push((chat_id, body.to_string()));
        NotificationOutcome::delivered(chat_id, "message 1")
    }
}
